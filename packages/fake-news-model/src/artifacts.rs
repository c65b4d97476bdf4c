//! Loading the fitted vectorizer and classifier.
//!
//! Both artifacts are read once at startup, validated against each other
//! and then shared read-only for the rest of the process.

use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use sha2::{Digest, Sha256};
use tracing::info;

use crate::classifier::{Classifier, Prediction};
use crate::error::{ArtifactError, ArtifactResult, ClassifyResult};
use crate::normalize::clean_text;
use crate::vectorizer::{FeatureVector, TfidfVectorizer};

/// Default classifier artifact location, relative to the working directory.
pub const DEFAULT_MODEL_PATH: &str = "models/fake_news_model.json";

/// Default vectorizer artifact location, relative to the working directory.
pub const DEFAULT_VECTORIZER_PATH: &str = "models/vectorizer.json";

/// Where to find the two artifact files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPaths {
    pub model: PathBuf,
    pub vectorizer: PathBuf,
}

impl Default for ArtifactPaths {
    fn default() -> Self {
        Self {
            model: PathBuf::from(DEFAULT_MODEL_PATH),
            vectorizer: PathBuf::from(DEFAULT_VECTORIZER_PATH),
        }
    }
}

/// Provenance of the loaded artifacts.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ArtifactInfo {
    pub model_kind: String,
    pub dimension: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_path: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_sha256: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vectorizer_path: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vectorizer_sha256: Option<String>,
}

/// The fitted vectorizer and classifier, validated as a pair.
#[derive(Debug, Clone)]
pub struct ModelArtifacts {
    vectorizer: TfidfVectorizer,
    classifier: Classifier,
    info: ArtifactInfo,
}

impl ModelArtifacts {
    /// Load and validate both artifacts from disk.
    pub fn load(paths: &ArtifactPaths) -> ArtifactResult<Self> {
        let (vectorizer, vectorizer_sha256) =
            read_artifact::<TfidfVectorizer>(&paths.vectorizer)?;
        let (classifier, model_sha256) = read_artifact::<Classifier>(&paths.model)?;

        let mut artifacts = Self::from_parts(vectorizer, classifier)?;
        artifacts.info.model_path = Some(paths.model.clone());
        artifacts.info.model_sha256 = Some(model_sha256);
        artifacts.info.vectorizer_path = Some(paths.vectorizer.clone());
        artifacts.info.vectorizer_sha256 = Some(vectorizer_sha256);

        info!(
            model = %paths.model.display(),
            model_kind = %artifacts.info.model_kind,
            model_sha256 = artifacts.info.model_sha256.as_deref().unwrap_or_default(),
            vectorizer = %paths.vectorizer.display(),
            vectorizer_sha256 = artifacts.info.vectorizer_sha256.as_deref().unwrap_or_default(),
            dimension = artifacts.info.dimension,
            "Loaded model artifacts"
        );

        Ok(artifacts)
    }

    /// Pair an in-memory vectorizer and classifier.
    pub fn from_parts(vectorizer: TfidfVectorizer, classifier: Classifier) -> ArtifactResult<Self> {
        vectorizer.validate()?;
        classifier.validate()?;

        if vectorizer.dimension() != classifier.dimension() {
            return Err(ArtifactError::Incompatible {
                vectorizer: vectorizer.dimension(),
                classifier: classifier.dimension(),
            });
        }

        let info = ArtifactInfo {
            model_kind: classifier.kind().to_string(),
            dimension: classifier.dimension(),
            ..Default::default()
        };

        Ok(Self {
            vectorizer,
            classifier,
            info,
        })
    }

    pub fn vectorizer(&self) -> &TfidfVectorizer {
        &self.vectorizer
    }

    pub fn classifier(&self) -> &Classifier {
        &self.classifier
    }

    pub fn info(&self) -> &ArtifactInfo {
        &self.info
    }

    /// Clean raw claim text into the vectorizer's input space.
    pub fn normalize(&self, claim: &str) -> String {
        clean_text(claim)
    }

    /// Vectorize already-normalized text.
    pub fn vectorize(&self, normalized: &str) -> FeatureVector {
        self.vectorizer.transform(normalized)
    }

    /// Normalize, vectorize and score a raw claim.
    pub fn classify(&self, claim: &str) -> ClassifyResult<Prediction> {
        let features = self.vectorize(&self.normalize(claim));
        self.classifier.predict(&features)
    }
}

fn read_artifact<T: DeserializeOwned>(path: &Path) -> ArtifactResult<(T, String)> {
    let bytes = std::fs::read(path).map_err(|source| ArtifactError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let parsed = serde_json::from_slice(&bytes).map_err(|source| ArtifactError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    let mut hasher = Sha256::new();
    hasher.update(&bytes);
    Ok((parsed, format!("{:x}", hasher.finalize())))
}
