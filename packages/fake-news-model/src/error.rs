//! Typed errors for the model library.
//!
//! Artifact problems are startup failures: callers are expected to abort
//! rather than recover.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading or validating model artifacts.
#[derive(Debug, Error)]
pub enum ArtifactError {
    /// Artifact file could not be read
    #[error("failed to read artifact {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Artifact file is not valid JSON for the expected schema
    #[error("failed to parse artifact {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Artifact parsed but its contents are inconsistent
    #[error("invalid {artifact} artifact: {reason}")]
    Invalid {
        artifact: &'static str,
        reason: String,
    },

    /// Vectorizer and classifier were fitted on different feature spaces
    #[error("vectorizer produces {vectorizer} features but classifier expects {classifier}")]
    Incompatible { vectorizer: usize, classifier: usize },
}

impl ArtifactError {
    pub(crate) fn invalid(artifact: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            artifact,
            reason: reason.into(),
        }
    }
}

/// Errors raised while scoring a feature vector.
#[derive(Debug, Error)]
pub enum ClassifyError {
    /// Feature vector was produced for a different feature space
    #[error("feature vector has dimension {actual}, classifier expects {expected}")]
    DimensionMismatch { expected: usize, actual: usize },
}

/// Result type alias for artifact operations.
pub type ArtifactResult<T> = std::result::Result<T, ArtifactError>;

/// Result type alias for classification.
pub type ClassifyResult<T> = std::result::Result<T, ClassifyError>;
