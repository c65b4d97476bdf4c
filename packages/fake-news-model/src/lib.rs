//! Fake News Classification Model
//!
//! Turns raw claim text into a fake/real verdict using artifacts fitted
//! offline:
//!
//! ```rust,ignore
//! use fake_news_model::{ArtifactPaths, ModelArtifacts};
//!
//! let artifacts = ModelArtifacts::load(&ArtifactPaths::default())?;
//! let prediction = artifacts.classify("The moon is made of cheese")?;
//! println!("{} ({:.2}%)", prediction.label, prediction.fake_percent());
//! ```
//!
//! # Modules
//!
//! - [`normalize`] - Claim text cleaning
//! - [`vectorizer`] - TF-IDF features over a fitted vocabulary
//! - [`classifier`] - Logistic regression and multinomial naive Bayes
//! - [`artifacts`] - Loading and cross-validating the fitted artifacts
//! - [`testing`] - Small in-memory models

pub mod artifacts;
pub mod classifier;
pub mod error;
pub mod normalize;
pub mod testing;
pub mod vectorizer;

pub use artifacts::{
    ArtifactInfo, ArtifactPaths, ModelArtifacts, DEFAULT_MODEL_PATH, DEFAULT_VECTORIZER_PATH,
};
pub use classifier::{Classifier, Label, LogisticRegression, MultinomialNaiveBayes, Prediction};
pub use error::{ArtifactError, ClassifyError};
pub use normalize::clean_text;
pub use vectorizer::{FeatureVector, Norm, TfidfVectorizer};
