//! Binary fake/real classifiers over TF-IDF features.
//!
//! Two linear models are supported, both loaded from the classifier
//! artifact and tagged by `kind`:
//!
//! - `logistic_regression`: `z = w·x + b`, `P(classes[1]) = σ(z)`,
//!   `classes[1]` is selected iff `z > 0`
//! - `multinomial_nb`: softmax over per-class joint log likelihoods,
//!   argmax selection (first class wins ties)
//!
//! Whatever the model, the reported probability is the entry for
//! `fake_class` and the label is `Fake` iff the selected class is
//! `fake_class`, so label and probability can never disagree.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{ArtifactError, ArtifactResult, ClassifyError, ClassifyResult};
use crate::vectorizer::FeatureVector;

/// Binary verdict for a claim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Label {
    Fake,
    Real,
}

impl Label {
    pub fn as_str(&self) -> &'static str {
        match self {
            Label::Fake => "Fake",
            Label::Real => "Real",
        }
    }

    pub fn is_fake(&self) -> bool {
        matches!(self, Label::Fake)
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classifier output for one claim.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub label: Label,

    /// Probability that the claim is fake, in `[0, 1]`.
    pub fake_probability: f64,
}

impl Prediction {
    /// Fake probability as a percentage, e.g. `87.0`.
    pub fn fake_percent(&self) -> f64 {
        self.fake_probability * 100.0
    }
}

fn default_fake_class() -> i64 {
    1
}

/// Logistic regression parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogisticRegression {
    /// The two class ids, in the order the model was fitted with.
    pub classes: [i64; 2],

    #[serde(default = "default_fake_class")]
    pub fake_class: i64,

    /// One weight per feature.
    pub coef: Vec<f64>,

    pub intercept: f64,
}

/// Multinomial naive Bayes parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MultinomialNaiveBayes {
    pub classes: [i64; 2],

    #[serde(default = "default_fake_class")]
    pub fake_class: i64,

    /// Log prior per class.
    pub class_log_prior: [f64; 2],

    /// Per class, log probability of each feature.
    pub feature_log_prob: [Vec<f64>; 2],
}

/// A fitted binary classifier.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Classifier {
    LogisticRegression(LogisticRegression),
    MultinomialNb(MultinomialNaiveBayes),
}

impl Classifier {
    /// Short model name for logs and health output.
    pub fn kind(&self) -> &'static str {
        match self {
            Classifier::LogisticRegression(_) => "logistic_regression",
            Classifier::MultinomialNb(_) => "multinomial_nb",
        }
    }

    /// Number of features the model was fitted on.
    pub fn dimension(&self) -> usize {
        match self {
            Classifier::LogisticRegression(m) => m.coef.len(),
            Classifier::MultinomialNb(m) => m.feature_log_prob[0].len(),
        }
    }

    fn classes(&self) -> ([i64; 2], i64) {
        match self {
            Classifier::LogisticRegression(m) => (m.classes, m.fake_class),
            Classifier::MultinomialNb(m) => (m.classes, m.fake_class),
        }
    }

    /// Check internal consistency of a deserialized model.
    pub fn validate(&self) -> ArtifactResult<()> {
        const ARTIFACT: &str = "classifier";

        let (classes, fake_class) = self.classes();
        if classes[0] == classes[1] {
            return Err(ArtifactError::invalid(
                ARTIFACT,
                format!("classes must be distinct, got {:?}", classes),
            ));
        }
        if !classes.contains(&fake_class) {
            return Err(ArtifactError::invalid(
                ARTIFACT,
                format!("fake_class {} is not one of {:?}", fake_class, classes),
            ));
        }

        match self {
            Classifier::LogisticRegression(m) => {
                if m.coef.is_empty() {
                    return Err(ArtifactError::invalid(ARTIFACT, "coef is empty"));
                }
                if !m.intercept.is_finite() || m.coef.iter().any(|w| !w.is_finite()) {
                    return Err(ArtifactError::invalid(ARTIFACT, "weights must be finite"));
                }
            }
            Classifier::MultinomialNb(m) => {
                let [neg, pos] = &m.feature_log_prob;
                if neg.is_empty() || neg.len() != pos.len() {
                    return Err(ArtifactError::invalid(
                        ARTIFACT,
                        format!(
                            "feature_log_prob rows must be non-empty and equal length, got {} and {}",
                            neg.len(),
                            pos.len()
                        ),
                    ));
                }
                let finite = m.class_log_prior.iter().all(|w| w.is_finite())
                    && neg.iter().chain(pos.iter()).all(|w| w.is_finite());
                if !finite {
                    return Err(ArtifactError::invalid(ARTIFACT, "log probabilities must be finite"));
                }
            }
        }

        Ok(())
    }

    /// Score one feature vector.
    pub fn predict(&self, features: &FeatureVector) -> ClassifyResult<Prediction> {
        let expected = self.dimension();
        if features.dim() != expected {
            return Err(ClassifyError::DimensionMismatch {
                expected,
                actual: features.dim(),
            });
        }

        let (probabilities, selected) = match self {
            Classifier::LogisticRegression(m) => {
                let z = features.dot(&m.coef) + m.intercept;
                let p = sigmoid(z);
                ([1.0 - p, p], if z > 0.0 { 1 } else { 0 })
            }
            Classifier::MultinomialNb(m) => {
                let jll = [
                    m.class_log_prior[0] + features.dot(&m.feature_log_prob[0]),
                    m.class_log_prior[1] + features.dot(&m.feature_log_prob[1]),
                ];
                let max = jll[0].max(jll[1]);
                let e0 = (jll[0] - max).exp();
                let e1 = (jll[1] - max).exp();
                let total = e0 + e1;
                ([e0 / total, e1 / total], if jll[1] > jll[0] { 1 } else { 0 })
            }
        };

        let (classes, fake_class) = self.classes();
        let fake_index = if classes[1] == fake_class { 1 } else { 0 };

        let label = if selected == fake_index {
            Label::Fake
        } else {
            Label::Real
        };

        Ok(Prediction {
            label,
            fake_probability: probabilities[fake_index].clamp(0.0, 1.0),
        })
    }
}

fn sigmoid(z: f64) -> f64 {
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let e = z.exp();
        e / (1.0 + e)
    }
}
