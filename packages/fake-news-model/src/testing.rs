//! Small in-memory models for tests and local demos.
//!
//! `demo_artifacts` mirrors `models/*.json` at the workspace root.

use std::collections::HashMap;

use crate::artifacts::ModelArtifacts;
use crate::classifier::{Classifier, LogisticRegression};
use crate::vectorizer::TfidfVectorizer;

/// `(term, idf, logistic weight)` rows of the demo model.
///
/// Positive weights push towards fake.
pub const DEMO_TERMS: &[(&str, f64, f64)] = &[
    ("moon", 2.2, 1.0),
    ("made", 1.4, 0.5),
    ("cheese", 2.9, 1.8),
    ("breaking", 2.0, 1.2),
    ("shocking", 2.6, 1.6),
    ("miracle", 2.7, 1.5),
    ("cure", 2.3, 1.1),
    ("secret", 2.1, 1.3),
    ("hoax", 2.8, 1.4),
    ("government", 1.6, 0.2),
    ("vaccine", 2.0, 0.3),
    ("officials", 1.9, -1.2),
    ("reported", 1.7, -0.9),
    ("study", 1.8, -0.8),
    ("according", 1.5, -1.1),
    ("published", 1.9, -0.7),
    ("scientists", 2.0, -0.6),
    ("said", 1.2, -0.8),
];

pub const DEMO_INTERCEPT: f64 = -0.1;

pub const DEMO_STOP_WORDS: &[&str] = &["the", "is", "of", "and", "to", "in", "a", "an"];

/// The demo vectorizer (unigrams, l2, English stop words).
pub fn demo_vectorizer() -> TfidfVectorizer {
    let vocabulary: HashMap<String, usize> = DEMO_TERMS
        .iter()
        .enumerate()
        .map(|(i, (term, _, _))| (term.to_string(), i))
        .collect();
    let idf = DEMO_TERMS.iter().map(|(_, idf, _)| *idf).collect();

    TfidfVectorizer::new(vocabulary, idf).with_stop_words(DEMO_STOP_WORDS.iter().copied())
}

/// The demo vectorizer paired with its logistic regression.
pub fn demo_artifacts() -> ModelArtifacts {
    let classifier = Classifier::LogisticRegression(LogisticRegression {
        classes: [0, 1],
        fake_class: 1,
        coef: DEMO_TERMS.iter().map(|(_, _, w)| *w).collect(),
        intercept: DEMO_INTERCEPT,
    });

    ModelArtifacts::from_parts(demo_vectorizer(), classifier)
        .expect("demo artifacts are consistent")
}

/// A model that scores every claim with the same fake probability.
///
/// Uses zero weights and `intercept = logit(p)`; `p` must be in `(0, 1)`.
pub fn constant_artifacts(fake_probability: f64) -> ModelArtifacts {
    let logit = (fake_probability / (1.0 - fake_probability)).ln();
    let classifier = Classifier::LogisticRegression(LogisticRegression {
        classes: [0, 1],
        fake_class: 1,
        coef: vec![0.0; DEMO_TERMS.len()],
        intercept: logit,
    });

    ModelArtifacts::from_parts(demo_vectorizer(), classifier)
        .expect("constant artifacts are consistent")
}
