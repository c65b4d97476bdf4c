//! TF-IDF feature extraction over a pre-fitted vocabulary.
//!
//! The weighting follows the usual scikit-learn `TfidfVectorizer`
//! conventions so artifacts exported from a Python training run score the
//! same way here:
//!
//! - tokens are runs of two or more word characters
//! - n-grams are joined by a single space
//! - `tf` is a raw count (`1` when `binary`, `1 + ln(tf)` when `sublinear_tf`)
//! - the result is scaled by `idf` and normalized (`l2` by default)

use std::collections::{BTreeMap, HashMap, HashSet};

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{ArtifactError, ArtifactResult};

lazy_static! {
    static ref TOKEN_REGEX: Regex = Regex::new(r"\b\w\w+\b").unwrap();
}

/// Sparse, fixed-dimension feature vector.
///
/// Entries are sorted by feature index and never contain zeros.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector {
    dim: usize,
    entries: Vec<(usize, f64)>,
}

impl FeatureVector {
    /// The all-zero vector of the given dimension.
    pub fn zeros(dim: usize) -> Self {
        Self {
            dim,
            entries: Vec::new(),
        }
    }

    /// Build from `(index, weight)` pairs.
    ///
    /// Pairs are sorted, zero weights dropped and duplicate indices summed.
    /// Indices at or beyond `dim` are ignored.
    pub fn from_entries(dim: usize, entries: impl IntoIterator<Item = (usize, f64)>) -> Self {
        let mut merged: BTreeMap<usize, f64> = BTreeMap::new();
        for (index, weight) in entries {
            if index < dim {
                *merged.entry(index).or_insert(0.0) += weight;
            }
        }
        Self {
            dim,
            entries: merged.into_iter().filter(|(_, w)| *w != 0.0).collect(),
        }
    }

    /// Number of features in the space (not the number of non-zeros).
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Non-zero `(index, weight)` pairs in index order.
    pub fn entries(&self) -> &[(usize, f64)] {
        &self.entries
    }

    pub fn is_zero(&self) -> bool {
        self.entries.is_empty()
    }

    /// Dot product with a dense weight row of the same dimension.
    pub fn dot(&self, weights: &[f64]) -> f64 {
        self.entries
            .iter()
            .map(|&(index, value)| value * weights.get(index).copied().unwrap_or(0.0))
            .sum()
    }

    /// Euclidean length.
    pub fn l2_norm(&self) -> f64 {
        self.entries.iter().map(|(_, v)| v * v).sum::<f64>().sqrt()
    }

    /// Expand to a dense vector. Mostly useful in tests.
    pub fn to_dense(&self) -> Vec<f64> {
        let mut dense = vec![0.0; self.dim];
        for &(index, value) in &self.entries {
            dense[index] = value;
        }
        dense
    }
}

/// Row normalization applied after weighting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Norm {
    L1,
    #[default]
    L2,
    None,
}

fn default_ngram_range() -> (usize, usize) {
    (1, 1)
}

fn default_true() -> bool {
    true
}

/// A fitted TF-IDF vectorizer.
///
/// Loaded once from the vectorizer artifact and never mutated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TfidfVectorizer {
    /// Term (or space-joined n-gram) to feature index.
    vocabulary: HashMap<String, usize>,

    /// Inverse document frequency per feature index.
    #[serde(default)]
    idf: Vec<f64>,

    #[serde(default = "default_ngram_range")]
    ngram_range: (usize, usize),

    #[serde(default = "default_true")]
    lowercase: bool,

    #[serde(default)]
    stop_words: HashSet<String>,

    #[serde(default)]
    sublinear_tf: bool,

    #[serde(default = "default_true")]
    use_idf: bool,

    #[serde(default)]
    binary: bool,

    #[serde(default)]
    norm: Norm,
}

impl TfidfVectorizer {
    /// Create a vectorizer from a vocabulary and its idf weights.
    pub fn new(vocabulary: HashMap<String, usize>, idf: Vec<f64>) -> Self {
        Self {
            vocabulary,
            idf,
            ngram_range: default_ngram_range(),
            lowercase: true,
            stop_words: HashSet::new(),
            sublinear_tf: false,
            use_idf: true,
            binary: false,
            norm: Norm::L2,
        }
    }

    /// Set the inclusive n-gram range.
    pub fn with_ngram_range(mut self, min_n: usize, max_n: usize) -> Self {
        self.ngram_range = (min_n, max_n);
        self
    }

    /// Set the stop-word list.
    pub fn with_stop_words<I, S>(mut self, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.stop_words = words.into_iter().map(Into::into).collect();
        self
    }

    /// Use `1 + ln(tf)` instead of raw counts.
    pub fn with_sublinear_tf(mut self, enabled: bool) -> Self {
        self.sublinear_tf = enabled;
        self
    }

    /// Use presence (1) instead of counts.
    pub fn with_binary(mut self, enabled: bool) -> Self {
        self.binary = enabled;
        self
    }

    /// Set row normalization.
    pub fn with_norm(mut self, norm: Norm) -> Self {
        self.norm = norm;
        self
    }

    /// Number of features produced by [`transform`](Self::transform).
    pub fn dimension(&self) -> usize {
        self.vocabulary.len()
    }

    /// Check internal consistency of a deserialized vectorizer.
    pub fn validate(&self) -> ArtifactResult<()> {
        const ARTIFACT: &str = "vectorizer";

        if self.vocabulary.is_empty() {
            return Err(ArtifactError::invalid(ARTIFACT, "vocabulary is empty"));
        }

        let dim = self.vocabulary.len();
        let mut seen = vec![false; dim];
        for (term, &index) in &self.vocabulary {
            if index >= dim {
                return Err(ArtifactError::invalid(
                    ARTIFACT,
                    format!("term '{}' has index {} outside 0..{}", term, index, dim),
                ));
            }
            if seen[index] {
                return Err(ArtifactError::invalid(
                    ARTIFACT,
                    format!("feature index {} is assigned to more than one term", index),
                ));
            }
            seen[index] = true;
        }

        if self.use_idf {
            if self.idf.len() != dim {
                return Err(ArtifactError::invalid(
                    ARTIFACT,
                    format!("idf has {} entries for {} terms", self.idf.len(), dim),
                ));
            }
            if self.idf.iter().any(|w| !w.is_finite()) {
                return Err(ArtifactError::invalid(ARTIFACT, "idf contains non-finite values"));
            }
        }

        let (min_n, max_n) = self.ngram_range;
        if min_n == 0 || min_n > max_n {
            return Err(ArtifactError::invalid(
                ARTIFACT,
                format!("invalid ngram_range ({}, {})", min_n, max_n),
            ));
        }

        Ok(())
    }

    /// Map normalized text to its feature vector.
    ///
    /// Out-of-vocabulary terms are ignored; text with no known terms maps
    /// to the zero vector.
    pub fn transform(&self, text: &str) -> FeatureVector {
        let dim = self.dimension();
        let mut counts: BTreeMap<usize, f64> = BTreeMap::new();

        for term in self.analyze(text) {
            if let Some(&index) = self.vocabulary.get(&term) {
                *counts.entry(index).or_insert(0.0) += 1.0;
            }
        }

        let mut entries: Vec<(usize, f64)> = counts
            .into_iter()
            .map(|(index, count)| {
                let mut tf = count;
                if self.binary {
                    tf = 1.0;
                }
                if self.sublinear_tf {
                    tf = 1.0 + tf.ln();
                }
                if self.use_idf {
                    tf *= self.idf[index];
                }
                (index, tf)
            })
            .collect();

        let norm = match self.norm {
            Norm::L2 => entries.iter().map(|(_, v)| v * v).sum::<f64>().sqrt(),
            Norm::L1 => entries.iter().map(|(_, v)| v.abs()).sum::<f64>(),
            Norm::None => 1.0,
        };
        if norm > 0.0 {
            for (_, value) in entries.iter_mut() {
                *value /= norm;
            }
        }

        FeatureVector::from_entries(dim, entries)
    }

    /// Tokenize and expand into the configured n-grams.
    fn analyze(&self, text: &str) -> Vec<String> {
        let text = if self.lowercase {
            text.to_lowercase()
        } else {
            text.to_string()
        };

        let tokens: Vec<&str> = TOKEN_REGEX
            .find_iter(&text)
            .map(|m| m.as_str())
            .filter(|t| !self.stop_words.contains(*t))
            .collect();

        let (min_n, max_n) = self.ngram_range;
        let mut terms = Vec::new();
        for n in min_n..=max_n {
            if n > tokens.len() {
                break;
            }
            terms.extend(tokens.windows(n).map(|w| w.join(" ")));
        }
        terms
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vocab(terms: &[&str]) -> HashMap<String, usize> {
        terms
            .iter()
            .enumerate()
            .map(|(i, t)| (t.to_string(), i))
            .collect()
    }

    #[test]
    fn test_dimension_matches_vocabulary() {
        let v = TfidfVectorizer::new(vocab(&["moon", "cheese", "made"]), vec![1.0; 3]);
        assert_eq!(v.dimension(), 3);
        assert_eq!(v.transform("the moon").dim(), 3);
    }

    #[test]
    fn test_l2_output_is_unit_length() {
        let v = TfidfVectorizer::new(vocab(&["moon", "cheese", "made"]), vec![1.0, 2.0, 1.5]);
        let x = v.transform("the moon is made of cheese cheese");
        assert!((x.l2_norm() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_counts_and_idf_weighting() {
        let v = TfidfVectorizer::new(vocab(&["moon", "cheese"]), vec![1.0, 2.0])
            .with_norm(Norm::None);
        let x = v.transform("moon cheese cheese");
        assert_eq!(x.entries(), &[(0, 1.0), (1, 4.0)]);
    }

    #[test]
    fn test_sublinear_and_binary() {
        let v = TfidfVectorizer::new(vocab(&["cheese"]), vec![1.0])
            .with_norm(Norm::None)
            .with_sublinear_tf(true);
        let x = v.transform("cheese cheese cheese");
        assert!((x.entries()[0].1 - (1.0 + 3f64.ln())).abs() < 1e-12);

        let v = TfidfVectorizer::new(vocab(&["cheese"]), vec![2.0])
            .with_norm(Norm::None)
            .with_binary(true);
        assert_eq!(v.transform("cheese cheese").entries(), &[(0, 2.0)]);
    }

    #[test]
    fn test_bigrams_and_stop_words() {
        let v = TfidfVectorizer::new(vocab(&["moon", "cheese", "moon cheese"]), vec![1.0; 3])
            .with_ngram_range(1, 2)
            .with_stop_words(["of", "made", "is", "the"])
            .with_norm(Norm::None);
        let x = v.transform("the moon is made of cheese");
        // Stop words are removed before n-grams are formed.
        assert_eq!(x.entries(), &[(0, 1.0), (1, 1.0), (2, 1.0)]);
    }

    #[test]
    fn test_single_character_tokens_ignored() {
        let v = TfidfVectorizer::new(vocab(&["a", "moon"]), vec![1.0; 2]).with_norm(Norm::None);
        assert_eq!(v.transform("a moon").entries(), &[(1, 1.0)]);
    }

    #[test]
    fn test_unknown_text_is_zero_vector() {
        let v = TfidfVectorizer::new(vocab(&["moon"]), vec![1.0]);
        let x = v.transform("nothing relevant here");
        assert!(x.is_zero());
        assert_eq!(x.dim(), 1);
    }

    #[test]
    fn test_validate_rejects_bad_artifacts() {
        assert!(TfidfVectorizer::new(HashMap::new(), vec![]).validate().is_err());

        let gap: HashMap<String, usize> =
            [("a".to_string(), 0), ("b".to_string(), 2)].into_iter().collect();
        assert!(TfidfVectorizer::new(gap, vec![1.0; 2]).validate().is_err());

        let dup: HashMap<String, usize> =
            [("a".to_string(), 0), ("b".to_string(), 0)].into_iter().collect();
        assert!(TfidfVectorizer::new(dup, vec![1.0; 2]).validate().is_err());

        assert!(TfidfVectorizer::new(vocab(&["a", "b"]), vec![1.0]).validate().is_err());

        assert!(TfidfVectorizer::new(vocab(&["a"]), vec![1.0])
            .with_ngram_range(2, 1)
            .validate()
            .is_err());

        assert!(TfidfVectorizer::new(vocab(&["a", "b"]), vec![1.0, 1.0])
            .validate()
            .is_ok());
    }

    #[test]
    fn test_deserialize_with_defaults() {
        let json = r#"{ "vocabulary": { "moon": 0, "cheese": 1 }, "idf": [1.0, 2.0] }"#;
        let v: TfidfVectorizer = serde_json::from_str(json).unwrap();
        v.validate().unwrap();
        assert_eq!(v.ngram_range, (1, 1));
        assert!(v.lowercase);
        assert!(v.use_idf);
        assert_eq!(v.norm, Norm::L2);
    }

    #[test]
    fn test_feature_vector_from_entries() {
        let x = FeatureVector::from_entries(4, [(2, 1.0), (0, 0.5), (2, 1.0), (3, 0.0), (9, 1.0)]);
        assert_eq!(x.entries(), &[(0, 0.5), (2, 2.0)]);
        assert_eq!(x.to_dense(), vec![0.5, 0.0, 2.0, 0.0]);
        assert_eq!(x.dot(&[2.0, 0.0, 1.0, 0.0]), 3.0);
    }
}
