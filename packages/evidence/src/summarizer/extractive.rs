//! Frequency-based extractive summarizer.
//!
//! Each sentence is scored by the normalized frequency of its content
//! words across the whole source; the best `max_sentences` are kept in
//! their original order.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use lazy_static::lazy_static;
use regex::Regex;

use super::{EvidenceSummarizer, NO_CONTENT};
use crate::error::SummarizeResult;
use crate::types::{EvidenceHit, EvidenceSummary};

lazy_static! {
    // Terminal punctuation, optional closing quote/bracket, then whitespace.
    static ref SENTENCE_END: Regex = Regex::new(r#"[.!?]+["')\]]*\s+"#).unwrap();
    static ref WORD: Regex = Regex::new(r"\b\w\w+\b").unwrap();
    static ref STOP_WORDS: HashSet<&'static str> = [
        "about", "after", "all", "also", "an", "and", "any", "are", "as", "at", "be", "been",
        "but", "by", "can", "could", "did", "do", "does", "for", "from", "had", "has", "have",
        "he", "her", "his", "how", "if", "in", "into", "is", "it", "its", "more", "most", "no",
        "not", "of", "on", "one", "or", "our", "out", "she", "so", "some", "than", "that", "the",
        "their", "them", "then", "there", "these", "they", "this", "to", "up", "was", "we",
        "were", "what", "when", "which", "who", "will", "with", "would", "you", "your",
    ]
    .into_iter()
    .collect();
}

/// Default number of sentences per summary.
pub const DEFAULT_SENTENCES: usize = 3;

/// Local summarizer that picks the most representative sentences.
#[derive(Debug, Clone)]
pub struct ExtractiveSummarizer {
    max_sentences: usize,
}

impl Default for ExtractiveSummarizer {
    fn default() -> Self {
        Self::new(DEFAULT_SENTENCES)
    }
}

impl ExtractiveSummarizer {
    pub fn new(max_sentences: usize) -> Self {
        Self {
            max_sentences: max_sentences.max(1),
        }
    }

    /// Summarize one piece of text.
    pub fn summarize_text(&self, content: &str) -> String {
        let sentences = split_sentences(content);
        if sentences.is_empty() {
            return NO_CONTENT.to_string();
        }
        if sentences.len() <= self.max_sentences {
            return sentences.join(" ");
        }

        let frequencies = word_frequencies(content);

        let mut scored: Vec<(usize, f64)> = sentences
            .iter()
            .enumerate()
            .map(|(position, sentence)| (position, score_sentence(sentence, &frequencies)))
            .collect();

        // Highest score first, earlier sentence wins ties.
        scored.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));

        let mut keep: Vec<usize> = scored
            .into_iter()
            .take(self.max_sentences)
            .map(|(position, _)| position)
            .collect();
        keep.sort_unstable();

        keep.into_iter()
            .map(|position| sentences[position].as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[async_trait]
impl EvidenceSummarizer for ExtractiveSummarizer {
    fn name(&self) -> &'static str {
        "extractive"
    }

    async fn summarize(&self, hits: &[EvidenceHit]) -> SummarizeResult<Vec<EvidenceSummary>> {
        Ok(hits
            .iter()
            .map(|hit| EvidenceSummary::for_hit(hit, self.summarize_text(&hit.content)))
            .collect())
    }
}

fn split_sentences(text: &str) -> Vec<String> {
    let mut sentences = Vec::new();
    let mut start = 0;

    for boundary in SENTENCE_END.find_iter(text) {
        push_sentence(&mut sentences, &text[start..boundary.end()]);
        start = boundary.end();
    }
    push_sentence(&mut sentences, &text[start..]);

    sentences
}

fn push_sentence(sentences: &mut Vec<String>, raw: &str) {
    let sentence = crate::types::collapse_whitespace(raw);
    if !sentence.is_empty() {
        sentences.push(sentence);
    }
}

fn content_words(text: &str) -> impl Iterator<Item = String> + '_ {
    WORD.find_iter(text)
        .map(|m| m.as_str().to_lowercase())
        .filter(|w| !STOP_WORDS.contains(w.as_str()))
}

/// Word counts scaled so the most frequent word is 1.0.
fn word_frequencies(text: &str) -> HashMap<String, f64> {
    let mut counts: HashMap<String, f64> = HashMap::new();
    for word in content_words(text) {
        *counts.entry(word).or_insert(0.0) += 1.0;
    }

    let max = counts.values().copied().fold(0.0, f64::max);
    if max > 0.0 {
        for value in counts.values_mut() {
            *value /= max;
        }
    }
    counts
}

/// Sum of word weights, damped by sentence length.
fn score_sentence(sentence: &str, frequencies: &HashMap<String, f64>) -> f64 {
    let mut total = 0.0;
    let mut words = 0usize;
    for word in content_words(sentence) {
        total += frequencies.get(&word).copied().unwrap_or(0.0);
        words += 1;
    }

    if words == 0 {
        0.0
    } else {
        total / (words as f64).sqrt()
    }
}
