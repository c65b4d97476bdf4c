//! Claim text cleaning.
//!
//! Rules, applied in order:
//! - Lowercase
//! - Drop URLs, HTML tags and `[bracketed]` fragments
//! - Replace anything that is not a letter or whitespace with a space
//! - Collapse whitespace runs and trim
//!
//! The output matches what the vectorizer was fitted on, so it must stay
//! in sync with the training-side preprocessing.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref URL_REGEX: Regex = Regex::new(r"https?://\S+|www\.\S+").unwrap();
    static ref HTML_TAG_REGEX: Regex = Regex::new(r"<[^>]*>").unwrap();
    static ref BRACKETED_REGEX: Regex = Regex::new(r"\[[^\]]*\]").unwrap();
}

/// Normalize raw claim text for feature extraction.
pub fn clean_text(raw: &str) -> String {
    let lowered = raw.to_lowercase();
    let without_urls = URL_REGEX.replace_all(&lowered, " ");
    let without_tags = HTML_TAG_REGEX.replace_all(&without_urls, " ");
    let without_brackets = BRACKETED_REGEX.replace_all(&without_tags, " ");

    without_brackets
        .chars()
        .map(|c| {
            if c.is_alphabetic() || c.is_whitespace() {
                c
            } else {
                ' '
            }
        })
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}
