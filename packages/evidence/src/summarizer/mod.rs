//! Evidence summarizers.
//!
//! A summarizer receives a small batch of hits and returns one summary per
//! hit, in the same order, with `title` and `href` copied from the hit.
//! [`check_summaries`] verifies that contract at the boundary.
//!
//! # Implementations
//!
//! - [`ExtractiveSummarizer`] - local sentence scoring, no network
//! - [`OpenAISummarizer`] - chat completion per hit
//! - `MockSummarizer` in [`crate::testing`] - for tests

mod extractive;
mod openai;

pub use extractive::{ExtractiveSummarizer, DEFAULT_SENTENCES};
pub use openai::OpenAISummarizer;

use async_trait::async_trait;

use crate::error::{SummarizeError, SummarizeResult};
use crate::types::{EvidenceHit, EvidenceSummary};

/// Length of a fallback snippet, in characters.
pub const SNIPPET_CHARS: usize = 300;

/// Shown when a source has no text to summarize.
pub const NO_CONTENT: &str = "No preview available for this source.";

/// Condenses retrieved sources.
#[async_trait]
pub trait EvidenceSummarizer: Send + Sync {
    /// Backend name for logs.
    fn name(&self) -> &'static str;

    /// Summarize each hit, preserving order.
    async fn summarize(&self, hits: &[EvidenceHit]) -> SummarizeResult<Vec<EvidenceSummary>>;
}

/// Verify that `summaries` line up one-to-one with `hits`.
pub fn check_summaries(hits: &[EvidenceHit], summaries: &[EvidenceSummary]) -> SummarizeResult<()> {
    if hits.len() != summaries.len() {
        return Err(SummarizeError::CountMismatch {
            expected: hits.len(),
            actual: summaries.len(),
        });
    }

    for (position, (hit, summary)) in hits.iter().zip(summaries).enumerate() {
        if hit.href != summary.href {
            return Err(SummarizeError::OrderMismatch {
                position,
                expected: hit.href.to_string(),
                actual: summary.href.to_string(),
            });
        }
    }

    Ok(())
}

/// Leading excerpt of a source, used when no summary is available.
///
/// Cuts at the last sentence end inside the limit when that keeps at least
/// half of it, otherwise at the last word boundary, and marks the cut
/// with an ellipsis.
pub fn snippet(content: &str, max_chars: usize) -> String {
    let text = crate::types::collapse_whitespace(content);
    if text.is_empty() {
        return NO_CONTENT.to_string();
    }
    if text.chars().count() <= max_chars {
        return text;
    }

    let cut: String = text.chars().take(max_chars).collect();

    let sentence_end = cut
        .char_indices()
        .filter(|(_, c)| matches!(c, '.' | '!' | '?'))
        .map(|(i, c)| i + c.len_utf8())
        .last();
    if let Some(end) = sentence_end {
        if end >= cut.len() / 2 {
            return cut[..end].to_string();
        }
    }

    match cut.rfind(' ') {
        Some(space) if space > 0 => format!("{}…", cut[..space].trim_end()),
        _ => format!("{}…", cut),
    }
}
