//! Typed errors for the evidence library.
//!
//! Retrieval and summarization are external collaborators; their failures
//! are reported to the caller, which decides how to degrade.

use thiserror::Error;

/// Errors from an evidence retriever.
#[derive(Debug, Error)]
pub enum RetrievalError {
    /// Request could not be sent or the body could not be read
    #[error("HTTP error: {0}")]
    Http(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Search backend answered with a non-success status
    #[error("{backend} returned {status}")]
    Api { backend: &'static str, status: u16 },

    /// Search backend answered with something we could not understand
    #[error("unexpected {backend} response: {reason}")]
    Parse {
        backend: &'static str,
        reason: String,
    },

    /// Retriever is misconfigured (e.g. missing API key)
    #[error("config error: {0}")]
    Config(String),
}

/// Errors from an evidence summarizer.
#[derive(Debug, Error)]
pub enum SummarizeError {
    /// Request could not be sent or the body could not be read
    #[error("HTTP error: {0}")]
    Http(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Summarization backend answered with an error
    #[error("summarization API error: {0}")]
    Api(String),

    /// Backend answered without usable text
    #[error("empty summary for {href}")]
    EmptySummary { href: String },

    /// Summaries do not line up with the hits they were produced from
    #[error("summarizer returned {actual} summaries for {expected} hits")]
    CountMismatch { expected: usize, actual: usize },

    /// A summary points at a different source than the hit in its position
    #[error("summary {position} is for {actual}, expected {expected}")]
    OrderMismatch {
        position: usize,
        expected: String,
        actual: String,
    },

    /// Summarizer is misconfigured (e.g. missing API key)
    #[error("config error: {0}")]
    Config(String),
}

/// Reasons a search result cannot become an evidence hit.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidHit {
    #[error("hit has no title")]
    EmptyTitle,

    #[error("hit link is not a valid URL: {href}")]
    InvalidUrl { href: String },

    #[error("hit link must be http or https: {href}")]
    UnsupportedScheme { href: String },
}

/// Result type alias for retrieval.
pub type RetrievalResult<T> = std::result::Result<T, RetrievalError>;

/// Result type alias for summarization.
pub type SummarizeResult<T> = std::result::Result<T, SummarizeError>;
