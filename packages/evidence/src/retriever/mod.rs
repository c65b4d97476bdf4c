//! Evidence retrievers.
//!
//! A retriever takes the raw claim text and returns candidate sources in
//! the backend's ranking order. Callers keep that order and decide how many
//! hits to use.
//!
//! # Implementations
//!
//! - [`TavilyRetriever`] - Tavily search API (needs an API key)
//! - [`DuckDuckGoRetriever`] - DuckDuckGo HTML results (no key)
//! - `MockRetriever` in [`crate::testing`] - canned hits for tests

mod duckduckgo;
mod tavily;

pub use duckduckgo::DuckDuckGoRetriever;
pub use tavily::TavilyRetriever;

use std::time::Duration;

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};

use crate::error::{RetrievalError, RetrievalResult};
use crate::types::EvidenceHit;

/// Longest query sent to a search backend, in characters.
pub const MAX_QUERY_CHARS: usize = 400;

/// Default number of results requested from a backend.
pub const DEFAULT_SEARCH_RESULTS: usize = 5;

/// Default timeout for outbound search requests.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(20);

/// Looks up sources for a claim.
#[async_trait]
pub trait EvidenceRetriever: Send + Sync {
    /// Backend name for logs.
    fn name(&self) -> &'static str;

    /// Search for sources relevant to the raw claim text.
    ///
    /// Results are ordered by the backend's relevance ranking.
    async fn retrieve(&self, claim: &str) -> RetrievalResult<Vec<EvidenceHit>>;
}

/// Shorten a claim to something a search box accepts.
///
/// Whitespace is collapsed and the result is cut at a character boundary,
/// preferring the last word boundary within the limit.
pub fn search_query(claim: &str) -> String {
    let collapsed = claim.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.chars().count() <= MAX_QUERY_CHARS {
        return collapsed;
    }

    let cut: String = collapsed.chars().take(MAX_QUERY_CHARS).collect();
    match cut.rfind(' ') {
        Some(space) if space > 0 => cut[..space].to_string(),
        _ => cut,
    }
}

pub(crate) fn http_client(timeout: Duration) -> RetrievalResult<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(concat!("factflow/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| RetrievalError::Http(Box::new(e)))
}

/// Whitespace-only API keys count as missing.
pub(crate) fn is_blank_key(key: &SecretString) -> bool {
    key.expose_secret().trim().is_empty()
}
