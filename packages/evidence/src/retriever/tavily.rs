//! Tavily-backed retriever.

use std::time::Duration;

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::{
    http_client, is_blank_key, search_query, EvidenceRetriever, DEFAULT_SEARCH_RESULTS,
    DEFAULT_TIMEOUT,
};
use crate::error::{RetrievalError, RetrievalResult};
use crate::types::EvidenceHit;

const BACKEND: &str = "tavily";

#[derive(Debug, Serialize)]
struct TavilyRequest {
    query: String,
    search_depth: String,
    max_results: usize,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TavilyResponse {
    #[serde(default)]
    results: Vec<TavilyResult>,
}

#[derive(Debug, Deserialize)]
struct TavilyResult {
    url: String,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    content: Option<String>,
}

/// Retriever using Tavily's search API.
pub struct TavilyRetriever {
    api_key: SecretString,
    client: reqwest::Client,
    base_url: String,
    max_results: usize,
    search_depth: String,
}

impl TavilyRetriever {
    /// Create a retriever with default limits.
    pub fn new(api_key: impl Into<SecretString>) -> RetrievalResult<Self> {
        Self::with_timeout(api_key, DEFAULT_TIMEOUT)
    }

    /// Create a retriever whose requests give up after `timeout`.
    pub fn with_timeout(api_key: impl Into<SecretString>, timeout: Duration) -> RetrievalResult<Self> {
        let api_key = api_key.into();
        if is_blank_key(&api_key) {
            return Err(RetrievalError::Config("Tavily API key is empty".into()));
        }

        Ok(Self {
            api_key,
            client: http_client(timeout)?,
            base_url: "https://api.tavily.com".to_string(),
            max_results: DEFAULT_SEARCH_RESULTS,
            search_depth: "basic".to_string(),
        })
    }

    /// Number of results to request.
    pub fn with_max_results(mut self, max_results: usize) -> Self {
        self.max_results = max_results.max(1);
        self
    }

    /// Search depth ("basic" or "advanced").
    pub fn with_search_depth(mut self, depth: impl Into<String>) -> Self {
        self.search_depth = depth.into();
        self
    }

    /// Point at a different API host (proxies, tests).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }
}

#[async_trait]
impl EvidenceRetriever for TavilyRetriever {
    fn name(&self) -> &'static str {
        BACKEND
    }

    async fn retrieve(&self, claim: &str) -> RetrievalResult<Vec<EvidenceHit>> {
        let request = TavilyRequest {
            query: search_query(claim),
            search_depth: self.search_depth.clone(),
            max_results: self.max_results,
        };

        let response = self
            .client
            .post(format!("{}/search", self.base_url))
            .header("Content-Type", "application/json")
            .header("Authorization", format!("Bearer {}", self.api_key.expose_secret()))
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "Tavily request failed");
                RetrievalError::Http(Box::new(e))
            })?;

        let status = response.status();
        if !status.is_success() {
            warn!(status = %status, "Tavily API error");
            return Err(RetrievalError::Api {
                backend: BACKEND,
                status: status.as_u16(),
            });
        }

        let body: TavilyResponse = response.json().await.map_err(|e| RetrievalError::Parse {
            backend: BACKEND,
            reason: e.to_string(),
        })?;

        Ok(hits_from_response(body))
    }
}

/// Convert a Tavily response, dropping results that are not valid hits.
pub(crate) fn hits_from_response(response: TavilyResponse) -> Vec<EvidenceHit> {
    response
        .results
        .into_iter()
        .filter_map(|r| {
            let title = r.title.unwrap_or_default();
            match EvidenceHit::new(title, &r.url, r.content.unwrap_or_default()) {
                Ok(hit) => Some(hit),
                Err(reason) => {
                    debug!(url = %r.url, %reason, "Skipping Tavily result");
                    None
                }
            }
        })
        .collect()
}
