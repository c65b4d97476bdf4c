//! DuckDuckGo HTML results retriever.
//!
//! Needs no API key: queries the static HTML endpoint and reads the
//! result blocks. Ads are skipped and redirect links (`/l/?uddg=…`) are
//! resolved to their target.

use std::time::Duration;

use async_trait::async_trait;
use lazy_static::lazy_static;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, warn};
use url::Url;

use super::{http_client, search_query, EvidenceRetriever, DEFAULT_SEARCH_RESULTS, DEFAULT_TIMEOUT};
use crate::error::{RetrievalError, RetrievalResult};
use crate::types::{collapse_whitespace, EvidenceHit};

const BACKEND: &str = "duckduckgo";

lazy_static! {
    static ref RESULT_SELECTOR: Selector = Selector::parse("div.result").unwrap();
    static ref LINK_SELECTOR: Selector = Selector::parse("a.result__a").unwrap();
    static ref SNIPPET_SELECTOR: Selector = Selector::parse(".result__snippet").unwrap();
}

/// Retriever scraping DuckDuckGo's HTML search page.
pub struct DuckDuckGoRetriever {
    client: reqwest::Client,
    endpoint: String,
    max_results: usize,
}

impl DuckDuckGoRetriever {
    pub fn new() -> RetrievalResult<Self> {
        Self::with_timeout(DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(timeout: Duration) -> RetrievalResult<Self> {
        Ok(Self {
            client: http_client(timeout)?,
            endpoint: "https://html.duckduckgo.com/html/".to_string(),
            max_results: DEFAULT_SEARCH_RESULTS,
        })
    }

    /// Number of results to keep from the page.
    pub fn with_max_results(mut self, max_results: usize) -> Self {
        self.max_results = max_results.max(1);
        self
    }

    /// Override the results page URL.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }
}

#[async_trait]
impl EvidenceRetriever for DuckDuckGoRetriever {
    fn name(&self) -> &'static str {
        BACKEND
    }

    async fn retrieve(&self, claim: &str) -> RetrievalResult<Vec<EvidenceHit>> {
        let query = search_query(claim);

        let response = self
            .client
            .get(&self.endpoint)
            .query(&[("q", query.as_str())])
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "DuckDuckGo request failed");
                RetrievalError::Http(Box::new(e))
            })?;

        let status = response.status();
        if !status.is_success() {
            warn!(status = %status, "DuckDuckGo returned an error page");
            return Err(RetrievalError::Api {
                backend: BACKEND,
                status: status.as_u16(),
            });
        }

        let html = response
            .text()
            .await
            .map_err(|e| RetrievalError::Http(Box::new(e)))?;

        Ok(parse_results(&html, self.max_results))
    }
}

/// Extract up to `limit` hits from a DuckDuckGo HTML results page.
pub(crate) fn parse_results(html: &str, limit: usize) -> Vec<EvidenceHit> {
    let document = Html::parse_document(html);

    let mut hits = Vec::new();
    for result in document.select(&RESULT_SELECTOR) {
        if hits.len() >= limit {
            break;
        }
        if result.value().classes().any(|c| c == "result--ad") {
            continue;
        }

        let Some(link) = result.select(&LINK_SELECTOR).next() else {
            continue;
        };
        let Some(raw_href) = link.value().attr("href") else {
            continue;
        };
        let Some(href) = resolve_href(raw_href) else {
            debug!(href = raw_href, "Skipping DuckDuckGo result with unusable link");
            continue;
        };

        let title = element_text(&link);
        let snippet = result
            .select(&SNIPPET_SELECTOR)
            .next()
            .map(|s| element_text(&s))
            .unwrap_or_default();

        match EvidenceHit::new(title, href.as_str(), snippet) {
            Ok(hit) => hits.push(hit),
            Err(reason) => debug!(%href, %reason, "Skipping DuckDuckGo result"),
        }
    }

    hits
}

fn element_text(element: &ElementRef<'_>) -> String {
    collapse_whitespace(&element.text().collect::<String>())
}

/// Turn a result link into the target URL.
///
/// Handles protocol-relative links and `duckduckgo.com/l/?uddg=` redirects.
fn resolve_href(raw: &str) -> Option<Url> {
    let absolute = if raw.starts_with("//") {
        format!("https:{}", raw)
    } else if raw.starts_with('/') {
        format!("https://duckduckgo.com{}", raw)
    } else {
        raw.to_string()
    };

    let url = Url::parse(&absolute).ok()?;
    let is_redirect = url
        .host_str()
        .map(|h| h == "duckduckgo.com" || h.ends_with(".duckduckgo.com"))
        .unwrap_or(false)
        && url.path() == "/l/";

    if is_redirect {
        let target = url
            .query_pairs()
            .find(|(key, _)| key == "uddg")
            .map(|(_, value)| value.into_owned())?;
        return Url::parse(&target).ok();
    }

    Some(url)
}
