//! Evidence records passed between retriever, summarizer and renderer.

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::InvalidHit;

/// One retrieved source document relevant to a claim.
///
/// Construct through [`EvidenceHit::new`], which rejects hits without a
/// title or without an absolute http(s) link.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvidenceHit {
    pub title: String,
    pub href: Url,
    /// Body or snippet text returned by the search backend.
    pub content: String,
}

impl EvidenceHit {
    pub fn new(
        title: impl Into<String>,
        href: &str,
        content: impl Into<String>,
    ) -> Result<Self, InvalidHit> {
        let title = collapse_whitespace(&title.into());
        if title.is_empty() {
            return Err(InvalidHit::EmptyTitle);
        }

        let url = Url::parse(href.trim()).map_err(|_| InvalidHit::InvalidUrl {
            href: href.to_string(),
        })?;
        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(InvalidHit::UnsupportedScheme {
                href: href.to_string(),
            });
        }

        Ok(Self {
            title,
            href: url,
            content: content.into().trim().to_string(),
        })
    }
}

/// A condensed view of one hit.
///
/// `title` and `href` are carried over unchanged from the hit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvidenceSummary {
    pub title: String,
    pub href: Url,
    pub summary: String,
}

impl EvidenceSummary {
    pub fn for_hit(hit: &EvidenceHit, summary: impl Into<String>) -> Self {
        Self {
            title: hit.title.clone(),
            href: hit.href.clone(),
            summary: summary.into(),
        }
    }
}

pub(crate) fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
