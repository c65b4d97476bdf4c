//! Testing utilities including mock implementations.
//!
//! These let callers exercise the evidence pipeline without making real
//! search or LLM calls.

use async_trait::async_trait;
use std::sync::{Arc, RwLock};

use crate::error::{RetrievalError, RetrievalResult, SummarizeError, SummarizeResult};
use crate::retriever::EvidenceRetriever;
use crate::summarizer::{EvidenceSummarizer, NO_CONTENT};
use crate::types::{EvidenceHit, EvidenceSummary};

/// Build `count` distinct hits (`Source 1` at `https://source1.example.com/`, ...).
pub fn sample_hits(count: usize) -> Vec<EvidenceHit> {
    (1..=count)
        .map(|i| {
            EvidenceHit::new(
                format!("Source {}", i),
                &format!("https://source{}.example.com/", i),
                format!("Body of source {}. It has two sentences.", i),
            )
            .unwrap()
        })
        .collect()
}

/// A mock retriever returning canned hits.
#[derive(Default)]
pub struct MockRetriever {
    hits: Vec<EvidenceHit>,

    /// Error message to fail with instead of returning hits
    failure: Option<String>,

    /// Claims received, for assertions
    calls: Arc<RwLock<Vec<String>>>,
}

impl MockRetriever {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return these hits for every claim.
    pub fn with_hits(mut self, hits: Vec<EvidenceHit>) -> Self {
        self.hits = hits;
        self
    }

    /// Fail every call with a retrieval error.
    pub fn failing(mut self, message: impl Into<String>) -> Self {
        self.failure = Some(message.into());
        self
    }

    /// Claims this retriever has been asked about.
    pub fn calls(&self) -> Vec<String> {
        self.calls.read().unwrap().clone()
    }
}

#[async_trait]
impl EvidenceRetriever for MockRetriever {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn retrieve(&self, claim: &str) -> RetrievalResult<Vec<EvidenceHit>> {
        self.calls.write().unwrap().push(claim.to_string());

        match &self.failure {
            Some(message) => Err(RetrievalError::Parse {
                backend: "mock",
                reason: message.clone(),
            }),
            None => Ok(self.hits.clone()),
        }
    }
}

/// How [`MockSummarizer`] responds.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum MockSummaryMode {
    /// Summary is `Summary of <title>`
    #[default]
    Echo,
    /// Every call fails with an API error
    Fail(String),
    /// Returns summaries in reverse order
    Reversed,
    /// Drops the last summary
    Short,
}

/// A mock summarizer with configurable behavior.
#[derive(Default)]
pub struct MockSummarizer {
    mode: MockSummaryMode,

    /// Batch sizes received, for assertions
    batches: Arc<RwLock<Vec<usize>>>,
}

impl MockSummarizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_mode(mut self, mode: MockSummaryMode) -> Self {
        self.mode = mode;
        self
    }

    /// Fail every call with an API error.
    pub fn failing(self, message: impl Into<String>) -> Self {
        self.with_mode(MockSummaryMode::Fail(message.into()))
    }

    /// Sizes of the batches this summarizer was called with.
    pub fn batches(&self) -> Vec<usize> {
        self.batches.read().unwrap().clone()
    }

    /// The summary text [`MockSummaryMode::Echo`] produces for a hit.
    pub fn echo_summary(hit: &EvidenceHit) -> String {
        if hit.content.is_empty() {
            NO_CONTENT.to_string()
        } else {
            format!("Summary of {}", hit.title)
        }
    }
}

#[async_trait]
impl EvidenceSummarizer for MockSummarizer {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn summarize(&self, hits: &[EvidenceHit]) -> SummarizeResult<Vec<EvidenceSummary>> {
        self.batches.write().unwrap().push(hits.len());

        let mut summaries: Vec<EvidenceSummary> = hits
            .iter()
            .map(|hit| EvidenceSummary::for_hit(hit, Self::echo_summary(hit)))
            .collect();

        match &self.mode {
            MockSummaryMode::Echo => {}
            MockSummaryMode::Fail(message) => return Err(SummarizeError::Api(message.clone())),
            MockSummaryMode::Reversed => summaries.reverse(),
            MockSummaryMode::Short => {
                summaries.pop();
            }
        }

        Ok(summaries)
    }
}
