//! Evidence Retrieval and Summarization
//!
//! Looks up web sources for a claim and condenses them for display.
//!
//! ```rust,ignore
//! use evidence::{DuckDuckGoRetriever, EvidenceRetriever, EvidenceSummarizer, ExtractiveSummarizer};
//!
//! let retriever = DuckDuckGoRetriever::new()?;
//! let hits = retriever.retrieve("The moon is made of cheese").await?;
//! let summaries = ExtractiveSummarizer::default().summarize(&hits[..3.min(hits.len())]).await?;
//! ```
//!
//! # Modules
//!
//! - [`retriever`] - Search backends returning [`EvidenceHit`]s
//! - [`summarizer`] - Summarizers producing [`EvidenceSummary`]s
//! - [`testing`] - Mock implementations for testing

pub mod error;
pub mod retriever;
pub mod summarizer;
pub mod testing;
pub mod types;

pub use error::{InvalidHit, RetrievalError, RetrievalResult, SummarizeError, SummarizeResult};
pub use retriever::{
    search_query, DuckDuckGoRetriever, EvidenceRetriever, TavilyRetriever, DEFAULT_SEARCH_RESULTS,
    DEFAULT_TIMEOUT,
};
pub use secrecy::{ExposeSecret, SecretString};
pub use summarizer::{
    check_summaries, snippet, EvidenceSummarizer, ExtractiveSummarizer, OpenAISummarizer,
    NO_CONTENT, SNIPPET_CHARS,
};
pub use testing::{MockRetriever, MockSummarizer, MockSummaryMode};
pub use types::{EvidenceHit, EvidenceSummary};
