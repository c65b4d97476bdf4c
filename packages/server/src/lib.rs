//! FactFlow application core.
//!
//! Wires the fake-news classifier and the evidence collaborators into a
//! single pipeline, and exposes it through an interactive session, text
//! renderers and an HTTP server.
//!
//! # Modules
//!
//! - [`config`] - Environment configuration and backend construction
//! - [`pipeline`] - Classification plus evidence policy
//! - [`session`] - Submission state machine for interactive front ends
//! - [`render`] - Prediction and evidence text output
//! - [`server`] - Axum routes and HTML page

pub mod config;
pub mod pipeline;
pub mod render;
pub mod server;
pub mod session;

pub use config::{Config, ConfigOverrides, RetrieverBackend, SummarizerBackend};
pub use pipeline::{
    AnalysisReport, ClaimPipeline, EvidenceOutcome, PipelineError, EMPTY_INPUT_WARNING,
    EVIDENCE_LIMIT,
};
pub use session::{Presenter, Session, SessionState};
