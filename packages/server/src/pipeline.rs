//! One claim in, one analysis out.
//!
//! Classification always runs first and its result is final. Evidence is
//! gathered afterwards and resolves to exactly one [`EvidenceOutcome`];
//! collaborator failures degrade the evidence section instead of failing
//! the run.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use evidence::{
    check_summaries, snippet, EvidenceHit, EvidenceRetriever, EvidenceSummarizer,
    EvidenceSummary, SNIPPET_CHARS,
};
use fake_news_model::{ClassifyError, ModelArtifacts, Prediction};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Number of retrieved hits passed to the summarizer.
pub const EVIDENCE_LIMIT: usize = 3;

/// Deadline for retrieval plus summarization when none is configured.
pub const DEFAULT_EVIDENCE_TIMEOUT: Duration = Duration::from_secs(90);

/// Warning shown for blank submissions.
pub const EMPTY_INPUT_WARNING: &str = "Please enter something.";

#[derive(Debug, Error)]
pub enum PipelineError {
    /// Blank or whitespace-only claim
    #[error("Please enter something.")]
    EmptyInput,

    #[error("classification failed: {0}")]
    Classify(#[from] ClassifyError),
}

/// How the evidence section of a run resolved.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum EvidenceOutcome {
    /// One summary per consumed hit, in retriever order
    Summarized { summaries: Vec<EvidenceSummary> },

    /// The retriever found nothing usable
    NoHits,

    /// The retriever failed
    RetrievalFailed { reason: String },

    /// The summarizer failed; entries hold snippets of each hit instead
    Snippets {
        reason: String,
        summaries: Vec<EvidenceSummary>,
    },
}

impl EvidenceOutcome {
    /// Entries to display, in order.
    pub fn entries(&self) -> &[EvidenceSummary] {
        match self {
            EvidenceOutcome::Summarized { summaries }
            | EvidenceOutcome::Snippets { summaries, .. } => summaries,
            EvidenceOutcome::NoHits | EvidenceOutcome::RetrievalFailed { .. } => &[],
        }
    }

    /// Status line shown above (or instead of) the entries.
    pub fn notice(&self) -> Option<String> {
        match self {
            EvidenceOutcome::Summarized { .. } => None,
            EvidenceOutcome::NoHits => Some("No supporting evidence found.".to_string()),
            EvidenceOutcome::RetrievalFailed { reason } => Some(format!(
                "⚠️ Could not retrieve supporting evidence: {}",
                reason
            )),
            EvidenceOutcome::Snippets { reason, .. } => Some(format!(
                "⚠️ Summaries unavailable ({}); showing source snippets.",
                reason
            )),
        }
    }

    pub fn status(&self) -> &'static str {
        match self {
            EvidenceOutcome::Summarized { .. } => "summarized",
            EvidenceOutcome::NoHits => "no_hits",
            EvidenceOutcome::RetrievalFailed { .. } => "retrieval_failed",
            EvidenceOutcome::Snippets { .. } => "snippets",
        }
    }
}

/// Result of one pipeline run.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub claim: String,
    pub prediction: Prediction,
    pub evidence: EvidenceOutcome,
}

/// Classification plus evidence for submitted claims.
///
/// Holds the loaded model and the two evidence collaborators; cheap to
/// share behind an `Arc` across requests.
pub struct ClaimPipeline {
    artifacts: Arc<ModelArtifacts>,
    retriever: Arc<dyn EvidenceRetriever>,
    summarizer: Arc<dyn EvidenceSummarizer>,
    evidence_timeout: Duration,
}

impl ClaimPipeline {
    pub fn new(
        artifacts: Arc<ModelArtifacts>,
        retriever: Arc<dyn EvidenceRetriever>,
        summarizer: Arc<dyn EvidenceSummarizer>,
    ) -> Self {
        Self {
            artifacts,
            retriever,
            summarizer,
            evidence_timeout: DEFAULT_EVIDENCE_TIMEOUT,
        }
    }

    /// Give up on evidence after `timeout`; the prediction is kept.
    pub fn with_evidence_timeout(mut self, timeout: Duration) -> Self {
        self.evidence_timeout = timeout;
        self
    }

    pub fn evidence_timeout(&self) -> Duration {
        self.evidence_timeout
    }

    pub fn artifacts(&self) -> &ModelArtifacts {
        &self.artifacts
    }

    pub fn retriever_name(&self) -> &'static str {
        self.retriever.name()
    }

    pub fn summarizer_name(&self) -> &'static str {
        self.summarizer.name()
    }

    /// Score a claim. Blank claims are rejected before the model runs.
    pub fn classify(&self, claim: &str) -> Result<Prediction, PipelineError> {
        if is_blank(claim) {
            return Err(PipelineError::EmptyInput);
        }

        let prediction = self.artifacts.classify(claim)?;
        debug!(
            label = %prediction.label,
            fake_probability = prediction.fake_probability,
            "Classified claim"
        );
        Ok(prediction)
    }

    /// Retrieve and summarize sources for a claim.
    ///
    /// The raw claim is sent to the retriever; at most
    /// [`EVIDENCE_LIMIT`] hits reach the summarizer, in retriever order.
    /// A lookup that outlives the evidence timeout counts as a failed
    /// retrieval.
    pub async fn gather_evidence(&self, claim: &str) -> EvidenceOutcome {
        match tokio::time::timeout(self.evidence_timeout, self.collect_evidence(claim)).await {
            Ok(outcome) => outcome,
            Err(_) => {
                warn!(
                    timeout_secs = self.evidence_timeout.as_secs(),
                    "Evidence lookup timed out"
                );
                EvidenceOutcome::RetrievalFailed {
                    reason: format!(
                        "timed out after {} seconds",
                        self.evidence_timeout.as_secs()
                    ),
                }
            }
        }
    }

    async fn collect_evidence(&self, claim: &str) -> EvidenceOutcome {
        let hits = match self.retriever.retrieve(claim).await {
            Ok(hits) => hits,
            Err(e) => {
                warn!(retriever = self.retriever.name(), error = %e, "Evidence retrieval failed");
                return EvidenceOutcome::RetrievalFailed {
                    reason: e.to_string(),
                };
            }
        };

        if hits.is_empty() {
            info!(retriever = self.retriever.name(), "No evidence found");
            return EvidenceOutcome::NoHits;
        }

        let consumed = &hits[..hits.len().min(EVIDENCE_LIMIT)];
        debug!(
            retrieved = hits.len(),
            consumed = consumed.len(),
            "Summarizing evidence"
        );

        let result = self
            .summarizer
            .summarize(consumed)
            .await
            .and_then(|summaries| check_summaries(consumed, &summaries).map(|_| summaries));

        match result {
            Ok(summaries) => EvidenceOutcome::Summarized { summaries },
            Err(e) => {
                warn!(summarizer = self.summarizer.name(), error = %e, "Summarization failed, using snippets");
                EvidenceOutcome::Snippets {
                    reason: e.to_string(),
                    summaries: snippets_for(consumed),
                }
            }
        }
    }

    /// Run the whole pipeline for one claim.
    pub async fn analyze(&self, claim: &str) -> Result<AnalysisReport, PipelineError> {
        let prediction = self.classify(claim)?;
        let evidence = self.gather_evidence(claim).await;
        Ok(AnalysisReport::new(claim, prediction, evidence))
    }
}

impl AnalysisReport {
    pub fn new(claim: &str, prediction: Prediction, evidence: EvidenceOutcome) -> Self {
        let report = Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            claim: claim.to_string(),
            prediction,
            evidence,
        };
        info!(
            run_id = %report.id,
            label = %report.prediction.label,
            evidence = report.evidence.status(),
            "Analysis complete"
        );
        report
    }
}

pub fn is_blank(claim: &str) -> bool {
    claim.trim().is_empty()
}

fn snippets_for(hits: &[EvidenceHit]) -> Vec<EvidenceSummary> {
    hits.iter()
        .map(|hit| EvidenceSummary::for_hit(hit, snippet(&hit.content, SNIPPET_CHARS)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notices() {
        assert_eq!(
            EvidenceOutcome::Summarized { summaries: vec![] }.notice(),
            None
        );
        assert_eq!(
            EvidenceOutcome::NoHits.notice().unwrap(),
            "No supporting evidence found."
        );
        assert_eq!(
            EvidenceOutcome::RetrievalFailed {
                reason: "timeout".into()
            }
            .notice()
            .unwrap(),
            "⚠️ Could not retrieve supporting evidence: timeout"
        );
        assert_eq!(
            EvidenceOutcome::Snippets {
                reason: "quota".into(),
                summaries: vec![]
            }
            .notice()
            .unwrap(),
            "⚠️ Summaries unavailable (quota); showing source snippets."
        );
    }

    #[test]
    fn test_outcome_serializes_with_status_tag() {
        let json = serde_json::to_value(EvidenceOutcome::RetrievalFailed {
            reason: "offline".into(),
        })
        .unwrap();
        assert_eq!(json["status"], "retrieval_failed");
        assert_eq!(json["reason"], "offline");

        let json = serde_json::to_value(EvidenceOutcome::NoHits).unwrap();
        assert_eq!(json["status"], "no_hits");
    }

    #[test]
    fn test_is_blank() {
        assert!(is_blank(""));
        assert!(is_blank(" \n\t "));
        assert!(!is_blank(" x "));
    }
}
