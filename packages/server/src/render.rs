//! Text renderings of predictions and evidence.

use colored::Colorize;
use evidence::EvidenceSummary;
use fake_news_model::{Label, Prediction};

use crate::pipeline::{AnalysisReport, EvidenceOutcome};

/// `🟥 Fake (Fake Probability: 87.00%)` / `🟩 Real (Fake Probability: 12.50%)`
pub fn prediction_line(prediction: &Prediction) -> String {
    let marker = match prediction.label {
        Label::Fake => "🟥",
        Label::Real => "🟩",
    };
    format!(
        "{} {} (Fake Probability: {:.2}%)",
        marker,
        prediction.label,
        prediction.fake_percent()
    )
}

/// Markdown rendering: bold title, summary, "Read more" link.
pub fn evidence_markdown(outcome: &EvidenceOutcome) -> String {
    let mut blocks = Vec::new();
    if let Some(notice) = outcome.notice() {
        blocks.push(notice);
    }
    for entry in outcome.entries() {
        blocks.push(entry_markdown(entry));
    }
    blocks.join("\n\n")
}

/// Markdown for a whole run: prediction line, then the evidence section.
pub fn report_markdown(report: &AnalysisReport) -> String {
    format!(
        "{}\n\n### 🔍 Supporting Evidence\n\n{}",
        prediction_line(&report.prediction),
        evidence_markdown(&report.evidence)
    )
}

fn entry_markdown(entry: &EvidenceSummary) -> String {
    format!(
        "**{}**\n{}\n[Read more]({})",
        entry.title, entry.summary, entry.href
    )
}

/// Colored terminal rendering of the prediction line.
pub fn prediction_terminal(prediction: &Prediction) -> String {
    let line = prediction_line(prediction);
    match prediction.label {
        Label::Fake => line.bright_red().bold().to_string(),
        Label::Real => line.bright_green().bold().to_string(),
    }
}

/// Colored terminal rendering of the evidence section.
pub fn evidence_terminal(outcome: &EvidenceOutcome) -> String {
    let mut out = String::new();

    if let Some(notice) = outcome.notice() {
        let notice = match outcome {
            EvidenceOutcome::NoHits => notice.dimmed().to_string(),
            _ => notice.yellow().to_string(),
        };
        out.push_str(&notice);
        out.push('\n');
    }

    for entry in outcome.entries() {
        out.push('\n');
        out.push_str(&entry.title.bold().to_string());
        out.push('\n');
        out.push_str(&entry.summary);
        out.push('\n');
        out.push_str(&format!("{} {}", "Read more:".dimmed(), entry.href.as_str().cyan().underline()));
        out.push('\n');
    }

    out
}
