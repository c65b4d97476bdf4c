//! OpenAI chat-completion summarizer.
//!
//! One request per hit, sent sequentially so summaries stay aligned with
//! the hits they came from.

use std::time::Duration;

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::{EvidenceSummarizer, NO_CONTENT};
use crate::error::{SummarizeError, SummarizeResult};
use crate::retriever::is_blank_key;
use crate::types::{EvidenceHit, EvidenceSummary};

/// Source text sent to the model is capped at this many bytes.
const MAX_SOURCE_BYTES: usize = 12_000;

const SYSTEM_PROMPT: &str = "You summarize web sources for a fact-checking tool. \
Write two or three neutral sentences stating what the source says. \
Do not add facts that are not in the source.";

#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
}

#[derive(Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Deserialize)]
struct ChatResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Summarizer backed by OpenAI's chat completions endpoint.
pub struct OpenAISummarizer {
    client: reqwest::Client,
    api_key: SecretString,
    model: String,
    base_url: String,
}

impl OpenAISummarizer {
    /// Default chat model.
    pub const DEFAULT_MODEL: &'static str = "gpt-4o-mini";

    pub fn new(api_key: impl Into<SecretString>) -> SummarizeResult<Self> {
        Self::with_timeout(api_key, crate::retriever::DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(
        api_key: impl Into<SecretString>,
        timeout: Duration,
    ) -> SummarizeResult<Self> {
        let api_key = api_key.into();
        if is_blank_key(&api_key) {
            return Err(SummarizeError::Config("OpenAI API key is empty".into()));
        }

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SummarizeError::Http(Box::new(e)))?;

        Ok(Self {
            client,
            api_key,
            model: Self::DEFAULT_MODEL.to_string(),
            base_url: "https://api.openai.com/v1".to_string(),
        })
    }

    /// Set the chat model (default: gpt-4o-mini).
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set a custom base URL (for Azure, proxies, etc.).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    async fn summarize_hit(&self, hit: &EvidenceHit) -> SummarizeResult<String> {
        if hit.content.is_empty() {
            return Ok(NO_CONTENT.to_string());
        }

        let request = ChatRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: SYSTEM_PROMPT.to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: user_prompt(hit),
                },
            ],
            temperature: 0.0,
        };

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key.expose_secret()))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "OpenAI request failed");
                SummarizeError::Http(Box::new(e))
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            warn!(status = %status, "OpenAI API error");
            return Err(SummarizeError::Api(format!("{}: {}", status, error_text)));
        }

        let chat_response: ChatResponse = response
            .json()
            .await
            .map_err(|e| SummarizeError::Api(e.to_string()))?;

        summary_from_response(chat_response, hit)
    }
}

#[async_trait]
impl EvidenceSummarizer for OpenAISummarizer {
    fn name(&self) -> &'static str {
        "openai"
    }

    async fn summarize(&self, hits: &[EvidenceHit]) -> SummarizeResult<Vec<EvidenceSummary>> {
        let mut summaries = Vec::with_capacity(hits.len());
        for hit in hits {
            let summary = self.summarize_hit(hit).await?;
            debug!(href = %hit.href, "Summarized source");
            summaries.push(EvidenceSummary::for_hit(hit, summary));
        }
        Ok(summaries)
    }
}

fn user_prompt(hit: &EvidenceHit) -> String {
    format!(
        "Title: {}\nURL: {}\n\nSource text:\n{}",
        hit.title,
        hit.href,
        truncate_bytes(&hit.content, MAX_SOURCE_BYTES)
    )
}

fn summary_from_response(response: ChatResponse, hit: &EvidenceHit) -> SummarizeResult<String> {
    let text = response
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .map(|c| c.trim().to_string())
        .unwrap_or_default();

    if text.is_empty() {
        return Err(SummarizeError::EmptySummary {
            href: hit.href.to_string(),
        });
    }
    Ok(text)
}

/// Longest prefix of `text` within `max` bytes, ending on a char boundary.
fn truncate_bytes(text: &str, max: usize) -> &str {
    if text.len() <= max {
        return text;
    }
    let mut end = max;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    &text[..end]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hit() -> EvidenceHit {
        EvidenceHit::new("Moon facts", "https://science.nasa.gov/moon/", "Rock.").unwrap()
    }

    #[test]
    fn test_builder() {
        let summarizer = OpenAISummarizer::new("sk-test")
            .unwrap()
            .with_model("gpt-4o")
            .with_base_url("http://localhost:9999/v1");
        assert_eq!(summarizer.model(), "gpt-4o");
        assert_eq!(summarizer.base_url, "http://localhost:9999/v1");
    }

    #[test]
    fn test_blank_key_rejected() {
        assert!(matches!(
            OpenAISummarizer::new(""),
            Err(SummarizeError::Config(_))
        ));
    }

    #[test]
    fn test_truncate_bytes_respects_char_boundary() {
        assert_eq!(truncate_bytes("abc", 10), "abc");
        // 'é' is two bytes
        assert_eq!(truncate_bytes("aé", 2), "a");
        assert_eq!(truncate_bytes("aé", 3), "aé");
    }

    #[test]
    fn test_summary_from_response() {
        let body: ChatResponse = serde_json::from_str(
            r#"{"choices":[{"message":{"role":"assistant","content":"  The Moon is rock.  "}}]}"#,
        )
        .unwrap();
        assert_eq!(summary_from_response(body, &hit()).unwrap(), "The Moon is rock.");

        let empty: ChatResponse =
            serde_json::from_str(r#"{"choices":[{"message":{"content":null}}]}"#).unwrap();
        assert!(matches!(
            summary_from_response(empty, &hit()),
            Err(SummarizeError::EmptySummary { .. })
        ));

        let none: ChatResponse = serde_json::from_str(r#"{"choices":[]}"#).unwrap();
        assert!(summary_from_response(none, &hit()).is_err());
    }

    #[test]
    fn test_user_prompt_contains_source() {
        let prompt = user_prompt(&hit());
        assert!(prompt.contains("Moon facts"));
        assert!(prompt.contains("https://science.nasa.gov/moon/"));
        assert!(prompt.ends_with("Rock."));
    }

    // Requires a real OpenAI API key
    #[tokio::test]
    #[ignore]
    async fn test_openai_summarize() {
        let api_key = std::env::var("OPENAI_API_KEY").expect("OPENAI_API_KEY required");
        let summarizer = OpenAISummarizer::new(api_key).unwrap();

        let summaries = summarizer.summarize(&[hit()]).await.unwrap();
        assert_eq!(summaries.len(), 1);
        assert!(!summaries[0].summary.is_empty());
    }
}
