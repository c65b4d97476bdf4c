use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, bail, Context, Result};
use dotenvy::dotenv;
use evidence::{
    DuckDuckGoRetriever, EvidenceRetriever, EvidenceSummarizer, ExtractiveSummarizer,
    OpenAISummarizer, SecretString, TavilyRetriever,
};
use fake_news_model::{ArtifactPaths, DEFAULT_MODEL_PATH, DEFAULT_VECTORIZER_PATH};

use crate::pipeline::EVIDENCE_LIMIT;

/// Slack on top of the collaborator timeouts for one evidence lookup.
const EVIDENCE_TIMEOUT_MARGIN: Duration = Duration::from_secs(5);

/// Search backend used for evidence retrieval.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetrieverBackend {
    Tavily,
    DuckDuckGo,
}

impl FromStr for RetrieverBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "tavily" => Ok(Self::Tavily),
            "duckduckgo" | "ddg" => Ok(Self::DuckDuckGo),
            other => Err(anyhow!(
                "unknown retriever '{}' (expected tavily or duckduckgo)",
                other
            )),
        }
    }
}

/// Backend used to condense retrieved sources.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SummarizerBackend {
    OpenAI,
    Extractive,
}

impl FromStr for SummarizerBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "openai" => Ok(Self::OpenAI),
            "extractive" => Ok(Self::Extractive),
            other => Err(anyhow!(
                "unknown summarizer '{}' (expected openai or extractive)",
                other
            )),
        }
    }
}

/// Command line values that take precedence over the environment.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub model_path: Option<PathBuf>,
    pub vectorizer_path: Option<PathBuf>,
    pub retriever: Option<RetrieverBackend>,
    pub summarizer: Option<SummarizerBackend>,
}

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub model_path: PathBuf,
    pub vectorizer_path: PathBuf,
    pub port: u16,
    pub retriever: RetrieverBackend,
    pub tavily_api_key: Option<SecretString>,
    pub search_results: usize,
    pub summarizer: SummarizerBackend,
    pub openai_api_key: Option<SecretString>,
    pub openai_model: String,
    pub summary_sentences: usize,
    pub http_timeout: Duration,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Backend keys are not checked here; call [`validate`](Self::validate)
    /// once any command line overrides have been applied.
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a configuration from any key/value source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let tavily_api_key = var("TAVILY_API_KEY").map(SecretString::from);
        let openai_api_key = var("OPENAI_API_KEY").map(SecretString::from);

        let retriever = match var("FACTFLOW_RETRIEVER") {
            Some(name) => name
                .parse::<RetrieverBackend>()
                .context("FACTFLOW_RETRIEVER is invalid")?,
            None if tavily_api_key.is_some() => RetrieverBackend::Tavily,
            None => RetrieverBackend::DuckDuckGo,
        };

        let summarizer = match var("FACTFLOW_SUMMARIZER") {
            Some(name) => name
                .parse::<SummarizerBackend>()
                .context("FACTFLOW_SUMMARIZER is invalid")?,
            None if openai_api_key.is_some() => SummarizerBackend::OpenAI,
            None => SummarizerBackend::Extractive,
        };

        Ok(Self {
            model_path: var("FACTFLOW_MODEL_PATH")
                .unwrap_or_else(|| DEFAULT_MODEL_PATH.to_string())
                .into(),
            vectorizer_path: var("FACTFLOW_VECTORIZER_PATH")
                .unwrap_or_else(|| DEFAULT_VECTORIZER_PATH.to_string())
                .into(),
            port: var("PORT")
                .unwrap_or_else(|| "8080".to_string())
                .parse()
                .context("PORT must be a valid number")?,
            retriever,
            tavily_api_key,
            search_results: parse_positive(var("FACTFLOW_SEARCH_RESULTS"), 5)
                .context("FACTFLOW_SEARCH_RESULTS must be a positive number")?,
            summarizer,
            openai_api_key,
            openai_model: var("OPENAI_MODEL")
                .unwrap_or_else(|| OpenAISummarizer::DEFAULT_MODEL.to_string()),
            summary_sentences: parse_positive(var("FACTFLOW_SUMMARY_SENTENCES"), 3)
                .context("FACTFLOW_SUMMARY_SENTENCES must be a positive number")?,
            http_timeout: Duration::from_secs(
                parse_positive(var("FACTFLOW_HTTP_TIMEOUT_SECS"), 20)
                    .context("FACTFLOW_HTTP_TIMEOUT_SECS must be a positive number")?
                    as u64,
            ),
        })
    }

    pub fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(path) = overrides.model_path {
            self.model_path = path;
        }
        if let Some(path) = overrides.vectorizer_path {
            self.vectorizer_path = path;
        }
        if let Some(backend) = overrides.retriever {
            self.retriever = backend;
        }
        if let Some(backend) = overrides.summarizer {
            self.summarizer = backend;
        }
    }

    /// Check that each selected backend has what it needs.
    pub fn validate(&self) -> Result<()> {
        if self.retriever == RetrieverBackend::Tavily && self.tavily_api_key.is_none() {
            bail!("TAVILY_API_KEY must be set to use the tavily retriever");
        }
        if self.summarizer == SummarizerBackend::OpenAI && self.openai_api_key.is_none() {
            bail!("OPENAI_API_KEY must be set to use the openai summarizer");
        }
        Ok(())
    }

    /// Budget for one evidence lookup: a search call plus one summarizer
    /// call per consumed hit.
    pub fn evidence_timeout(&self) -> Duration {
        self.http_timeout * (1 + EVIDENCE_LIMIT as u32) + EVIDENCE_TIMEOUT_MARGIN
    }

    pub fn artifact_paths(&self) -> ArtifactPaths {
        ArtifactPaths {
            model: self.model_path.clone(),
            vectorizer: self.vectorizer_path.clone(),
        }
    }

    /// Construct the configured retriever.
    pub fn build_retriever(&self) -> Result<Arc<dyn EvidenceRetriever>> {
        let retriever: Arc<dyn EvidenceRetriever> = match self.retriever {
            RetrieverBackend::Tavily => {
                let key = self
                    .tavily_api_key
                    .clone()
                    .context("TAVILY_API_KEY must be set to use the tavily retriever")?;
                Arc::new(
                    TavilyRetriever::with_timeout(key, self.http_timeout)
                        .context("Failed to create Tavily retriever")?
                        .with_max_results(self.search_results),
                )
            }
            RetrieverBackend::DuckDuckGo => Arc::new(
                DuckDuckGoRetriever::with_timeout(self.http_timeout)
                    .context("Failed to create DuckDuckGo retriever")?
                    .with_max_results(self.search_results),
            ),
        };
        Ok(retriever)
    }

    /// Construct the configured summarizer.
    pub fn build_summarizer(&self) -> Result<Arc<dyn EvidenceSummarizer>> {
        let summarizer: Arc<dyn EvidenceSummarizer> = match self.summarizer {
            SummarizerBackend::OpenAI => {
                let key = self
                    .openai_api_key
                    .clone()
                    .context("OPENAI_API_KEY must be set to use the openai summarizer")?;
                Arc::new(
                    OpenAISummarizer::with_timeout(key, self.http_timeout)
                        .context("Failed to create OpenAI summarizer")?
                        .with_model(self.openai_model.clone()),
                )
            }
            SummarizerBackend::Extractive => {
                Arc::new(ExtractiveSummarizer::new(self.summary_sentences))
            }
        };
        Ok(summarizer)
    }
}

fn parse_positive(value: Option<String>, default: usize) -> Result<usize> {
    let Some(value) = value else {
        return Ok(default);
    };
    let parsed: usize = value.trim().parse()?;
    if parsed == 0 {
        bail!("must be greater than zero");
    }
    Ok(parsed)
}
