//! Provider adapters for Textract, OpenAI vision chat and Vertex AI
//!
//! Each adapter prepares the image, issues a single call, records its
//! estimated cost and returns one answer per question. `OcrClient::ocr` picks the adapter.

pub mod google;
pub mod image;
pub mod openai;
pub mod prompt;
pub mod textract;

use crate::config::Config;
use crate::error::{EvalError, Result};
use crate::metrics::METRICS;
use reqwest::Client;
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::time::{Duration, Instant};
use tokio::sync::OnceCell;
use tracing::{error, info};

/// External document question-answering backend
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    OpenAi,
    Google,
    Textract,
}

impl Provider {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OpenAi => "openai",
            Self::Google => "google",
            Self::Textract => "textract",
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Provider {
    type Err = EvalError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "openai" => Ok(Self::OpenAi),
            "google" => Ok(Self::Google),
            "textract" | "aws" => Ok(Self::Textract),
            _ => Err(EvalError::UnsupportedProvider(s.to_string())),
        }
    }
}

/// One provider answer
#[derive(Debug, Clone, PartialEq)]
pub struct Answer {
    /// `None` when the provider had no answer
    pub text: Option<String>,
    /// Provider-reported confidence (Textract only)
    pub confidence: Option<f32>,
}

impl Answer {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            confidence: None,
        }
    }

    pub fn missing() -> Self {
        Self {
            text: None,
            confidence: None,
        }
    }
}

/// What an adapter returns
#[derive(Debug, Clone)]
pub struct ProviderReply {
    pub answers: Vec<Answer>,
    pub cost_usd: f64,
    pub elapsed: Duration,
}

impl ProviderReply {
    pub fn from_texts(texts: Vec<String>, cost_usd: f64, elapsed: Duration) -> Self {
        Self {
            answers: texts.into_iter().map(Answer::new).collect(),
            cost_usd,
            elapsed,
        }
    }
}

/// Dispatches questions to the selected provider
pub struct OcrClient {
    config: Config,
    http: Client,
    textract: OnceCell<aws_sdk_textract::Client>,
}

impl OcrClient {
    /// Create a new client
    pub fn new(config: Config) -> Result<Self> {
        let http = Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| EvalError::RequestFailed(e.to_string()))?;

        Ok(Self {
            config,
            http,
            textract: OnceCell::new(),
        })
    }

    /// Ask `questions` about `image` and return one answer per question, in order.
    ///
    /// Fails with `AnswerCountMismatch` rather than returning misaligned answers.
    pub async fn ocr(
        &self,
        provider: Provider,
        image: &Path,
        questions: &[String],
    ) -> Result<Vec<Answer>> {
        let start = Instant::now();

        let result = match provider {
            Provider::OpenAi => {
                let api_key = self.config.openai_api_key()?;
                openai::ask(&self.http, &self.config.openai, &api_key, image, questions).await
            }
            Provider::Google => google::ask(&self.http, &self.config.google, image, questions).await,
            Provider::Textract => {
                let client = self
                    .textract
                    .get_or_init(|| textract::build_client(&self.config.textract))
                    .await;
                textract::ask(client, image, questions).await
            }
        };

        let seconds = start.elapsed().as_secs_f64();
        let reply = match result {
            Ok(reply) => reply,
            Err(e) => {
                METRICS.record_provider_call(provider.as_str(), false, seconds);
                error!("{} call failed for {}: {}", provider, image.display(), e);
                return Err(e);
            }
        };
        METRICS.record_provider_call(provider.as_str(), true, seconds);

        if reply.answers.len() != questions.len() {
            return Err(EvalError::AnswerCountMismatch {
                expected: questions.len(),
                found: reply.answers.len(),
            });
        }

        info!(
            "{} answered {} questions in {:.2}s (est. ${:.5})",
            provider,
            questions.len(),
            reply.elapsed.as_secs_f64(),
            reply.cost_usd
        );
        Ok(reply.answers)
    }
}
