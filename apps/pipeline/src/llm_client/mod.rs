//! LLM client — the single point of entry for all inference-endpoint calls.
//!
//! ARCHITECTURAL RULE: no other module may talk to the endpoint directly.
//! Transport and parse failures are downgraded to typed statuses HERE and
//! never cross this boundary as errors — one invocation, one outcome.
//!
//! The endpoint is any OpenAI-chat-completions-compatible server (Ollama,
//! vLLM, ...) hosting a local model. Inference is slow, so the call timeout
//! is on the order of minutes and each invocation performs exactly one call:
//! retry policy belongs to the orchestrator, which chooses none.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

pub mod parse;
pub mod prompts;

use crate::models::{Extraction, ExtractionStatus};

/// Deterministic sampling — minimizes output variance across runs.
const TEMPERATURE: f32 = 0.0;
/// How much of an unparseable reply to keep in the log.
const REPLY_SNIPPET_LEN: usize = 300;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("endpoint reply contained no choices")]
    EmptyReply,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Debug, Deserialize)]
struct ChatReply {
    content: String,
}

/// Extraction backend seam. The dispatcher only sees this trait, so tests
/// substitute a scripted endpoint and the pipeline never notices.
#[async_trait]
pub trait Extractor: Send + Sync {
    async fn extract(&self, text: &str) -> Extraction;
}

/// Client for the local inference endpoint.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    api_url: String,
    model: String,
}

impl LlmClient {
    pub fn new(api_url: String, model: String, timeout: Duration) -> Self {
        Self {
            client: Client::builder()
                .timeout(timeout)
                .build()
                .expect("Failed to build HTTP client"),
            api_url,
            model,
        }
    }

    /// One chat completion: returns the first choice's message text.
    async fn chat(&self, prompt: &str) -> Result<String, LlmError> {
        let request_body = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            temperature: TEMPERATURE,
        };

        let response = self
            .client
            .post(&self.api_url)
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(LlmError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let reply: ChatResponse = response.json().await?;
        reply
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or(LlmError::EmptyReply)
    }

    /// One extraction attempt for one reduced page.
    ///
    /// Empty or whitespace-only text short-circuits to `NoContent` without
    /// touching the network. Every other path performs exactly one inference
    /// call and returns a typed outcome — this method cannot fail.
    pub async fn extract(&self, text: &str) -> Extraction {
        if text.trim().is_empty() {
            return Extraction::failed(ExtractionStatus::NoContent);
        }

        let prompt = prompts::build_extraction_prompt(text);
        let content = match self.chat(&prompt).await {
            Ok(content) => content,
            // A 2xx reply whose body is not the expected chat shape is a
            // parse failure, not a transport failure.
            Err(LlmError::EmptyReply) => {
                warn!("endpoint reply had no choices");
                return Extraction::failed(ExtractionStatus::ParseFailed);
            }
            Err(LlmError::Http(e)) if e.is_decode() => {
                warn!("endpoint reply body was not chat-shaped: {e}");
                return Extraction::failed(ExtractionStatus::ParseFailed);
            }
            Err(e) => {
                warn!("inference call failed: {e}");
                return Extraction::failed(ExtractionStatus::CallFailed);
            }
        };

        match parse::parse_reply(&content) {
            Some(parsed) => {
                debug!(strategy = ?parsed.strategy, "model reply parsed");
                Extraction::ok(parsed.lists.qualifications, parsed.lists.preferred)
            }
            None => {
                warn!("unparseable model reply: {}", snippet(&content));
                Extraction::failed(ExtractionStatus::ParseFailed)
            }
        }
    }

    /// Sends one tiny completion to verify the endpoint is up before a batch
    /// is started.
    pub async fn health_check(&self) -> Result<(), LlmError> {
        self.chat(prompts::HEALTH_CHECK_PROMPT).await.map(|_| ())
    }
}

#[async_trait]
impl Extractor for LlmClient {
    async fn extract(&self, text: &str) -> Extraction {
        LlmClient::extract(self, text).await
    }
}

/// First `REPLY_SNIPPET_LEN` characters of a reply, for log lines.
fn snippet(content: &str) -> &str {
    let end = content
        .char_indices()
        .nth(REPLY_SNIPPET_LEN)
        .map_or(content.len(), |(i, _)| i);
    &content[..end]
}
