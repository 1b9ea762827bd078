//! Language-model fallback for questions no intent matches.
//!
//! Backends:
//! - **Ollama** (default): `/api/chat` on a local or LAN host.
//! - **Bedrock**: AWS Bedrock Converse API.
//!
//! Each backend makes one non-streaming call per question and returns the
//! trimmed model text. Bounding concurrency and latency is the responder's job.

pub mod bedrock;
pub mod ollama;

use std::time::Duration;

use async_trait::async_trait;

pub use bedrock::{BedrockConfig, BedrockGenerator};
pub use ollama::{OllamaConfig, OllamaGenerator};

/// Instructions sent with every question.
pub(crate) const SYSTEM_PROMPT: &str = "You are a friendly assistant on a small website. \
Answer the user's question directly in a few sentences of plain text. \
Do not use markdown.";

/// Failures of a single generation call. None of them are retried.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GenerateError {
    #[error("request to model backend failed: {0}")]
    Request(String),

    #[error("model backend returned status {0}")]
    Status(u16),

    #[error("failed to decode model response: {0}")]
    Decode(String),

    #[error("model returned an empty answer")]
    EmptyOutput,

    #[error("generation timed out after {0:?}")]
    Timeout(Duration),
}

/// Produces a free-form answer to a question.
#[async_trait]
pub trait Generator: Send + Sync {
    async fn generate(&self, question: &str) -> Result<String, GenerateError>;

    /// Backend name (for logging and `/health`).
    fn backend_name(&self) -> &str;
}

/// Trim model output, rejecting answers with no visible text.
pub(crate) fn finish(raw: &str) -> Result<String, GenerateError> {
    let text = raw.trim();
    if text.is_empty() {
        return Err(GenerateError::EmptyOutput);
    }
    Ok(text.to_string())
}
