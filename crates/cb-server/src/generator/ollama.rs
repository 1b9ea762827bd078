//! Ollama client for open-ended answers.
//!
//! Calls the Ollama HTTP API (`/api/chat`) once per question with streaming
//! disabled and returns the assistant message text.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{GenerateError, Generator, SYSTEM_PROMPT, finish};

/// Configuration for the Ollama endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct OllamaConfig {
    /// Ollama HTTP API base URL.
    #[serde(default = "default_host")]
    pub host: String,
    /// Model to use for generation.
    #[serde(default = "default_model")]
    pub model: String,
}

fn default_host() -> String {
    "http://localhost:11434".into()
}
fn default_model() -> String {
    "llama3.2:1b".into()
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            model: default_model(),
        }
    }
}

/// Ollama chat API request body.
#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    stream: bool,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

/// Ollama chat API response (only fields we need).
#[derive(Deserialize)]
struct ChatResponse {
    message: Option<ResponseMessage>,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: String,
}

pub struct OllamaGenerator {
    client: reqwest::Client,
    config: OllamaConfig,
}

impl OllamaGenerator {
    pub fn new(config: OllamaConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    fn chat_url(&self) -> String {
        format!("{}/api/chat", self.config.host.trim_end_matches('/'))
    }
}

#[async_trait]
impl Generator for OllamaGenerator {
    async fn generate(&self, question: &str) -> Result<String, GenerateError> {
        let body = ChatRequest {
            model: &self.config.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                ChatMessage {
                    role: "user",
                    content: question,
                },
            ],
            stream: false,
        };

        let response = self
            .client
            .post(self.chat_url())
            .json(&body)
            .send()
            .await
            .map_err(|e| GenerateError::Request(e.to_string()))?;

        if !response.status().is_success() {
            tracing::warn!(status = %response.status(), model = %self.config.model, "ollama returned non-200");
            return Err(GenerateError::Status(response.status().as_u16()));
        }

        let chat: ChatResponse = response
            .json()
            .await
            .map_err(|e| GenerateError::Decode(e.to_string()))?;

        let message = chat
            .message
            .ok_or_else(|| GenerateError::Decode("response has no message".into()))?;

        finish(&message.content)
    }

    fn backend_name(&self) -> &str {
        "ollama"
    }
}
