//! AWS Bedrock generator — Converse API.
//!
//! Uses the model-agnostic Converse API, so any chat model enabled in the
//! account (Nova Lite, Claude, ...) can answer.

use async_trait::async_trait;
use aws_sdk_bedrockruntime::Client as BedrockClient;
use aws_sdk_bedrockruntime::types::{
    ContentBlock, ConversationRole, ConverseOutput, Message, SystemContentBlock,
};
use serde::Deserialize;

use super::{GenerateError, Generator, SYSTEM_PROMPT, finish};

/// Configuration for the Bedrock generator.
#[derive(Debug, Clone, Deserialize)]
pub struct BedrockConfig {
    /// Bedrock model ID (e.g., "us.amazon.nova-lite-v1:0").
    #[serde(default = "default_model_id")]
    pub model_id: String,
}

fn default_model_id() -> String {
    "us.amazon.nova-lite-v1:0".into()
}

impl Default for BedrockConfig {
    fn default() -> Self {
        Self {
            model_id: default_model_id(),
        }
    }
}

pub struct BedrockGenerator {
    client: BedrockClient,
    config: BedrockConfig,
}

impl BedrockGenerator {
    /// Create a generator with a pre-built Bedrock client.
    pub fn new(client: BedrockClient, config: BedrockConfig) -> Self {
        Self { client, config }
    }

    /// Build a client from the default AWS credential and region chain.
    pub async fn from_default_chain(config: BedrockConfig) -> Self {
        let sdk_config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
        Self::new(BedrockClient::new(&sdk_config), config)
    }
}

#[async_trait]
impl Generator for BedrockGenerator {
    async fn generate(&self, question: &str) -> Result<String, GenerateError> {
        let user_message = Message::builder()
            .role(ConversationRole::User)
            .content(ContentBlock::Text(question.to_string()))
            .build()
            .map_err(|e| GenerateError::Request(format!("failed to build message: {e}")))?;

        let response = self
            .client
            .converse()
            .model_id(&self.config.model_id)
            .system(SystemContentBlock::Text(SYSTEM_PROMPT.to_string()))
            .messages(user_message)
            .send()
            .await
            .map_err(|e| GenerateError::Request(format!("bedrock converse error: {e}")))?;

        let text = match response.output() {
            Some(ConverseOutput::Message(msg)) => first_text(msg.content()),
            _ => None,
        };

        let Some(text) = text else {
            return Err(GenerateError::Decode(
                "bedrock response has no text content".into(),
            ));
        };

        finish(&text)
    }

    fn backend_name(&self) -> &str {
        "bedrock"
    }
}

/// First text block of a model message.
fn first_text(blocks: &[ContentBlock]) -> Option<String> {
    blocks.iter().find_map(|block| match block {
        ContentBlock::Text(t) => Some(t.clone()),
        _ => None,
    })
}
