//! Shared application state for the Axum server.
//!
//! Everything here is built once at startup and only read afterwards: the
//! intent table, the generator client and the generation semaphore all live
//! inside the [`Responder`].

use std::sync::Arc;

use anyhow::Context;

use crate::config::{GeneratorBackend, ServerConfig};
use crate::generator::{BedrockGenerator, Generator, OllamaGenerator};
use crate::intents::IntentTable;
use crate::responder::{Responder, ResponderOptions};

/// Shared application state, cheap to clone into each handler.
#[derive(Clone)]
pub struct AppState {
    pub responder: Arc<Responder>,
}

impl AppState {
    pub fn new(responder: Responder) -> Self {
        Self {
            responder: Arc::new(responder),
        }
    }

    /// Wire state from explicit parts (tests inject fake generators here).
    pub fn from_parts(
        intents: IntentTable,
        generator: Arc<dyn Generator>,
        options: ResponderOptions,
    ) -> Self {
        Self::new(Responder::new(Arc::new(intents), generator, options))
    }

    /// Built-in intents, default options, and the given generator.
    pub fn with_generator(generator: Arc<dyn Generator>) -> anyhow::Result<Self> {
        let intents = IntentTable::builtin().context("built-in intent table is invalid")?;
        Ok(Self::from_parts(
            intents,
            generator,
            ResponderOptions::default(),
        ))
    }

    /// Load the intent table and connect the configured generator.
    pub async fn from_config(config: &ServerConfig) -> anyhow::Result<Self> {
        let intents = match &config.intents_path {
            Some(path) => IntentTable::from_file(path)
                .with_context(|| format!("invalid intent file {}", path.display()))?,
            None => IntentTable::builtin().context("built-in intent table is invalid")?,
        };
        let source = config
            .intents_path
            .as_deref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "built-in".into());
        tracing::info!(intents = intents.len(), source = %source, "intent table loaded");

        let generator: Arc<dyn Generator> = match config.generator {
            GeneratorBackend::Ollama => {
                tracing::info!(
                    host = %config.ollama.host,
                    model = %config.ollama.model,
                    "ollama generator enabled"
                );
                Arc::new(OllamaGenerator::new(config.ollama.clone()))
            }
            GeneratorBackend::Bedrock => {
                tracing::info!(model_id = %config.bedrock.model_id, "bedrock generator enabled");
                Arc::new(BedrockGenerator::from_default_chain(config.bedrock.clone()).await)
            }
        };

        let options = ResponderOptions {
            default_policy: config.reply_policy,
            max_concurrent_generations: config.max_concurrent_generations,
            generation_timeout: config.generation_timeout(),
        };

        Ok(Self::from_parts(intents, generator, options))
    }
}
