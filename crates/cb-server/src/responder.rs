//! Intent-first responder with language-model fallback.
//!
//! Tries the intent table first. If no pattern matches, the question goes
//! to the generator. Matched questions never touch the model and never wait
//! on it.
//!
//! Generation is bounded two ways:
//! - a semaphore caps generations in flight (one by default); extra
//!   requests queue for a permit;
//! - each call is cut off after the configured timeout, which starts once
//!   the permit is held.

use std::sync::Arc;
use std::time::Duration;

use cb_protocol::ReplyPolicy;
use tokio::sync::Semaphore;
use tokio::time::timeout;

use crate::generator::{GenerateError, Generator};
use crate::intents::IntentTable;

/// Where an answer came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnswerSource {
    Intent { tag: String },
    Generated { backend: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Answer {
    pub text: String,
    pub source: AnswerSource,
}

/// Tuning knobs for [`Responder`].
#[derive(Debug, Clone)]
pub struct ResponderOptions {
    pub default_policy: ReplyPolicy,
    pub max_concurrent_generations: usize,
    pub generation_timeout: Duration,
}

impl Default for ResponderOptions {
    fn default() -> Self {
        Self {
            default_policy: ReplyPolicy::First,
            max_concurrent_generations: 1,
            generation_timeout: Duration::from_secs(30),
        }
    }
}

pub struct Responder {
    intents: Arc<IntentTable>,
    generator: Arc<dyn Generator>,
    default_policy: ReplyPolicy,
    generation_permits: Semaphore,
    generation_timeout: Duration,
}

impl Responder {
    pub fn new(
        intents: Arc<IntentTable>,
        generator: Arc<dyn Generator>,
        options: ResponderOptions,
    ) -> Self {
        Self {
            intents,
            generator,
            default_policy: options.default_policy,
            generation_permits: Semaphore::new(
                options
                    .max_concurrent_generations
                    .clamp(1, Semaphore::MAX_PERMITS),
            ),
            generation_timeout: options.generation_timeout,
        }
    }

    /// Answer a question. `policy` overrides the default reply policy.
    pub async fn ask(
        &self,
        question: &str,
        policy: Option<ReplyPolicy>,
    ) -> Result<Answer, GenerateError> {
        let policy = policy.unwrap_or(self.default_policy);

        if let Some(tag) = self.intents.match_tag(question) {
            // Tags come from the table and validated records have responses.
            if let Some(reply) = self.intents.reply_for(tag, policy) {
                tracing::debug!(tag, %policy, "intent matched");
                return Ok(Answer {
                    text: reply.to_string(),
                    source: AnswerSource::Intent {
                        tag: tag.to_string(),
                    },
                });
            }
        }

        tracing::debug!(
            backend = self.generator.backend_name(),
            "no intent matched, falling back to generator"
        );
        let text = self.generate(question).await?;
        Ok(Answer {
            text,
            source: AnswerSource::Generated {
                backend: self.generator.backend_name().to_string(),
            },
        })
    }

    async fn generate(&self, question: &str) -> Result<String, GenerateError> {
        let _permit = self
            .generation_permits
            .acquire()
            .await
            .map_err(|_| GenerateError::Request("generation pool closed".into()))?;

        match timeout(self.generation_timeout, self.generator.generate(question)).await {
            Ok(result) => result,
            Err(_) => {
                tracing::warn!(
                    timeout_ms = self.generation_timeout.as_millis() as u64,
                    backend = self.generator.backend_name(),
                    "generation timed out"
                );
                Err(GenerateError::Timeout(self.generation_timeout))
            }
        }
    }

    pub fn intents(&self) -> &IntentTable {
        &self.intents
    }

    pub fn generator_name(&self) -> &str {
        self.generator.backend_name()
    }

    /// Generation permits not currently held.
    pub fn idle_generation_slots(&self) -> usize {
        self.generation_permits.available_permits()
    }
}
