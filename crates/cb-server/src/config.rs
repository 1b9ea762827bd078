//! Chatbot server configuration, loadable from TOML or environment.

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use cb_protocol::ReplyPolicy;
use serde::Deserialize;
use tokio::sync::Semaphore;

use crate::generator::bedrock::BedrockConfig;
use crate::generator::ollama::OllamaConfig;

/// Which language-model backend answers unmatched questions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum GeneratorBackend {
    /// Ollama HTTP API (local or LAN host).
    #[default]
    Ollama,
    /// AWS Bedrock Converse API.
    Bedrock,
}

impl FromStr for GeneratorBackend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ollama" => Ok(Self::Ollama),
            "bedrock" => Ok(Self::Bedrock),
            _ => Err(ConfigError::Invalid {
                key: "GENERATOR_BACKEND",
                value: s.to_string(),
            }),
        }
    }
}

/// Configuration errors surface at startup, before the listener binds.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid value for {key}: '{value}'")]
    Invalid { key: &'static str, value: String },

    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Top-level server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Listen address (e.g., "0.0.0.0").
    #[serde(default = "default_host")]
    pub host: String,
    /// Listen port.
    #[serde(default = "default_port")]
    pub port: u16,
    /// JSON intent file. None uses the built-in table.
    #[serde(default)]
    pub intents_path: Option<PathBuf>,
    /// Reply policy applied when a request does not pick one.
    #[serde(default)]
    pub reply_policy: ReplyPolicy,
    /// Generations allowed in flight at once.
    #[serde(default = "default_max_concurrent_generations")]
    pub max_concurrent_generations: usize,
    /// Upper bound on a single generation call.
    #[serde(default = "default_generation_timeout_secs")]
    pub generation_timeout_secs: u64,
    #[serde(default)]
    pub generator: GeneratorBackend,
    #[serde(default)]
    pub ollama: OllamaConfig,
    #[serde(default)]
    pub bedrock: BedrockConfig,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_max_concurrent_generations() -> usize {
    1
}

fn default_generation_timeout_secs() -> u64 {
    30
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            intents_path: None,
            reply_policy: ReplyPolicy::default(),
            max_concurrent_generations: default_max_concurrent_generations(),
            generation_timeout_secs: default_generation_timeout_secs(),
            generator: GeneratorBackend::default(),
            ollama: OllamaConfig::default(),
            bedrock: BedrockConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Load config from the TOML file named by `CHATBOT_CONFIG`, or from
    /// individual environment variables when it is unset.
    pub fn load() -> Result<Self, ConfigError> {
        match std::env::var("CHATBOT_CONFIG") {
            Ok(path) => Self::from_file(&path),
            Err(_) => Self::from_env(),
        }
    }

    /// Load config from a TOML file path.
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: PathBuf::from(path),
            source,
        })?;
        Self::from_toml(&contents)
    }

    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load config from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build config from an arbitrary key lookup. Unset keys keep their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(host) = lookup("CHATBOT_HOST") {
            config.host = host;
        }
        if let Some(port) = lookup("CHATBOT_PORT") {
            config.port = parse_value("CHATBOT_PORT", &port)?;
        }
        if let Some(path) = lookup("INTENTS_PATH") {
            config.intents_path = Some(PathBuf::from(path));
        }
        if let Some(policy) = lookup("REPLY_POLICY") {
            config.reply_policy = policy.parse().map_err(|_| ConfigError::Invalid {
                key: "REPLY_POLICY",
                value: policy,
            })?;
        }
        if let Some(n) = lookup("MAX_CONCURRENT_GENERATIONS") {
            config.max_concurrent_generations = parse_value("MAX_CONCURRENT_GENERATIONS", &n)?;
        }
        if let Some(secs) = lookup("GENERATION_TIMEOUT_SECS") {
            config.generation_timeout_secs = parse_value("GENERATION_TIMEOUT_SECS", &secs)?;
        }
        if let Some(backend) = lookup("GENERATOR_BACKEND") {
            config.generator = backend.parse()?;
        }
        if let Some(host) = lookup("OLLAMA_HOST") {
            config.ollama.host = host;
        }
        if let Some(model) = lookup("OLLAMA_MODEL") {
            config.ollama.model = model;
        }
        if let Some(model_id) = lookup("BEDROCK_MODEL_ID") {
            config.bedrock.model_id = model_id;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn generation_timeout(&self) -> Duration {
        Duration::from_secs(self.generation_timeout_secs)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.max_concurrent_generations == 0
            || self.max_concurrent_generations > Semaphore::MAX_PERMITS
        {
            return Err(ConfigError::Invalid {
                key: "max_concurrent_generations",
                value: self.max_concurrent_generations.to_string(),
            });
        }
        if self.generation_timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                key: "generation_timeout_secs",
                value: "0".into(),
            });
        }
        Ok(())
    }
}

fn parse_value<T: FromStr>(key: &'static str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::Invalid {
        key,
        value: value.to_string(),
    })
}
