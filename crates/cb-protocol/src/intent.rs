use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A named category of user input with trigger phrases and canned replies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntentRecord {
    /// Unique identifier of the intent (e.g., "greeting").
    pub tag: String,
    /// Literal phrases matched as case-insensitive substrings, in priority order.
    pub patterns: Vec<String>,
    /// Candidate replies. The first one is the canonical reply.
    pub responses: Vec<String>,
    /// Carried through from intent files; no logic reads it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context_set: Option<String>,
}

/// How a reply is chosen among an intent's responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ReplyPolicy {
    /// Always the first response.
    #[default]
    First,
    /// Uniformly random response.
    Random,
}

impl ReplyPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReplyPolicy::First => "first",
            ReplyPolicy::Random => "random",
        }
    }
}

impl fmt::Display for ReplyPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a reply policy name is not recognized.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown reply policy '{0}' (expected 'first' or 'random')")]
pub struct UnknownReplyPolicy(pub String);

impl FromStr for ReplyPolicy {
    type Err = UnknownReplyPolicy;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "first" => Ok(ReplyPolicy::First),
            "random" => Ok(ReplyPolicy::Random),
            _ => Err(UnknownReplyPolicy(s.to_string())),
        }
    }
}
