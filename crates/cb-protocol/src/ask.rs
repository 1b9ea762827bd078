use serde::{Deserialize, Serialize};

use crate::intent::ReplyPolicy;

/// Body of `POST /ask`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AskRequest {
    /// Free-form user question.
    pub question: String,
    /// Overrides the server's configured reply policy for this request.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub policy: Option<ReplyPolicy>,
}

/// Successful answer to `POST /ask`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AskResponse {
    pub answer: String,
}
