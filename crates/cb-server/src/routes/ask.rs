//! Question answering endpoint.

use std::time::Instant;

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use cb_protocol::{AskRequest, AskResponse};
use uuid::Uuid;

use crate::error::{ApiError, ApiResult};
use crate::responder::AnswerSource;
use crate::state::AppState;

/// POST /ask — answer from the intent table, or from the model on a miss.
pub async fn ask(
    State(state): State<AppState>,
    payload: Result<Json<AskRequest>, JsonRejection>,
) -> ApiResult<Json<AskResponse>> {
    let Json(req) = payload?;

    if req.question.trim().is_empty() {
        return Err(ApiError::MalformedRequest(
            "question must not be empty".into(),
        ));
    }

    let request_id = Uuid::now_v7();
    let started = Instant::now();

    let answer = state
        .responder
        .ask(&req.question, req.policy)
        .await
        .inspect_err(|e| {
            tracing::warn!(
                request_id = %request_id,
                question_len = req.question.len(),
                error = %e,
                "ask failed"
            );
        })?;

    let latency_ms = started.elapsed().as_millis() as u64;
    match &answer.source {
        AnswerSource::Intent { tag } => tracing::info!(
            request_id = %request_id,
            tag = %tag,
            question_len = req.question.len(),
            latency_ms,
            "answered from intent table"
        ),
        AnswerSource::Generated { backend } => tracing::info!(
            request_id = %request_id,
            backend = %backend,
            question_len = req.question.len(),
            latency_ms,
            "answered by generator"
        ),
    }

    Ok(Json(AskResponse {
        answer: answer.text,
    }))
}
