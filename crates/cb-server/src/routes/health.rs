//! Health check endpoint.

use axum::Json;
use axum::extract::State;
use serde_json::{Value, json};

use crate::state::AppState;

/// GET /health — liveness check.
pub async fn health(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "intents": state.responder.intents().len(),
        "generator": state.responder.generator_name(),
    }))
}
