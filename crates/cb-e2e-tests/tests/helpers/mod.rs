//! Shared test harness for E2E integration tests.
//!
//! Runs the real router, intent table, responder and Ollama generator,
//! with a `wiremock` server standing in for the Ollama HTTP API.

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use tower::ServiceExt;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use cb_server::generator::{OllamaConfig, OllamaGenerator};
use cb_server::intents::IntentTable;
use cb_server::responder::ResponderOptions;
use cb_server::routes::build_router;
use cb_server::state::AppState;

/// End-to-end test harness: router backed by a mock Ollama server.
pub struct TestHarness {
    /// Axum router for HTTP requests via `tower::oneshot`.
    pub router: Router,
    /// Mock Ollama API. Expectations are verified when it drops.
    pub ollama: MockServer,
}

impl TestHarness {
    /// Built-in intents, default responder options.
    pub async fn start() -> Self {
        Self::with_options(ResponderOptions::default()).await
    }

    pub async fn with_options(options: ResponderOptions) -> Self {
        Self::with_table(IntentTable::builtin().unwrap(), options).await
    }

    pub async fn with_table(table: IntentTable, options: ResponderOptions) -> Self {
        let ollama = MockServer::start().await;
        let generator = OllamaGenerator::new(OllamaConfig {
            host: ollama.uri(),
            model: "llama3.2:1b".into(),
        });
        let state = AppState::from_parts(table, Arc::new(generator), options);

        Self {
            router: build_router(state),
            ollama,
        }
    }

    /// Make the mock model answer every chat request with `content`.
    /// `expected_calls` is checked when the harness drops.
    pub async fn model_answers(&self, content: &str, expected_calls: u64) {
        self.mount(
            ResponseTemplate::new(200).set_body_json(ollama_response(content)),
            Some(expected_calls),
        )
        .await;
    }

    /// Make the mock model answer after `delay`.
    pub async fn model_answers_after(&self, content: &str, delay: Duration) {
        self.mount(
            ResponseTemplate::new(200)
                .set_body_json(ollama_response(content))
                .set_delay(delay),
            None,
        )
        .await;
    }

    /// Make the mock model fail with an HTTP status.
    pub async fn model_fails(&self, status: u16) {
        self.mount(ResponseTemplate::new(status), Some(1)).await;
    }

    /// The model must never be called.
    pub async fn model_unused(&self) {
        self.mount(ResponseTemplate::new(200), Some(0)).await;
    }

    async fn mount(&self, template: ResponseTemplate, expected_calls: Option<u64>) {
        let mock = Mock::given(method("POST"))
            .and(path("/api/chat"))
            .respond_with(template);
        let mock = match expected_calls {
            Some(n) => mock.expect(n),
            None => mock,
        };
        mock.mount(&self.ollama).await;
    }

    /// POST /ask with `{"question": question}`.
    pub async fn ask(&self, question: &str) -> (StatusCode, serde_json::Value) {
        let body = serde_json::json!({ "question": question });
        self.post_ask(&body.to_string()).await
    }

    /// POST /ask with a question and an explicit reply policy.
    pub async fn ask_with_policy(
        &self,
        question: &str,
        policy: &str,
    ) -> (StatusCode, serde_json::Value) {
        let body = serde_json::json!({ "question": question, "policy": policy });
        self.post_ask(&body.to_string()).await
    }

    /// POST /ask with a raw JSON body.
    /// Returns (HTTP status code, response JSON body).
    pub async fn post_ask(&self, body: &str) -> (StatusCode, serde_json::Value) {
        let response = self
            .router
            .clone()
            .oneshot(
                Request::post("/ask")
                    .header("content-type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();

        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        (status, json)
    }
}

/// Build an Ollama chat response body.
pub fn ollama_response(content: &str) -> serde_json::Value {
    serde_json::json!({
        "model": "llama3.2:1b",
        "message": {
            "role": "assistant",
            "content": content
        },
        "done": true
    })
}
