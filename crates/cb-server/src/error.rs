//! Unified API error type with Axum `IntoResponse` support.

use std::time::Duration;

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use crate::generator::GenerateError;

/// API error type that converts to proper HTTP responses.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Body missing, not JSON, missing `question`, or an empty question.
    #[error("malformed request: {0}")]
    MalformedRequest(String),

    /// The language model call failed.
    #[error("model inference failed: {0}")]
    Inference(String),

    /// The language model did not answer within the configured bound.
    #[error("model inference timed out after {0:?}")]
    InferenceTimeout(Duration),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::MalformedRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Inference(_) => StatusCode::BAD_GATEWAY,
            ApiError::InferenceTimeout(_) => StatusCode::GATEWAY_TIMEOUT,
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            ApiError::MalformedRequest(_) => "malformed_request",
            ApiError::Inference(_) => "model_inference_failure",
            ApiError::InferenceTimeout(_) => "model_inference_timeout",
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::MalformedRequest(rejection.body_text())
    }
}

impl From<GenerateError> for ApiError {
    fn from(err: GenerateError) -> Self {
        match err {
            GenerateError::Timeout(elapsed) => ApiError::InferenceTimeout(elapsed),
            // Backend detail stays in the logs.
            _ => ApiError::Inference("the language model could not produce an answer".into()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = json!({
            "error": self.to_string(),
            "kind": self.kind(),
            "status": status.as_u16(),
        });

        (status, axum::Json(body)).into_response()
    }
}

/// Convenience alias.
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    async fn body_json(response: Response) -> serde_json::Value {
        let body = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn malformed_request_response() {
        let err = ApiError::MalformedRequest("missing field `question`".into());
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let json = body_json(response).await;
        assert_eq!(json["status"], 400);
        assert_eq!(json["kind"], "malformed_request");
        assert!(json["error"].as_str().unwrap().contains("question"));
    }

    #[tokio::test]
    async fn inference_failure_hides_backend_detail() {
        let err: ApiError = GenerateError::Request("connection refused (os error 111)".into()).into();
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

        let json = body_json(response).await;
        assert_eq!(json["kind"], "model_inference_failure");
        assert!(!json["error"].as_str().unwrap().contains("os error"));
    }

    #[tokio::test]
    async fn timeout_response() {
        let err: ApiError = GenerateError::Timeout(Duration::from_secs(30)).into();
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::GATEWAY_TIMEOUT);

        let json = body_json(response).await;
        assert_eq!(json["kind"], "model_inference_timeout");
        assert!(json["error"].as_str().unwrap().contains("30s"));
    }

    #[tokio::test]
    async fn sub_second_timeout_reports_millis() {
        let err: ApiError = GenerateError::Timeout(Duration::from_millis(200)).into();
        assert_eq!(err.to_string(), "model inference timed out after 200ms");
    }
}
