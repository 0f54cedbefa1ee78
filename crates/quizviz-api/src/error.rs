//! API error types and handling

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use quizviz_providers::ErrorClass;

/// API error types
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("Generation failed: {message}")]
    GenerationFailed {
        error_class: ErrorClass,
        message: String,
    },

    #[error("Generation timed out")]
    Timeout,

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_type) = match &self {
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "validation_error"),
            ApiError::GenerationFailed { .. } => {
                (StatusCode::INTERNAL_SERVER_ERROR, "generation_error")
            }
            ApiError::Timeout => (StatusCode::GATEWAY_TIMEOUT, "timeout"),
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error"),
        };

        let mut error = json!({
            "type": error_type,
            "message": self.to_string(),
        });
        if let ApiError::GenerationFailed { error_class, .. } = &self {
            error["errorClass"] = json!(error_class);
        }

        (status, Json(json!({ "error": error }))).into_response()
    }
}

/// Result type alias for API operations
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_bad_request_is_400() {
        let response = ApiError::BadRequest("prompt is required".into()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_generation_failure_carries_error_class() {
        let response = ApiError::GenerationFailed {
            error_class: ErrorClass::RateLimited,
            message: "providers exhausted".into(),
        }
        .into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"]["errorClass"], "rate_limited");
    }
}
