// Copyright 2025 LLM Bench Contributors
// SPDX-License-Identifier: Apache-2.0

//! API error type and its JSON rendering.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use serde_json::json;
use thiserror::Error;

/// Errors returned by route handlers.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Malformed request body or parameters.
    #[error("{0}")]
    BadRequest(String),

    /// Unknown benchmark id.
    #[error("Benchmark not found")]
    NotFound,

    /// Anything else.
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    fn parts(&self) -> (StatusCode, &'static str) {
        match self {
            Self::BadRequest(_) => (StatusCode::BAD_REQUEST, "INVALID_REQUEST"),
            Self::NotFound => (StatusCode::NOT_FOUND, "BENCHMARK_NOT_FOUND"),
            Self::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        }
    }
}

impl From<llm_bench_core::Error> for ApiError {
    fn from(err: llm_bench_core::Error) -> Self {
        use llm_bench_core::Error;
        match err {
            Error::Validation(msg) => Self::BadRequest(msg),
            Error::NotFound(_) => Self::NotFound,
            Error::Inference(e) => Self::Internal(e.to_string()),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = self.parts();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }

        let body = Json(json!({
            "error": {
                "code": code,
                "message": self.to_string(),
            },
            "meta": {
                "timestamp": Utc::now().to_rfc3339(),
            }
        }));
        (status, body).into_response()
    }
}

/// Result type for route handlers.
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use llm_bench_core::JobId;

    #[test]
    fn test_core_errors_map_to_status() {
        let not_found: ApiError = llm_bench_core::Error::NotFound(JobId::new()).into();
        assert_eq!(not_found.parts().0, StatusCode::NOT_FOUND);

        let invalid: ApiError = llm_bench_core::Error::validation("prompts must not be empty").into();
        assert_eq!(invalid.parts().0, StatusCode::BAD_REQUEST);
        assert_eq!(invalid.to_string(), "prompts must not be empty");
    }

    #[test]
    fn test_response_status() {
        let response = ApiError::Internal("boom".into()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
