// Copyright 2025 LLM Bench Contributors
// SPDX-License-Identifier: Apache-2.0

//! Error taxonomy shared by every LLM Bench crate.
//!
//! Two layers exist:
//!
//! - [`InferenceError`] describes a failed call against the inference
//!   engine. The runner absorbs these per model; they only escape a job when
//!   the engine cannot be reached before any model starts.
//! - [`Error`] is what callers of the job store and the orchestration facade
//!   see: validation failures, unknown job ids, and wrapped inference errors.

use crate::job::JobId;
use std::time::Duration;
use thiserror::Error;

/// Errors raised by an [`InferenceClient`](crate::inference::InferenceClient).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InferenceError {
    /// The engine could not be reached (connection refused, DNS, reset).
    #[error("Inference engine unavailable: {0}")]
    Unavailable(String),

    /// No response arrived within the per-call timeout.
    #[error("Inference request timed out after {0:?}")]
    Timeout(Duration),

    /// The engine rejected the model (unknown, failed to load, bad request).
    #[error("Model error: {0}")]
    Model(String),

    /// The engine answered but the body could not be decoded.
    #[error("Invalid response from inference engine: {0}")]
    InvalidResponse(String),
}

impl InferenceError {
    /// Short machine-readable kind, used in failure records and metrics labels.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Unavailable(_) => "unavailable",
            Self::Timeout(_) => "timeout",
            Self::Model(_) => "model",
            Self::InvalidResponse(_) => "invalid_response",
        }
    }
}

/// Errors surfaced to callers of the job store and orchestration facade.
#[derive(Debug, Error)]
pub enum Error {
    /// Malformed submission, rejected before any job record exists.
    #[error("Validation error: {0}")]
    Validation(String),

    /// The referenced job does not exist (never created or deleted).
    #[error("Benchmark not found: {0}")]
    NotFound(JobId),

    /// Inference engine failure that reached the caller.
    #[error(transparent)]
    Inference(#[from] InferenceError),
}

impl Error {
    /// Create a validation error.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Whether this error means the job id is unknown.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

/// Result type for job and orchestration operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inference_error_kinds() {
        assert_eq!(InferenceError::Timeout(Duration::from_secs(5)).kind(), "timeout");
        assert_eq!(InferenceError::Unavailable("x".into()).kind(), "unavailable");
        assert_eq!(InferenceError::Model("x".into()).kind(), "model");
        assert_eq!(
            InferenceError::InvalidResponse("x".into()).kind(),
            "invalid_response"
        );
    }

    #[test]
    fn test_inference_error_converts_transparently() {
        let err: Error = InferenceError::Model("model 'foo' not found".into()).into();
        assert_eq!(err.to_string(), "Model error: model 'foo' not found");
        assert!(!err.is_not_found());
    }

    #[test]
    fn test_not_found_message_contains_id() {
        let id = JobId::new();
        let err = Error::NotFound(id);
        assert!(err.is_not_found());
        assert!(err.to_string().contains(&id.to_string()));
    }
}
