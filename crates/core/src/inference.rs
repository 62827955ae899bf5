// Copyright 2025 LLM Bench Contributors
// SPDX-License-Identifier: Apache-2.0

//! Inference engine contract.
//!
//! The engine itself is external. This module only fixes the two calls the
//! benchmark needs and the raw timing payload a generation returns, so that
//! the runner can be driven by the Ollama adapter in production and by a
//! mock in tests.

use crate::error::InferenceError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default per-call generation timeout. Model load time can dominate the
/// first call against a cold model, so this is deliberately long.
pub const DEFAULT_GENERATE_TIMEOUT: Duration = Duration::from_secs(300);

/// A single timed generation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateRequest {
    /// Model identifier as reported by `list_models`.
    pub model: String,
    /// Prompt text sent as a single user message.
    pub prompt: String,
    /// Upper bound for the whole call, including model load.
    pub timeout: Duration,
}

impl GenerateRequest {
    /// Create a request with the default timeout.
    pub fn new(model: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            prompt: prompt.into(),
            timeout: DEFAULT_GENERATE_TIMEOUT,
        }
    }

    /// Override the per-call timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Raw generation result with the engine's token counts and timings.
///
/// All durations are nanoseconds, exactly as the engine reports them.
/// Conversion to seconds and rate derivation live in
/// [`MetricRecord::from_response`](crate::metrics::MetricRecord::from_response).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GenerateResponse {
    /// Model that served the request.
    pub model: String,
    /// Engine-side creation timestamp.
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    /// Generated text.
    #[serde(default)]
    pub content: String,
    /// Whether the engine marked the generation as finished.
    #[serde(default)]
    pub done: bool,
    /// End-to-end duration, model load included.
    #[serde(default)]
    pub total_duration: u64,
    /// Time spent loading the model.
    #[serde(default)]
    pub load_duration: u64,
    /// Prompt token count. Absent when the engine served the prompt from cache.
    #[serde(default)]
    pub prompt_eval_count: Option<u64>,
    /// Time spent evaluating the prompt.
    #[serde(default)]
    pub prompt_eval_duration: u64,
    /// Response token count.
    #[serde(default)]
    pub eval_count: u64,
    /// Time spent generating the response.
    #[serde(default)]
    pub eval_duration: u64,
}

/// Client for an inference engine exposing "list models" and "generate".
///
/// Implementations hold no mutable shared state and must be safe to use from
/// several runners at once.
#[cfg_attr(any(test, feature = "mock"), mockall::automock)]
#[async_trait]
pub trait InferenceClient: Send + Sync {
    /// List the models the engine can serve, in engine order.
    async fn list_models(&self) -> Result<Vec<String>, InferenceError>;

    /// Run one generation and return its raw timing payload.
    async fn generate(&self, request: &GenerateRequest) -> Result<GenerateResponse, InferenceError>;
}
