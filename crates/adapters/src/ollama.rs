// Copyright 2025 LLM Bench Contributors
// SPDX-License-Identifier: Apache-2.0

//! Ollama adapter for LLM Bench.
//!
//! This module implements [`InferenceClient`] against the Ollama HTTP API,
//! the engine LLM Bench times.
//!
//! # Endpoints
//!
//! - `GET /api/tags` - list locally available models
//! - `POST /api/chat` - one non-streaming chat generation with timings
//!
//! # Example
//!
//! ```ignore
//! use llm_bench_adapters::ollama::{OllamaClient, OllamaConfig};
//!
//! let client = OllamaClient::new(OllamaConfig::new("http://localhost:11434"))?;
//! let models = client.list_models().await?;
//! ```

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use llm_bench_core::inference::{GenerateRequest, GenerateResponse, InferenceClient};
use llm_bench_core::InferenceError;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

/// Default Ollama address.
pub const DEFAULT_BASE_URL: &str = "http://localhost:11434";

/// Connection settings for [`OllamaClient`].
#[derive(Debug, Clone)]
pub struct OllamaConfig {
    /// Base URL, without trailing slash.
    pub base_url: String,
    /// TCP connect timeout, separate from the per-call generation timeout.
    pub connect_timeout: Duration,
    /// Timeout for the model listing call.
    pub list_timeout: Duration,
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            connect_timeout: Duration::from_secs(5),
            list_timeout: Duration::from_secs(30),
        }
    }
}

impl OllamaConfig {
    /// Create a config for the given base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            ..Default::default()
        }
    }
}

/// Engine reachability as reported by [`OllamaClient::health`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OllamaHealth {
    /// Whether the model listing call succeeded.
    pub connected: bool,
    /// Number of models the engine reports.
    pub models_available: usize,
    /// Failure message when not connected.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

// Wire types

#[derive(Debug, Deserialize)]
struct TagsResponse {
    #[serde(default)]
    models: Vec<TagEntry>,
}

#[derive(Debug, Deserialize)]
struct TagEntry {
    name: String,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 1],
    stream: bool,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    model: String,
    #[serde(default)]
    created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    message: Option<ChatResponseMessage>,
    #[serde(default)]
    done: bool,
    #[serde(default)]
    total_duration: u64,
    #[serde(default)]
    load_duration: u64,
    #[serde(default)]
    prompt_eval_count: Option<u64>,
    #[serde(default)]
    prompt_eval_duration: u64,
    #[serde(default)]
    eval_count: u64,
    #[serde(default)]
    eval_duration: u64,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    #[serde(default)]
    content: String,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

impl From<ChatResponse> for GenerateResponse {
    fn from(resp: ChatResponse) -> Self {
        Self {
            model: resp.model,
            created_at: resp.created_at,
            content: resp.message.map(|m| m.content).unwrap_or_default(),
            done: resp.done,
            total_duration: resp.total_duration,
            load_duration: resp.load_duration,
            prompt_eval_count: resp.prompt_eval_count,
            prompt_eval_duration: resp.prompt_eval_duration,
            eval_count: resp.eval_count,
            eval_duration: resp.eval_duration,
        }
    }
}

/// HTTP client for an Ollama server.
///
/// Holds only connection configuration; clone or share freely.
#[derive(Debug, Clone)]
pub struct OllamaClient {
    http: reqwest::Client,
    config: OllamaConfig,
}

impl OllamaClient {
    /// Build a client. Fails only if the HTTP stack cannot be initialised.
    pub fn new(config: OllamaConfig) -> Result<Self, InferenceError> {
        let http = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout)
            .build()
            .map_err(|e| InferenceError::Unavailable(format!("failed to build HTTP client: {}", e)))?;
        Ok(Self { http, config })
    }

    /// Base URL this client talks to.
    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url, path)
    }

    /// Probe the engine by listing its models.
    pub async fn health(&self) -> OllamaHealth {
        match self.list_models().await {
            Ok(models) => OllamaHealth {
                connected: true,
                models_available: models.len(),
                error: None,
            },
            Err(e) => OllamaHealth {
                connected: false,
                models_available: 0,
                error: Some(e.to_string()),
            },
        }
    }
}

/// Map a transport-level failure onto the inference error taxonomy.
fn classify(err: reqwest::Error, timeout: Duration) -> InferenceError {
    if err.is_timeout() {
        InferenceError::Timeout(timeout)
    } else if err.is_decode() {
        InferenceError::InvalidResponse(err.to_string())
    } else {
        InferenceError::Unavailable(err.to_string())
    }
}

/// Turn a non-success response into a model error, keeping Ollama's message.
async fn rejection(resp: reqwest::Response) -> InferenceError {
    let status = resp.status();
    let body = resp.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorBody>(&body)
        .map(|b| b.error)
        .unwrap_or(body);
    if status.is_server_error() && message.is_empty() {
        InferenceError::Unavailable(format!("engine returned {}", status))
    } else {
        InferenceError::Model(format!("{} ({})", message, status))
    }
}

#[async_trait]
impl InferenceClient for OllamaClient {
    async fn list_models(&self) -> Result<Vec<String>, InferenceError> {
        let timeout = self.config.list_timeout;
        let resp = self
            .http
            .get(self.url("/api/tags"))
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| classify(e, timeout))?;

        if !resp.status().is_success() {
            let status = resp.status();
            warn!(status = %status, "model listing rejected");
            return Err(InferenceError::Unavailable(format!(
                "model listing returned {}",
                status
            )));
        }

        let tags: TagsResponse = resp.json().await.map_err(|e| classify(e, timeout))?;
        let names: Vec<String> = tags.models.into_iter().map(|m| m.name).collect();
        debug!(count = names.len(), "listed models");
        Ok(names)
    }

    async fn generate(&self, request: &GenerateRequest) -> Result<GenerateResponse, InferenceError> {
        let body = ChatRequest {
            model: &request.model,
            messages: [ChatMessage {
                role: "user",
                content: &request.prompt,
            }],
            stream: false,
        };

        debug!(model = %request.model, timeout_secs = request.timeout.as_secs(), "sending chat request");

        let resp = self
            .http
            .post(self.url("/api/chat"))
            .timeout(request.timeout)
            .json(&body)
            .send()
            .await
            .map_err(|e| classify(e, request.timeout))?;

        if !resp.status().is_success() {
            return Err(rejection(resp).await);
        }

        let chat: ChatResponse = resp
            .json()
            .await
            .map_err(|e| classify(e, request.timeout))?;
        Ok(chat.into())
    }
}
