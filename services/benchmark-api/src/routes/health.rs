// Copyright 2025 LLM Bench Contributors
// SPDX-License-Identifier: Apache-2.0

//! Service info, health and metrics endpoints
//!
//! GET /         - name and version
//! GET /health   - inference engine reachability
//! GET /metrics  - Prometheus exposition

use axum::{extract::State, http::header, response::IntoResponse, routing::get, Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;

use crate::state::AppState;

/// Body of GET /health
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub ollama_connected: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub models_available: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/metrics", get(metrics))
}

async fn root() -> impl IntoResponse {
    Json(json!({
        "message": "LLM Benchmark API",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Always 200; an unreachable engine is reported in the body.
async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let probe = state.engine.health().await;
    let response = if probe.connected {
        HealthResponse {
            status: "healthy".to_string(),
            ollama_connected: true,
            models_available: Some(probe.models_available),
            error: None,
        }
    } else {
        HealthResponse {
            status: "unhealthy".to_string(),
            ollama_connected: false,
            models_available: None,
            error: probe.error,
        }
    };
    Json(response)
}

async fn metrics(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}
