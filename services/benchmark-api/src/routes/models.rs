// Copyright 2025 LLM Bench Contributors
// SPDX-License-Identifier: Apache-2.0

//! GET /models - models the inference engine serves

use axum::{extract::State, routing::get, Json, Router};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::state::AppState;

#[derive(Debug, Serialize, Deserialize)]
pub struct ModelList {
    pub models: Vec<String>,
}

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/models", get(list_models))
}

/// An unreachable engine yields an empty list rather than an error.
async fn list_models(State(state): State<Arc<AppState>>) -> Json<ModelList> {
    Json(ModelList {
        models: state.orchestrator.available_models().await,
    })
}
