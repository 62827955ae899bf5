// Copyright 2025 LLM Bench Contributors
// SPDX-License-Identifier: Apache-2.0

//! Benchmark job endpoints
//!
//! POST   /benchmark      - submit a job, returns immediately
//! GET    /benchmark/:id  - job snapshot with per-model averages
//! GET    /benchmarks     - list job ids
//! DELETE /benchmark/:id  - forget a job

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use llm_bench_core::job::default_prompts;
use llm_bench_core::{JobConfig, JobId, JobRecord};
use llm_bench_engine::{BenchmarkReport, ModelSummary};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// Request body for POST /benchmark
#[derive(Debug, Deserialize)]
pub struct BenchmarkRequest {
    /// Prompts to run; defaults to the built-in pair.
    #[serde(default = "default_prompts")]
    pub prompts: Vec<String>,
    /// Models to leave out.
    #[serde(default)]
    pub skip_models: Vec<String>,
    /// Log per-prompt details.
    #[serde(default)]
    pub verbose: bool,
}

impl From<BenchmarkRequest> for JobConfig {
    fn from(req: BenchmarkRequest) -> Self {
        JobConfig::new(req.prompts)
            .with_skip_models(req.skip_models)
            .with_verbose(req.verbose)
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SubmitResponse {
    pub benchmark_id: JobId,
    pub status: String,
}

/// Job snapshot as returned by GET /benchmark/:id
#[derive(Debug, Serialize)]
pub struct BenchmarkView {
    pub benchmark_id: JobId,
    #[serde(flatten)]
    pub job: JobRecord,
    pub averages: Vec<ModelSummary>,
}

impl From<JobRecord> for BenchmarkView {
    fn from(job: JobRecord) -> Self {
        let averages = BenchmarkReport::from_job(&job).summaries;
        Self {
            benchmark_id: job.id,
            job,
            averages,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct BenchmarkList {
    pub benchmarks: Vec<JobId>,
    pub total: usize,
}

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/benchmark", post(start_benchmark))
        .route("/benchmark/:id", get(get_benchmark).delete(delete_benchmark))
        .route("/benchmarks", get(list_benchmarks))
}

fn parse_id(raw: &str) -> ApiResult<JobId> {
    // an id that cannot exist is simply not found
    raw.parse().map_err(|_| ApiError::NotFound)
}

async fn start_benchmark(
    State(state): State<Arc<AppState>>,
    body: Result<Json<BenchmarkRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<SubmitResponse>)> {
    let Json(request) = body?;
    let id = state.orchestrator.submit(request.into())?;
    info!(benchmark_id = %id, "benchmark started");

    Ok((
        StatusCode::ACCEPTED,
        Json(SubmitResponse {
            benchmark_id: id,
            status: "started".to_string(),
        }),
    ))
}

async fn get_benchmark(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<BenchmarkView>> {
    let id = parse_id(&id)?;
    let job = state.orchestrator.get(&id)?;
    Ok(Json(job.into()))
}

async fn list_benchmarks(State(state): State<Arc<AppState>>) -> Json<BenchmarkList> {
    let benchmarks: Vec<JobId> = state.orchestrator.list().into_iter().map(|j| j.id).collect();
    Json(BenchmarkList {
        total: benchmarks.len(),
        benchmarks,
    })
}

async fn delete_benchmark(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<serde_json::Value>> {
    let id = parse_id(&id)?;
    state.orchestrator.delete(&id)?;
    Ok(Json(serde_json::json!({ "message": "Benchmark deleted" })))
}
