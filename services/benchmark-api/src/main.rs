// Copyright 2025 LLM Bench Contributors
// SPDX-License-Identifier: Apache-2.0

//! Benchmark API entry point.
//!
//! # Environment variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `BENCH_HOST` | `0.0.0.0` | Bind address. |
//! | `BENCH_PORT` | `8000` | TCP port to listen on. |
//! | `BENCH_OLLAMA_BASE_URL` | `http://localhost:11434` | Ollama server. |
//! | `BENCH_GENERATE_TIMEOUT_SECS` | `300` | Per-call generation timeout. |
//! | `BENCH_MAX_CONCURRENT_JOBS` | `0` | Jobs running at once, 0 for unbounded. |
//! | `BENCH_CORS_ORIGINS` | `http://localhost:3000` | Comma-separated allowed origins. |
//! | `BENCH_LOG_FORMAT` | `pretty` | `pretty` or `json`. |
//! | `RUST_LOG` | | Log filter. |

use anyhow::Context;
use benchmark_api::{build_router, init_tracing, AppState, ServiceConfig};
use llm_bench_adapters::{OllamaClient, OllamaConfig};
use llm_bench_engine::{BenchmarkOrchestrator, OrchestratorSettings};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = ServiceConfig::load().context("failed to load configuration")?;
    init_tracing(config.log_format);

    let metrics = PrometheusBuilder::new()
        .install_recorder()
        .context("failed to install Prometheus recorder")?;

    let engine = OllamaClient::new(OllamaConfig::new(config.ollama_base_url.clone()))
        .context("failed to create Ollama client")?;
    let orchestrator = BenchmarkOrchestrator::new(
        Arc::new(engine.clone()),
        OrchestratorSettings {
            generate_timeout: config.generate_timeout(),
            max_concurrent_jobs: config.job_limit(),
        },
    );

    let app = build_router(
        AppState::new(orchestrator, engine, metrics),
        &config.cors_origins,
    );

    let addr = config.bind_addr().context("invalid bind address")?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;

    info!(
        %addr,
        ollama = %config.ollama_base_url,
        max_concurrent_jobs = config.max_concurrent_jobs,
        "benchmark API listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("benchmark API stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
