// Copyright 2025 LLM Bench Contributors
// SPDX-License-Identifier: Apache-2.0

//! Shared application state.

use llm_bench_adapters::OllamaClient;
use llm_bench_engine::BenchmarkOrchestrator;
use metrics_exporter_prometheus::PrometheusHandle;

/// State shared across all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// Job facade.
    pub orchestrator: BenchmarkOrchestrator,
    /// Engine client used for the health probe.
    pub engine: OllamaClient,
    /// Renders the Prometheus exposition.
    pub metrics: PrometheusHandle,
}

impl AppState {
    /// Create a new `AppState`.
    pub fn new(
        orchestrator: BenchmarkOrchestrator,
        engine: OllamaClient,
        metrics: PrometheusHandle,
    ) -> Self {
        Self {
            orchestrator,
            engine,
            metrics,
        }
    }
}
