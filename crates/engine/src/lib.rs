// Copyright 2025 LLM Bench Contributors
// SPDX-License-Identifier: Apache-2.0

//! Benchmark execution for LLM Bench.
//!
//! # Quick Start
//!
//! ```no_run
//! use llm_bench_adapters::{OllamaClient, OllamaConfig};
//! use llm_bench_core::JobConfig;
//! use llm_bench_engine::{BenchmarkOrchestrator, BenchmarkReport, OrchestratorSettings};
//! use std::sync::Arc;
//!
//! # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! let client = OllamaClient::new(OllamaConfig::default())?;
//! let orchestrator = BenchmarkOrchestrator::new(Arc::new(client), OrchestratorSettings::default());
//!
//! let job = orchestrator.run(JobConfig::new(["Why is the sky blue?"])).await?;
//! for summary in BenchmarkReport::from_job(&job).summaries {
//!     println!("{}: {:.2} t/s", summary.model, summary.response_ts);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Modules
//!
//! - [`runner`] - Drives one job through every model and prompt
//! - [`orchestrator`] - Submit/get/list/delete facade over jobs
//! - [`result`] - Per-model summaries and job reports
//! - [`markdown`] - Markdown report generation
//! - [`io`] - Writing and reading result files

#![warn(missing_docs, rust_2018_idioms)]
#![deny(unsafe_code)]

pub mod io;
pub mod markdown;
pub mod orchestrator;
pub mod result;
pub mod runner;

pub use orchestrator::{BenchmarkOrchestrator, OrchestratorSettings};
pub use result::{BenchmarkReport, ModelSummary};
pub use runner::{BenchmarkRunner, RunOutcome, RunnerSettings};
