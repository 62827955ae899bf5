// Copyright 2025 LLM Bench Contributors
// SPDX-License-Identifier: Apache-2.0

//! Benchmark result types.
//!
//! A [`ModelSummary`] aggregates all metric records of one model: counts and
//! durations are summed, then rates are derived from the sums. A
//! [`BenchmarkReport`] bundles the summaries of one job for output.

use chrono::{DateTime, Utc};
use llm_bench_core::metrics::rate;
use llm_bench_core::{JobId, JobRecord, JobStatus, MetricRecord, ModelFailure};
use serde::{Deserialize, Serialize};

/// Aggregated statistics for one model across all its runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelSummary {
    /// Model identifier.
    pub model: String,
    /// Number of metric records aggregated.
    pub runs: usize,
    /// Prompt tokens across all runs.
    pub prompt_tokens: u64,
    /// Response tokens across all runs.
    pub response_tokens: u64,
    /// Model load time across all runs (s).
    pub model_load_time: f64,
    /// Prompt evaluation time across all runs (s).
    pub prompt_eval_time: f64,
    /// Response time across all runs (s).
    pub response_time: f64,
    /// End-to-end time across all runs (s).
    pub total_time: f64,
    /// Prompt evaluation throughput over the summed time (tokens/s).
    pub prompt_eval_ts: f64,
    /// Response throughput over the summed time (tokens/s).
    pub response_ts: f64,
    /// Overall throughput over the summed time (tokens/s).
    pub total_ts: f64,
}

impl ModelSummary {
    /// Aggregate `records`, all belonging to `model`.
    ///
    /// An empty slice yields a summary with zero runs and zero rates.
    pub fn from_records(model: impl Into<String>, records: &[MetricRecord]) -> Self {
        let mut summary = Self {
            model: model.into(),
            runs: records.len(),
            prompt_tokens: 0,
            response_tokens: 0,
            model_load_time: 0.0,
            prompt_eval_time: 0.0,
            response_time: 0.0,
            total_time: 0.0,
            prompt_eval_ts: 0.0,
            response_ts: 0.0,
            total_ts: 0.0,
        };

        for record in records {
            summary.prompt_tokens = summary.prompt_tokens.saturating_add(record.prompt_tokens);
            summary.response_tokens = summary
                .response_tokens
                .saturating_add(record.response_tokens);
            summary.model_load_time += record.model_load_time;
            summary.prompt_eval_time += record.prompt_eval_time;
            summary.response_time += record.response_time;
            summary.total_time += record.total_time;
        }

        summary.prompt_eval_ts = rate(summary.prompt_tokens, summary.prompt_eval_time);
        summary.response_ts = rate(summary.response_tokens, summary.response_time);
        summary.total_ts = rate(
            summary.prompt_tokens.saturating_add(summary.response_tokens),
            summary.total_time,
        );
        summary
    }
}

/// Summaries of one job, ready for printing or writing to disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkReport {
    /// Job the report was built from.
    pub job_id: JobId,
    /// Job status at the time of the snapshot.
    pub status: JobStatus,
    /// Submission time.
    pub created_at: DateTime<Utc>,
    /// Completion time, if terminal.
    pub completed_at: Option<DateTime<Utc>>,
    /// One summary per tested model, in processing order.
    pub summaries: Vec<ModelSummary>,
    /// Models cut short by a failed call.
    pub failures: Vec<ModelFailure>,
    /// Job-level failure message.
    pub error: Option<String>,
}

impl BenchmarkReport {
    /// Build a report from a job snapshot.
    ///
    /// Models appear in worklist order. A model the runner never reached
    /// (job deleted or failed early) has no entry in `results` and is left
    /// out.
    pub fn from_job(job: &JobRecord) -> Self {
        let summaries = job
            .models_tested
            .iter()
            .filter_map(|model| {
                job.results
                    .get(model)
                    .map(|records| ModelSummary::from_records(model, records))
            })
            .collect();

        Self {
            job_id: job.id,
            status: job.status,
            created_at: job.created_at,
            completed_at: job.completed_at,
            summaries,
            failures: job.failures.clone(),
            error: job.error.clone(),
        }
    }

    /// Summary for `model`, if it was tested.
    pub fn summary(&self, model: &str) -> Option<&ModelSummary> {
        self.summaries.iter().find(|s| s.model == model)
    }
}
