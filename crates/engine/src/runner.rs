// Copyright 2025 LLM Bench Contributors
// SPDX-License-Identifier: Apache-2.0

//! Benchmark runner.
//!
//! Drives one job from `pending` to a terminal status:
//!
//! 1. claim the job (`pending → running`), fetch the engine's model list and
//!    subtract the excluded models;
//! 2. for each model in engine order, run every prompt in request order,
//!    appending one [`MetricRecord`] per successful call;
//! 3. a failed call skips the rest of that model's prompts and the runner
//!    moves on to the next model;
//! 4. once every model is processed the job is `completed`.
//!
//! Only a job-level blocker (engine unreachable while listing, empty
//! worklist) ends a job in `error`. The job record in the store is the sole
//! channel back to observers. If the record disappears mid-run the runner
//! stops without recreating it.

use llm_bench_core::inference::{GenerateRequest, InferenceClient, DEFAULT_GENERATE_TIMEOUT};
use llm_bench_core::{Error, JobId, JobStatus, JobStore, MetricRecord, ModelFailure, Result};
use metrics::{counter, histogram};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Message recorded when filtering leaves nothing to benchmark.
pub const NO_MODELS_AVAILABLE: &str = "no models available";

/// Runner tuning.
#[derive(Debug, Clone)]
pub struct RunnerSettings {
    /// Timeout applied to every generation call.
    pub generate_timeout: Duration,
}

impl Default for RunnerSettings {
    fn default() -> Self {
        Self {
            generate_timeout: DEFAULT_GENERATE_TIMEOUT,
        }
    }
}

/// How a [`BenchmarkRunner::run`] call ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// Every model was processed.
    Completed {
        /// Models in the worklist.
        models: usize,
        /// Metric records collected.
        measurements: usize,
        /// Models cut short by a failed call.
        failed_models: usize,
    },
    /// The job ended in `error` with this message.
    Failed(String),
    /// The job was deleted while running.
    Abandoned,
    /// Another runner already owns the job, or it is no longer pending.
    NotClaimed,
}

/// Drives jobs through the inference client and records results in the store.
pub struct BenchmarkRunner {
    store: Arc<JobStore>,
    client: Arc<dyn InferenceClient>,
    settings: RunnerSettings,
}

impl BenchmarkRunner {
    /// Create a runner writing into `store`.
    pub fn new(
        store: Arc<JobStore>,
        client: Arc<dyn InferenceClient>,
        settings: RunnerSettings,
    ) -> Self {
        Self {
            store,
            client,
            settings,
        }
    }

    /// Run a job to completion.
    ///
    /// Never fails: job-level problems are written to the record, and a
    /// vanished record yields [`RunOutcome::Abandoned`].
    pub async fn run(&self, id: JobId) -> RunOutcome {
        match self.drive(id).await {
            Ok(outcome) => {
                match &outcome {
                    RunOutcome::Completed { .. } => {
                        counter!("llm_bench_jobs_completed_total").increment(1)
                    }
                    RunOutcome::Failed(_) => {
                        counter!("llm_bench_jobs_failed_total").increment(1)
                    }
                    _ => {}
                }
                outcome
            }
            Err(Error::NotFound(_)) => {
                info!(job_id = %id, "job deleted while running, runner stopping");
                RunOutcome::Abandoned
            }
            Err(e) => {
                // drive() only surfaces store errors; keep the record consistent anyway
                let message = e.to_string();
                warn!(job_id = %id, error = %message, "runner aborted");
                match self.store.mutate(&id, |job| job.fail(message.clone())) {
                    Ok(()) => RunOutcome::Failed(message),
                    Err(_) => RunOutcome::Abandoned,
                }
            }
        }
    }

    async fn drive(&self, id: JobId) -> Result<RunOutcome> {
        let claimed = self.store.mutate(&id, |job| {
            if job.status == JobStatus::Pending {
                job.start();
                Some(job.config.clone())
            } else {
                None
            }
        })?;
        let Some(config) = claimed else {
            debug!(job_id = %id, "job not pending, skipping");
            return Ok(RunOutcome::NotClaimed);
        };

        info!(
            job_id = %id,
            prompts = config.prompts.len(),
            skip_models = ?config.skip_models,
            verbose = config.verbose,
            "benchmark started"
        );

        let available = match self.client.list_models().await {
            Ok(models) => models,
            Err(e) => {
                let message = format!("failed to list models: {}", e);
                warn!(job_id = %id, error = %e, "inference engine unreachable");
                self.store.mutate(&id, |job| job.fail(message.clone()))?;
                return Ok(RunOutcome::Failed(message));
            }
        };

        let worklist = config.worklist(available);
        if worklist.is_empty() {
            warn!(job_id = %id, "model worklist is empty");
            self.store.mutate(&id, |job| job.fail(NO_MODELS_AVAILABLE))?;
            return Ok(RunOutcome::Failed(NO_MODELS_AVAILABLE.to_string()));
        }

        info!(job_id = %id, models = ?worklist, "evaluating models");
        self.store.mutate(&id, |job| job.set_worklist(worklist.clone()))?;

        let prompts_per_model = config.prompts.len();
        let total_calls = (worklist.len() * prompts_per_model) as f64;
        let mut measurements = 0usize;
        let mut failed_models = 0usize;

        for (model_idx, model) in worklist.iter().enumerate() {
            self.store.mutate(&id, |job| job.begin_model(model))?;
            debug!(job_id = %id, model = %model, "benchmarking model");

            for (prompt_idx, prompt) in config.prompts.iter().enumerate() {
                let request = GenerateRequest::new(model.as_str(), prompt.as_str())
                    .with_timeout(self.settings.generate_timeout);

                counter!("llm_bench_generate_calls_total").increment(1);
                let started = Instant::now();
                let response = self.client.generate(&request).await;
                histogram!("llm_bench_generate_seconds").record(started.elapsed().as_secs_f64());

                match response {
                    Ok(response) => {
                        let mut record = MetricRecord::from_response(&response);
                        record.model = model.clone();

                        if config.verbose {
                            info!(
                                job_id = %id,
                                model = %model,
                                prompt = %prompt,
                                response = %response.content,
                                "model response"
                            );
                            info!(
                                job_id = %id,
                                model = %model,
                                prompt_eval_ts = record.prompt_eval_ts,
                                response_ts = record.response_ts,
                                total_ts = record.total_ts,
                                prompt_tokens = record.prompt_tokens,
                                response_tokens = record.response_tokens,
                                model_load_time = record.model_load_time,
                                prompt_eval_time = record.prompt_eval_time,
                                response_time = record.response_time,
                                total_time = record.total_time,
                                "inference stats"
                            );
                        }

                        let done = model_idx * prompts_per_model + prompt_idx + 1;
                        let progress = done as f64 / total_calls;
                        self.store.mutate(&id, |job| {
                            job.push_metric(record);
                            job.advance_progress(progress);
                        })?;
                        measurements += 1;
                    }
                    Err(e) => {
                        counter!("llm_bench_generate_failures_total", "kind" => e.kind())
                            .increment(1);
                        warn!(
                            job_id = %id,
                            model = %model,
                            prompt_index = prompt_idx,
                            error = %e,
                            "generation failed, skipping remaining prompts for model"
                        );
                        let failure = ModelFailure::new(model.as_str(), prompt_idx, &e);
                        self.store.mutate(&id, |job| job.push_failure(failure))?;
                        failed_models += 1;
                        break;
                    }
                }
            }

            let models_processed = (model_idx + 1) as f64;
            self.store.mutate(&id, |job| {
                job.advance_progress(models_processed / worklist.len() as f64)
            })?;
        }

        self.store.mutate(&id, |job| job.complete())?;
        info!(
            job_id = %id,
            models = worklist.len(),
            measurements,
            failed_models,
            "benchmark completed"
        );

        Ok(RunOutcome::Completed {
            models: worklist.len(),
            measurements,
            failed_models,
        })
    }
}
