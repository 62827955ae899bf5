// Copyright 2025 LLM Bench Contributors
// SPDX-License-Identifier: Apache-2.0

//! Orchestration facade.
//!
//! [`BenchmarkOrchestrator`] is the entry point for both the CLI and the
//! HTTP service: submit a job (returns immediately), read snapshots, list
//! and delete jobs. Submission hands the job to a [`BenchmarkRunner`] on a
//! spawned tokio task; the job store is the only channel back to callers.

use crate::runner::{BenchmarkRunner, RunOutcome, RunnerSettings};
use llm_bench_core::inference::{InferenceClient, DEFAULT_GENERATE_TIMEOUT};
use llm_bench_core::{JobConfig, JobId, JobRecord, JobStore, Result};
use metrics::counter;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tracing::{info, info_span, warn, Instrument};

/// Facade configuration.
#[derive(Debug, Clone)]
pub struct OrchestratorSettings {
    /// Timeout applied to every generation call.
    pub generate_timeout: Duration,
    /// Upper bound on jobs running at once; `None` means unbounded.
    /// Jobs beyond the bound stay `pending` until a slot frees up.
    pub max_concurrent_jobs: Option<usize>,
}

impl Default for OrchestratorSettings {
    fn default() -> Self {
        Self {
            generate_timeout: DEFAULT_GENERATE_TIMEOUT,
            max_concurrent_jobs: None,
        }
    }
}

/// Submit/get/list/delete over benchmark jobs.
///
/// Cheap to clone; clones share the same store, client and concurrency bound.
#[derive(Clone)]
pub struct BenchmarkOrchestrator {
    store: Arc<JobStore>,
    client: Arc<dyn InferenceClient>,
    runner: Arc<BenchmarkRunner>,
    slots: Option<Arc<Semaphore>>,
}

impl BenchmarkOrchestrator {
    /// Create a facade with its own empty store.
    pub fn new(client: Arc<dyn InferenceClient>, settings: OrchestratorSettings) -> Self {
        Self::with_store(Arc::new(JobStore::new()), client, settings)
    }

    /// Create a facade over an existing store.
    pub fn with_store(
        store: Arc<JobStore>,
        client: Arc<dyn InferenceClient>,
        settings: OrchestratorSettings,
    ) -> Self {
        let runner = BenchmarkRunner::new(
            Arc::clone(&store),
            Arc::clone(&client),
            RunnerSettings {
                generate_timeout: settings.generate_timeout,
            },
        );
        let slots = settings
            .max_concurrent_jobs
            .filter(|n| *n > 0)
            .map(|n| Arc::new(Semaphore::new(n)));

        Self {
            store,
            client,
            runner: Arc::new(runner),
            slots,
        }
    }

    /// The underlying job store.
    pub fn store(&self) -> &Arc<JobStore> {
        &self.store
    }

    /// Validate and create a job, then schedule it without waiting.
    ///
    /// Must be called from within a tokio runtime. Invalid configs are
    /// rejected before any record is created.
    pub fn submit(&self, config: JobConfig) -> Result<JobId> {
        config.validate()?;
        let job = self.store.create(config);
        let id = job.id;
        counter!("llm_bench_jobs_submitted_total").increment(1);
        info!(job_id = %id, prompts = job.config.prompts.len(), "benchmark submitted");

        let this = self.clone();
        tokio::spawn(
            async move {
                this.execute(id).await;
            }
            .instrument(info_span!("benchmark_job", job_id = %id)),
        );

        Ok(id)
    }

    /// Validate, create and run a job on the current task, returning the
    /// final snapshot.
    pub async fn run(&self, config: JobConfig) -> Result<JobRecord> {
        config.validate()?;
        let job = self.store.create(config);
        counter!("llm_bench_jobs_submitted_total").increment(1);
        self.execute(job.id).await;
        self.store.get(&job.id)
    }

    async fn execute(&self, id: JobId) -> RunOutcome {
        let _slot = match &self.slots {
            Some(slots) => match Arc::clone(slots).acquire_owned().await {
                Ok(permit) => Some(permit),
                Err(_) => {
                    warn!(job_id = %id, "job scheduler closed");
                    return RunOutcome::Abandoned;
                }
            },
            None => None,
        };
        self.runner.run(id).await
    }

    /// Current snapshot of a job.
    pub fn get(&self, id: &JobId) -> Result<JobRecord> {
        self.store.get(id)
    }

    /// Snapshots of all jobs, oldest first.
    pub fn list(&self) -> Vec<JobRecord> {
        self.store.list()
    }

    /// Remove a job. A runner still working on it stops at its next update.
    pub fn delete(&self, id: &JobId) -> Result<JobRecord> {
        let record = self.store.delete(id)?;
        info!(job_id = %id, status = %record.status, "benchmark deleted");
        Ok(record)
    }

    /// Models the engine currently serves, or none if it is unreachable.
    pub async fn available_models(&self) -> Vec<String> {
        match self.client.list_models().await {
            Ok(models) => models,
            Err(e) => {
                warn!(error = %e, "error fetching models from inference engine");
                Vec::new()
            }
        }
    }
}
