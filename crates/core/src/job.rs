// Copyright 2025 LLM Bench Contributors
// SPDX-License-Identifier: Apache-2.0

//! Benchmark job record.
//!
//! A [`JobRecord`] carries one benchmark run's identity, its immutable
//! configuration, and the progress/result state the runner mutates.
//!
//! # Lifecycle
//!
//! ```text
//! pending ──start()──▶ running ──complete()──▶ completed
//!                         │
//!                         └────fail()────────▶ error
//! ```
//!
//! Results only grow while the job is running and are frozen afterwards.
//! `progress` reaches `1.0` exactly when the job completes.

use crate::error::{Error, InferenceError, Result};
use crate::metrics::MetricRecord;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use uuid::Uuid;

/// Prompts used when a request does not supply any.
pub const DEFAULT_PROMPTS: [&str; 2] = [
    "Why is the sky blue?",
    "Write a report on the financials of Apple Inc.",
];

/// Default prompt list as owned strings.
pub fn default_prompts() -> Vec<String> {
    DEFAULT_PROMPTS.iter().map(|p| p.to_string()).collect()
}

/// Unique, never reused job identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(Uuid);

impl JobId {
    /// Allocate a fresh random id.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Get the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for JobId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for JobId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for JobId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

/// Job execution status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    /// Accepted, waiting for a runner.
    #[default]
    Pending,
    /// A runner is driving the job.
    Running,
    /// All models processed (possibly with per-model failures).
    Completed,
    /// The job could not process any model.
    Error,
}

impl JobStatus {
    /// Whether the job can no longer change.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Error)
    }

    /// Lowercase name as used on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Running => "running",
            Self::Completed => "completed",
            Self::Error => "error",
        }
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Immutable benchmark request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobConfig {
    /// Prompts, run in this order against every model.
    #[serde(default = "default_prompts")]
    pub prompts: Vec<String>,
    /// Models to leave out of the worklist.
    #[serde(default)]
    pub skip_models: BTreeSet<String>,
    /// Log response bodies and per-prompt stats.
    #[serde(default)]
    pub verbose: bool,
}

impl Default for JobConfig {
    fn default() -> Self {
        Self {
            prompts: default_prompts(),
            skip_models: BTreeSet::new(),
            verbose: false,
        }
    }
}

impl JobConfig {
    /// Create a config with the given prompts and no exclusions.
    pub fn new<I, S>(prompts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            prompts: prompts.into_iter().map(Into::into).collect(),
            ..Default::default()
        }
    }

    /// Exclude models from the worklist.
    pub fn with_skip_models<I, S>(mut self, models: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.skip_models.extend(models.into_iter().map(Into::into));
        self
    }

    /// Set the verbosity flag.
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Reject configs that cannot produce a single measurement.
    pub fn validate(&self) -> Result<()> {
        if self.prompts.is_empty() {
            return Err(Error::validation("at least one prompt is required"));
        }
        if let Some(idx) = self.prompts.iter().position(|p| p.trim().is_empty()) {
            return Err(Error::validation(format!("prompt {} is blank", idx)));
        }
        Ok(())
    }

    /// Filter the engine's model list, preserving its order.
    pub fn worklist(&self, available: Vec<String>) -> Vec<String> {
        available
            .into_iter()
            .filter(|m| !self.skip_models.contains(m))
            .collect()
    }
}

/// A model whose remaining prompts were skipped after a failed call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelFailure {
    /// Model identifier.
    pub model: String,
    /// Index of the prompt whose call failed.
    pub prompt_index: usize,
    /// Failure kind (`timeout`, `unavailable`, `model`, `invalid_response`).
    pub kind: String,
    /// Human-readable message.
    pub message: String,
}

impl ModelFailure {
    /// Record a failed call.
    pub fn new(model: impl Into<String>, prompt_index: usize, error: &InferenceError) -> Self {
        Self {
            model: model.into(),
            prompt_index,
            kind: error.kind().to_string(),
            message: error.to_string(),
        }
    }
}

/// One benchmark run's identity, configuration and mutable state.
///
/// Values handed out by the store are snapshots; mutating one does not
/// affect the stored record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobRecord {
    /// Job id.
    pub id: JobId,
    /// Current status.
    pub status: JobStatus,
    /// Fraction of work done, 0.0 to 1.0.
    pub progress: f64,
    /// Model currently being timed.
    pub current_model: Option<String>,
    /// Request snapshot.
    pub config: JobConfig,
    /// Model worklist, in processing order.
    #[serde(default)]
    pub models_tested: Vec<String>,
    /// Per-model metric records, in prompt order.
    #[serde(default)]
    pub results: BTreeMap<String, Vec<MetricRecord>>,
    /// Models cut short by a failed call.
    #[serde(default)]
    pub failures: Vec<ModelFailure>,
    /// Job-level failure message, only with `status = error`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Submission time.
    pub created_at: DateTime<Utc>,
    /// Time the runner picked the job up.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub started_at: Option<DateTime<Utc>>,
    /// Time the job reached a terminal status.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
}

impl JobRecord {
    /// Create a pending record with a fresh id.
    pub fn new(config: JobConfig) -> Self {
        Self {
            id: JobId::new(),
            status: JobStatus::Pending,
            progress: 0.0,
            current_model: None,
            config,
            models_tested: Vec::new(),
            results: BTreeMap::new(),
            failures: Vec::new(),
            error: None,
            created_at: Utc::now(),
            started_at: None,
            completed_at: None,
        }
    }

    /// Whether the runner may still mutate progress and results.
    pub fn is_running(&self) -> bool {
        self.status == JobStatus::Running
    }

    /// `pending → running`. No-op in any other state.
    pub fn start(&mut self) {
        if self.status == JobStatus::Pending {
            self.status = JobStatus::Running;
            self.started_at = Some(Utc::now());
        }
    }

    /// Fix the model worklist once it is known.
    pub fn set_worklist(&mut self, models: Vec<String>) {
        if self.is_running() {
            self.models_tested = models;
        }
    }

    /// Mark `model` as the one being timed and open its result list.
    pub fn begin_model(&mut self, model: &str) {
        if self.is_running() {
            self.current_model = Some(model.to_string());
            self.results.entry(model.to_string()).or_default();
        }
    }

    /// Append one measurement for its model.
    pub fn push_metric(&mut self, record: MetricRecord) {
        if self.is_running() {
            self.results
                .entry(record.model.clone())
                .or_default()
                .push(record);
        }
    }

    /// Note that a model's remaining prompts were skipped.
    pub fn push_failure(&mut self, failure: ModelFailure) {
        if self.is_running() {
            self.failures.push(failure);
        }
    }

    /// Advance progress while running.
    ///
    /// Never decreases progress and never publishes `1.0`; only
    /// [`complete`](Self::complete) does that.
    pub fn advance_progress(&mut self, progress: f64) {
        if self.is_running() && progress.is_finite() {
            let capped = progress.clamp(0.0, 1.0);
            if capped < 1.0 && capped > self.progress {
                self.progress = capped;
            }
        }
    }

    /// `running → completed`, progress `1.0`.
    pub fn complete(&mut self) {
        if self.is_running() {
            self.status = JobStatus::Completed;
            self.progress = 1.0;
            self.current_model = None;
            self.completed_at = Some(Utc::now());
        }
    }

    /// `pending | running → error`. Results are kept as they are.
    pub fn fail(&mut self, message: impl Into<String>) {
        if !self.status.is_terminal() {
            self.status = JobStatus::Error;
            self.error = Some(message.into());
            self.current_model = None;
            self.completed_at = Some(Utc::now());
        }
    }

    /// Total metric records across all models.
    pub fn measurement_count(&self) -> usize {
        self.results.values().map(Vec::len).sum()
    }
}
