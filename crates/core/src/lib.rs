// Copyright 2025 LLM Bench Contributors
// SPDX-License-Identifier: Apache-2.0

//! Core types for LLM Bench.
//!
//! This crate holds everything the benchmark engine shares with its
//! collaborators:
//!
//! - [`job`] - the job record, its configuration and lifecycle
//! - [`store`] - the in-memory job store with atomic mutation
//! - [`metrics`] - the metrics calculator
//! - [`inference`] - the inference client contract
//! - [`error`] - the error taxonomy

#![warn(missing_docs, rust_2018_idioms)]
#![deny(unsafe_code)]

pub mod error;
pub mod inference;
pub mod job;
pub mod metrics;
pub mod store;

pub use error::{Error, InferenceError, Result};
pub use inference::{GenerateRequest, GenerateResponse, InferenceClient};
pub use job::{JobConfig, JobId, JobRecord, JobStatus, ModelFailure};
pub use metrics::MetricRecord;
pub use store::JobStore;

#[cfg(any(test, feature = "mock"))]
pub use inference::MockInferenceClient;
