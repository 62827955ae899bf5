// Copyright 2025 LLM Bench Contributors
// SPDX-License-Identifier: Apache-2.0

//! HTTP middleware.
pub mod metrics;

pub use metrics::track_requests;
