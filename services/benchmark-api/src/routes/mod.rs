// Copyright 2025 LLM Bench Contributors
// SPDX-License-Identifier: Apache-2.0

pub mod benchmarks;
pub mod health;
pub mod models;
