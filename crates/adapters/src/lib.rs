// Copyright 2025 LLM Bench Contributors
// SPDX-License-Identifier: Apache-2.0

//! Inference engine adapters for LLM Bench.
//!
//! Each adapter implements [`llm_bench_core::InferenceClient`] for one
//! engine. Only Ollama is supported today.

#![warn(missing_docs, rust_2018_idioms)]
#![deny(unsafe_code)]

pub mod ollama;

pub use ollama::{OllamaClient, OllamaConfig, OllamaHealth};
