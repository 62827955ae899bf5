// Copyright 2025 LLM Bench Contributors
// SPDX-License-Identifier: Apache-2.0

//! LLM Bench CLI entry point.

use colored::Colorize;

#[tokio::main]
async fn main() {
    if let Err(e) = llm_bench_cli::run().await {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}
