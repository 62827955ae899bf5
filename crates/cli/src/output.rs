// Copyright 2025 LLM Bench Contributors
// SPDX-License-Identifier: Apache-2.0

//! Terminal rendering of benchmark results.

use colored::Colorize;
use llm_bench_core::{JobRecord, JobStatus, MetricRecord};
use llm_bench_engine::{BenchmarkReport, ModelSummary};
use std::fmt::Write;

const RULE: &str = "----------------------------------------------------";

/// Render the stats block for one model.
///
/// Used both for a single run and for a model's aggregate over all runs.
pub fn format_stats(summary: &ModelSummary) -> String {
    let mut out = String::new();
    // writing into a String cannot fail
    let _ = write_stats(&mut out, summary);
    out
}

fn write_stats(out: &mut String, s: &ModelSummary) -> std::fmt::Result {
    writeln!(out, "{}", RULE)?;
    writeln!(out, "    {}", s.model)?;
    writeln!(out, "        Prompt eval: {:.2} t/s", s.prompt_eval_ts)?;
    writeln!(out, "        Response: {:.2} t/s", s.response_ts)?;
    writeln!(out, "        Total: {:.2} t/s", s.total_ts)?;
    writeln!(out)?;
    writeln!(out, "    Stats:")?;
    writeln!(out, "        Prompt tokens: {}", s.prompt_tokens)?;
    writeln!(out, "        Response tokens: {}", s.response_tokens)?;
    writeln!(out, "        Model load time: {:.2}s", s.model_load_time)?;
    writeln!(out, "        Prompt eval time: {:.2}s", s.prompt_eval_time)?;
    writeln!(out, "        Response time: {:.2}s", s.response_time)?;
    writeln!(out, "        Total time: {:.2}s", s.total_time)?;
    writeln!(out, "{}", RULE)?;
    Ok(())
}

/// Stats block for a single measurement.
pub fn format_run(record: &MetricRecord) -> String {
    format_stats(&ModelSummary::from_records(
        record.model.clone(),
        std::slice::from_ref(record),
    ))
}

/// Print a finished job as human-readable text.
///
/// With `verbose`, every individual run is printed before the per-model
/// aggregates.
pub fn print_text(job: &JobRecord, verbose: bool) {
    if verbose {
        for model in &job.models_tested {
            let Some(records) = job.results.get(model) else {
                continue;
            };
            for (idx, record) in records.iter().enumerate() {
                let prompt = job.config.prompts.get(idx).map(String::as_str).unwrap_or("");
                println!("\n{} {}", "Benchmarking:".cyan().bold(), model);
                println!("{} {}", "Prompt:".white().bold(), prompt);
                print!("{}", format_run(record));
            }
        }
    }

    let report = BenchmarkReport::from_job(job);
    for summary in &report.summaries {
        if summary.runs == 0 {
            continue;
        }
        println!(
            "\n{}",
            format!("Average stats across {} runs", summary.runs).green().bold()
        );
        print!("{}", format_stats(summary));
    }

    for failure in &report.failures {
        println!(
            "{} {} stopped at prompt #{} ({}): {}",
            "[WARN]".yellow().bold(),
            failure.model,
            failure.prompt_index + 1,
            failure.kind,
            failure.message
        );
    }

    match job.status {
        JobStatus::Completed if report.summaries.is_empty() => {
            println!("{} no models were benchmarked", "[WARN]".yellow().bold());
        }
        JobStatus::Error => {
            println!(
                "{} {}",
                "[FAIL]".red().bold(),
                job.error.as_deref().unwrap_or("benchmark failed")
            );
        }
        _ => {}
    }
}

/// Print the list of models the engine serves.
pub fn print_models(host: &str, models: &[String]) {
    println!("{}", format!("=== Models at {} ===", host).cyan().bold());
    if models.is_empty() {
        println!("  (none)");
    }
    for model in models {
        println!("  - {}", model);
    }
}
