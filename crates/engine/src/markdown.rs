// Copyright 2025 LLM Bench Contributors
// SPDX-License-Identifier: Apache-2.0

//! Markdown output generation for benchmark results.

use crate::result::BenchmarkReport;
use llm_bench_core::JobRecord;
use std::fmt::{self, Write};

/// Generate a markdown summary with one row per tested model.
pub fn generate_summary(report: &BenchmarkReport) -> String {
    let mut output = String::new();
    // writing into a String cannot fail
    let _ = write_summary(&mut output, report);
    output
}

/// Generate a detailed report listing every individual measurement.
pub fn generate_detailed_report(job: &JobRecord) -> String {
    let mut output = String::new();
    let _ = write_detailed(&mut output, job);
    output
}

fn write_summary(output: &mut String, report: &BenchmarkReport) -> fmt::Result {
    writeln!(output, "# Benchmark Summary")?;
    writeln!(output)?;
    writeln!(output, "Benchmark: `{}`", report.job_id)?;
    writeln!(output, "Status: {}", report.status)?;
    writeln!(output, "Started: {}", report.created_at.to_rfc3339())?;
    if let Some(completed_at) = report.completed_at {
        writeln!(output, "Finished: {}", completed_at.to_rfc3339())?;
    }
    if let Some(error) = &report.error {
        writeln!(output)?;
        writeln!(output, "**Error:** {}", error)?;
    }
    writeln!(output)?;

    writeln!(output, "## Results")?;
    writeln!(output)?;
    writeln!(
        output,
        "| Model | Runs | Prompt eval (t/s) | Response (t/s) | Total (t/s) | Load (s) | Total time (s) |"
    )?;
    writeln!(
        output,
        "|-------|------|-------------------|----------------|-------------|----------|----------------|"
    )?;
    for s in &report.summaries {
        writeln!(
            output,
            "| {} | {} | {:.2} | {:.2} | {:.2} | {:.2} | {:.2} |",
            s.model,
            s.runs,
            s.prompt_eval_ts,
            s.response_ts,
            s.total_ts,
            s.model_load_time,
            s.total_time
        )?;
    }

    if !report.failures.is_empty() {
        writeln!(output)?;
        writeln!(output, "## Failures")?;
        writeln!(output)?;
        for f in &report.failures {
            writeln!(
                output,
                "- `{}` prompt #{} ({}): {}",
                f.model, f.prompt_index, f.kind, f.message
            )?;
        }
    }

    writeln!(output)?;
    writeln!(output, "---")?;
    writeln!(output, "Models tested: {}", report.summaries.len())?;
    Ok(())
}

fn write_detailed(output: &mut String, job: &JobRecord) -> fmt::Result {
    writeln!(output, "# Detailed Benchmark Report")?;
    writeln!(output)?;
    writeln!(output, "Benchmark: `{}`", job.id)?;
    writeln!(output, "Status: {}", job.status)?;
    writeln!(output)?;

    for model in &job.models_tested {
        let Some(records) = job.results.get(model) else {
            continue;
        };
        writeln!(output, "## {}", model)?;
        writeln!(output)?;
        if records.is_empty() {
            writeln!(output, "_No successful runs._")?;
            writeln!(output)?;
            continue;
        }
        writeln!(
            output,
            "| Prompt | Prompt tokens | Response tokens | Prompt eval (t/s) | Response (t/s) | Total (t/s) | Total time (s) |"
        )?;
        writeln!(
            output,
            "|--------|---------------|-----------------|-------------------|----------------|-------------|----------------|"
        )?;
        for (idx, r) in records.iter().enumerate() {
            writeln!(
                output,
                "| {} | {} | {} | {:.2} | {:.2} | {:.2} | {:.2} |",
                idx + 1,
                r.prompt_tokens,
                r.response_tokens,
                r.prompt_eval_ts,
                r.response_ts,
                r.total_ts,
                r.total_time
            )?;
        }
        writeln!(output)?;
    }

    Ok(())
}
