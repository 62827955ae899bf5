// Copyright 2025 LLM Bench Contributors
// SPDX-License-Identifier: Apache-2.0

//! I/O operations for benchmark results.
//!
//! A finished job is written as a JSON snapshot plus a markdown summary
//! into one output directory.

use crate::markdown;
use crate::result::BenchmarkReport;
use llm_bench_core::JobRecord;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// File name of the JSON job snapshot.
pub const RESULTS_FILE: &str = "results.json";

/// File name of the markdown summary.
pub const SUMMARY_FILE: &str = "summary.md";

/// File name of the per-run markdown report.
pub const DETAILED_FILE: &str = "report.md";

/// Paths written by [`write_all_outputs`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPaths {
    /// JSON job snapshot.
    pub results: PathBuf,
    /// Markdown summary.
    pub summary: PathBuf,
    /// Markdown per-run report.
    pub detailed: PathBuf,
}

/// Write a job snapshot as pretty JSON.
pub fn write_job_json(job: &JobRecord, path: impl AsRef<Path>) -> io::Result<()> {
    let json = serde_json::to_string_pretty(job)
        .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;
    fs::write(path, json)
}

/// Write the markdown summary for a job.
pub fn write_summary(job: &JobRecord, path: impl AsRef<Path>) -> io::Result<()> {
    let summary = markdown::generate_summary(&BenchmarkReport::from_job(job));
    fs::write(path, summary)
}

/// Write the JSON snapshot and both markdown reports into `dir`, creating it
/// if needed.
pub fn write_all_outputs(job: &JobRecord, dir: impl AsRef<Path>) -> io::Result<OutputPaths> {
    let dir = dir.as_ref();
    fs::create_dir_all(dir)?;

    let paths = OutputPaths {
        results: dir.join(RESULTS_FILE),
        summary: dir.join(SUMMARY_FILE),
        detailed: dir.join(DETAILED_FILE),
    };

    write_job_json(job, &paths.results)?;
    write_summary(job, &paths.summary)?;
    fs::write(&paths.detailed, markdown::generate_detailed_report(job))?;

    Ok(paths)
}

/// Read a job snapshot written by [`write_job_json`].
pub fn read_job_json(path: impl AsRef<Path>) -> io::Result<JobRecord> {
    let content = fs::read_to_string(path)?;
    serde_json::from_str(&content).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use llm_bench_core::{JobConfig, MetricRecord};

    fn job() -> JobRecord {
        let mut job = JobRecord::new(JobConfig::new(["p1"]));
        job.start();
        job.set_worklist(vec!["A".to_string()]);
        job.begin_model("A");
        job.push_metric(MetricRecord::from_parts("A", 3, 5, 0.1, 0.5, 1.0, 2.0));
        job.complete();
        job
    }

    #[test]
    fn test_write_all_outputs_creates_nested_dir() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("runs").join("latest");
        let job = job();

        let paths = write_all_outputs(&job, &dir).unwrap();

        assert!(paths.results.is_file());
        assert!(paths.summary.is_file());
        assert!(paths.detailed.is_file());
        let summary = fs::read_to_string(&paths.summary).unwrap();
        assert!(summary.contains("| A | 1 |"));
    }

    #[test]
    fn test_json_snapshot_reads_back() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join(RESULTS_FILE);
        let job = job();

        write_job_json(&job, &path).unwrap();
        let restored = read_job_json(&path).unwrap();

        assert_eq!(restored.id, job.id);
        assert_eq!(restored.status, job.status);
        assert_eq!(restored.measurement_count(), 1);
        assert_eq!(restored.results["A"][0].response_tokens, 5);
    }

    #[test]
    fn test_read_garbage_is_invalid_data() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("bad.json");
        fs::write(&path, "{ not json").unwrap();

        let err = read_job_json(&path).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }
}
