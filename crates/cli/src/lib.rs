// Copyright 2025 LLM Bench Contributors
// SPDX-License-Identifier: Apache-2.0

//! CLI for LLM Bench.
//!
//! `llm-bench run` times every local Ollama model against a set of prompts
//! and prints throughput per model. `llm-bench models` lists what the engine
//! serves.

#![warn(missing_docs, rust_2018_idioms)]
#![deny(unsafe_code)]

pub mod output;

use anyhow::{bail, Context};
use clap::{Args, Parser, Subcommand, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use llm_bench_adapters::ollama::DEFAULT_BASE_URL;
use llm_bench_adapters::{OllamaClient, OllamaConfig};
use llm_bench_core::inference::InferenceClient;
use llm_bench_core::{JobConfig, JobRecord, JobStatus};
use llm_bench_engine::{io, markdown, BenchmarkOrchestrator, BenchmarkReport, OrchestratorSettings};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;

const POLL_INTERVAL: Duration = Duration::from_millis(200);

/// LLM Bench CLI.
#[derive(Parser, Debug)]
#[command(name = "llm-bench")]
#[command(author, version, about = "Run benchmarks on your Ollama models.", long_about = None)]
pub struct Cli {
    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Benchmark every available model against the prompts.
    Run(RunArgs),

    /// List the models the inference engine serves.
    Models {
        /// Ollama base URL.
        #[arg(long, env = "OLLAMA_HOST", default_value = DEFAULT_BASE_URL)]
        host: String,
    },
}

/// Arguments of `llm-bench run`.
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Print stats for every individual run.
    #[arg(short, long)]
    pub verbose: bool,

    /// Model names to skip.
    #[arg(short = 's', long, num_args = 0.., value_name = "MODEL")]
    pub skip_models: Vec<String>,

    /// Prompts to benchmark with (defaults to two built-in prompts).
    #[arg(short, long, num_args = 1.., value_name = "PROMPT")]
    pub prompts: Vec<String>,

    /// Ollama base URL.
    #[arg(long, env = "OLLAMA_HOST", default_value = DEFAULT_BASE_URL)]
    pub host: String,

    /// Per-request timeout in seconds.
    #[arg(long, default_value_t = 300, value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout: u64,

    /// Directory to write results.json and markdown reports into.
    #[arg(short, long, value_name = "DIR")]
    pub output: Option<PathBuf>,

    /// Output format.
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Disable the progress bar.
    #[arg(long)]
    pub no_progress: bool,
}

impl RunArgs {
    /// Job configuration described by these arguments.
    pub fn job_config(&self) -> JobConfig {
        let config = if self.prompts.is_empty() {
            JobConfig::default()
        } else {
            JobConfig::new(self.prompts.iter().cloned())
        };
        config
            .with_skip_models(self.skip_models.iter().cloned())
            .with_verbose(self.verbose)
    }
}

/// How results are printed to stdout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable stats blocks.
    Text,
    /// Full job snapshot as JSON.
    Json,
    /// Markdown summary table.
    Markdown,
}

/// Accept `host:port` as Ollama does and add the scheme.
pub fn normalize_host(host: &str) -> String {
    let host = host.trim();
    if host.contains("://") {
        host.trim_end_matches('/').to_string()
    } else {
        format!("http://{}", host.trim_end_matches('/'))
    }
}

/// Run the CLI with the process arguments.
pub async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let verbose = matches!(&cli.command, Commands::Run(args) if args.verbose);
    init_tracing(verbose);

    match cli.command {
        Commands::Run(args) => run_benchmark(args).await,
        Commands::Models { host } => list_models(&host).await,
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "info" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn client_for(host: &str) -> anyhow::Result<(String, OllamaClient)> {
    let base_url = normalize_host(host);
    let client = OllamaClient::new(OllamaConfig::new(base_url.clone()))
        .context("failed to create Ollama client")?;
    Ok((base_url, client))
}

async fn list_models(host: &str) -> anyhow::Result<()> {
    let (base_url, client) = client_for(host)?;
    let models = client
        .list_models()
        .await
        .with_context(|| format!("failed to reach Ollama at {}", base_url))?;
    output::print_models(&base_url, &models);
    Ok(())
}

async fn run_benchmark(args: RunArgs) -> anyhow::Result<()> {
    let config = args.job_config();
    let (base_url, client) = client_for(&args.host)?;
    info!(
        host = %base_url,
        verbose = args.verbose,
        skip_models = ?config.skip_models,
        prompts = ?config.prompts,
        "starting benchmark"
    );

    let orchestrator = BenchmarkOrchestrator::new(
        Arc::new(client),
        OrchestratorSettings {
            generate_timeout: Duration::from_secs(args.timeout),
            max_concurrent_jobs: None,
        },
    );

    let show_progress = !args.no_progress && args.format == OutputFormat::Text;
    let job = if show_progress {
        watch(&orchestrator, config).await?
    } else {
        orchestrator.run(config).await?
    };

    match args.format {
        OutputFormat::Text => output::print_text(&job, args.verbose),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&job)?),
        OutputFormat::Markdown => {
            print!("{}", markdown::generate_summary(&BenchmarkReport::from_job(&job)))
        }
    }

    if let Some(dir) = &args.output {
        let paths = io::write_all_outputs(&job, dir)
            .with_context(|| format!("failed to write results to {}", dir.display()))?;
        eprintln!("Results written to {}", paths.results.display());
    }

    if job.status == JobStatus::Error {
        bail!(
            "benchmark failed: {}",
            job.error.as_deref().unwrap_or("unknown error")
        );
    }
    Ok(())
}

/// Submit the job and follow its snapshot with a progress bar.
async fn watch(
    orchestrator: &BenchmarkOrchestrator,
    config: JobConfig,
) -> anyhow::Result<JobRecord> {
    let id = orchestrator.submit(config)?;

    let pb = ProgressBar::new(100);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}% {msg}")
            .context("invalid progress template")?
            .progress_chars("=>-"),
    );
    pb.enable_steady_tick(Duration::from_millis(100));

    loop {
        let snap = orchestrator.get(&id)?;
        pb.set_position((snap.progress * 100.0).round() as u64);
        match &snap.current_model {
            Some(model) => pb.set_message(model.clone()),
            None => pb.set_message(snap.status.to_string()),
        }
        if snap.status.is_terminal() {
            pb.finish_and_clear();
            return Ok(snap);
        }
        tokio::time::sleep(POLL_INTERVAL).await;
    }
}
