// Copyright 2025 LLM Bench Contributors
// SPDX-License-Identifier: Apache-2.0

//! Service configuration.
//!
//! Sources, lowest precedence first:
//!
//! 1. built-in defaults
//! 2. `benchmark-api.toml` in the working directory (optional)
//! 3. `BENCH_*` environment variables, e.g. `BENCH_PORT=9000`,
//!    `BENCH_CORS_ORIGINS=http://a,http://b`
//!
//! `main` loads `.env` via `dotenvy` before reading the environment.

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::time::Duration;

/// Default config file name, without extension.
pub const CONFIG_FILE: &str = "benchmark-api";

/// Prefix of environment overrides.
pub const ENV_PREFIX: &str = "BENCH";

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Pretty,
    /// One JSON object per line.
    Json,
}

/// Runtime configuration of the benchmark API.
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceConfig {
    /// Bind address.
    pub host: String,
    /// Bind port.
    pub port: u16,
    /// Ollama base URL.
    pub ollama_base_url: String,
    /// Per-call generation timeout in seconds.
    pub generate_timeout_secs: u64,
    /// Jobs allowed to run at once; 0 means unbounded.
    pub max_concurrent_jobs: usize,
    /// Origins allowed by CORS.
    pub cors_origins: Vec<String>,
    /// Log output format.
    pub log_format: LogFormat,
}

impl ServiceConfig {
    /// Load from the default file and the process environment.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_sources(CONFIG_FILE, None)
    }

    /// Load from `file` (optional, any extension the `config` crate knows)
    /// and `env`. `None` reads the process environment.
    pub fn from_sources(
        file: &str,
        env: Option<HashMap<String, String>>,
    ) -> Result<Self, ConfigError> {
        Config::builder()
            .set_default("host", "0.0.0.0")?
            .set_default("port", 8000)?
            .set_default("ollama_base_url", llm_bench_adapters::ollama::DEFAULT_BASE_URL)?
            .set_default("generate_timeout_secs", 300)?
            .set_default("max_concurrent_jobs", 0)?
            .set_default("cors_origins", vec!["http://localhost:3000"])?
            .set_default("log_format", "pretty")?
            .add_source(File::with_name(file).required(false))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("cors_origins")
                    .source(env),
            )
            .build()?
            .try_deserialize()
    }

    /// Socket address to bind.
    pub fn bind_addr(&self) -> Result<SocketAddr, std::net::AddrParseError> {
        format!("{}:{}", self.host, self.port).parse()
    }

    /// Generation timeout as a [`Duration`].
    pub fn generate_timeout(&self) -> Duration {
        Duration::from_secs(self.generate_timeout_secs)
    }

    /// Concurrency bound for the orchestrator.
    pub fn job_limit(&self) -> Option<usize> {
        Some(self.max_concurrent_jobs).filter(|n| *n > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env(pairs: &[(&str, &str)]) -> Option<HashMap<String, String>> {
        Some(
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }

    #[test]
    fn test_defaults() {
        let config = ServiceConfig::from_sources("does-not-exist", env(&[])).unwrap();
        assert_eq!(config.port, 8000);
        assert_eq!(config.ollama_base_url, "http://localhost:11434");
        assert_eq!(config.generate_timeout(), Duration::from_secs(300));
        assert_eq!(config.job_limit(), None);
        assert_eq!(config.cors_origins, vec!["http://localhost:3000"]);
        assert_eq!(config.log_format, LogFormat::Pretty);
        assert_eq!(config.bind_addr().unwrap().port(), 8000);
    }

    #[test]
    fn test_env_overrides() {
        let config = ServiceConfig::from_sources(
            "does-not-exist",
            env(&[
                ("BENCH_PORT", "9100"),
                ("BENCH_OLLAMA_BASE_URL", "http://gpu-box:11434"),
                ("BENCH_MAX_CONCURRENT_JOBS", "2"),
                ("BENCH_CORS_ORIGINS", "http://a.test,http://b.test"),
                ("BENCH_LOG_FORMAT", "json"),
            ]),
        )
        .unwrap();

        assert_eq!(config.port, 9100);
        assert_eq!(config.ollama_base_url, "http://gpu-box:11434");
        assert_eq!(config.job_limit(), Some(2));
        assert_eq!(config.cors_origins, vec!["http://a.test", "http://b.test"]);
        assert_eq!(config.log_format, LogFormat::Json);
    }

    #[test]
    fn test_bad_port_is_rejected() {
        let result =
            ServiceConfig::from_sources("does-not-exist", env(&[("BENCH_PORT", "not-a-port")]));
        assert!(result.is_err());
    }
}
