// Copyright 2025 LLM Bench Contributors
// SPDX-License-Identifier: Apache-2.0

//! Metrics calculator.
//!
//! Turns one raw [`GenerateResponse`] into a normalized [`MetricRecord`].
//! This is the only place where durations are converted and rates are
//! divided, so zero handling is identical everywhere.
//!
//! # Conventions
//!
//! - `total_time` is the engine's end-to-end duration and includes model
//!   load time. It is raised to `prompt_eval_time + response_time` when the
//!   engine reports something smaller, so
//!   `total_time >= prompt_eval_time + response_time` always holds.
//! - `total_ts` divides all tokens by `total_time`.
//! - A rate with a zero divisor is `0.0`.

use crate::inference::GenerateResponse;
use serde::{Deserialize, Serialize};
use tracing::warn;

const NANOS_PER_SEC: f64 = 1_000_000_000.0;

/// Convert an engine duration in nanoseconds to seconds.
pub fn nanos_to_secs(nanos: u64) -> f64 {
    nanos as f64 / NANOS_PER_SEC
}

/// Tokens per second, `0.0` when `secs` is not positive.
pub fn rate(tokens: u64, secs: f64) -> f64 {
    if secs > 0.0 {
        tokens as f64 / secs
    } else {
        0.0
    }
}

/// Normalized measurement for one prompt against one model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricRecord {
    /// Model identifier.
    pub model: String,
    /// Prompt evaluation throughput (tokens/s).
    pub prompt_eval_ts: f64,
    /// Response generation throughput (tokens/s).
    pub response_ts: f64,
    /// Overall throughput over `total_time` (tokens/s).
    pub total_ts: f64,
    /// Prompt tokens evaluated.
    pub prompt_tokens: u64,
    /// Response tokens generated.
    pub response_tokens: u64,
    /// Model load time (s).
    pub model_load_time: f64,
    /// Prompt evaluation time (s).
    pub prompt_eval_time: f64,
    /// Response generation time (s).
    pub response_time: f64,
    /// End-to-end time including load (s).
    pub total_time: f64,
}

impl MetricRecord {
    /// Build a record from raw timings. Never panics.
    pub fn from_response(response: &GenerateResponse) -> Self {
        let prompt_tokens = match response.prompt_eval_count {
            Some(count) => count,
            None => {
                warn!(
                    model = %response.model,
                    "prompt token count not provided, likely served from prompt cache; using 0"
                );
                0
            }
        };

        Self::from_parts(
            &response.model,
            prompt_tokens,
            response.eval_count,
            nanos_to_secs(response.load_duration),
            nanos_to_secs(response.prompt_eval_duration),
            nanos_to_secs(response.eval_duration),
            nanos_to_secs(response.total_duration),
        )
    }

    /// Build a record from counts and durations in seconds.
    ///
    /// Used directly when aggregating several records into one.
    pub fn from_parts(
        model: &str,
        prompt_tokens: u64,
        response_tokens: u64,
        model_load_time: f64,
        prompt_eval_time: f64,
        response_time: f64,
        total_time: f64,
    ) -> Self {
        let total_time = total_time.max(prompt_eval_time + response_time);

        Self {
            model: model.to_string(),
            prompt_eval_ts: rate(prompt_tokens, prompt_eval_time),
            response_ts: rate(response_tokens, response_time),
            total_ts: rate(prompt_tokens.saturating_add(response_tokens), total_time),
            prompt_tokens,
            response_tokens,
            model_load_time,
            prompt_eval_time,
            response_time,
            total_time,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(
        prompt_eval_count: Option<u64>,
        prompt_eval_duration: u64,
        eval_count: u64,
        eval_duration: u64,
        total_duration: u64,
    ) -> GenerateResponse {
        GenerateResponse {
            model: "llama3:8b".to_string(),
            total_duration,
            load_duration: 500_000_000,
            prompt_eval_count,
            prompt_eval_duration,
            eval_count,
            eval_duration,
            ..Default::default()
        }
    }

    #[test]
    fn test_rates_from_engine_timings() {
        let record = MetricRecord::from_response(&response(
            Some(10),
            200_000_000,
            20,
            300_000_000,
            1_000_000_000,
        ));

        assert_eq!(record.prompt_tokens, 10);
        assert_eq!(record.response_tokens, 20);
        assert!((record.prompt_eval_time - 0.2).abs() < 1e-9);
        assert!((record.response_time - 0.3).abs() < 1e-9);
        assert!((record.model_load_time - 0.5).abs() < 1e-9);
        assert!((record.total_time - 1.0).abs() < 1e-9);
        assert!((record.prompt_eval_ts - 50.0).abs() < 1e-9);
        assert!((record.response_ts - 66.666_666_666).abs() < 1e-6);
        assert!((record.total_ts - 30.0).abs() < 1e-9);
    }

    #[test]
    fn test_two_tokens_in_one_second() {
        let record = MetricRecord::from_response(&response(Some(0), 0, 2, 1_000_000_000, 1_000_000_000));
        assert_eq!(record.response_ts, 2.0);
    }

    #[test]
    fn test_zero_durations_yield_zero_rates() {
        let record = MetricRecord::from_response(&response(Some(10), 0, 20, 0, 0));
        assert_eq!(record.prompt_eval_ts, 0.0);
        assert_eq!(record.response_ts, 0.0);
        assert_eq!(record.total_ts, 0.0);
        assert_eq!(record.total_time, 0.0);
    }

    #[test]
    fn test_zero_tokens_yield_zero_rates() {
        let record = MetricRecord::from_response(&response(Some(0), 100, 0, 100, 200));
        assert_eq!(record.prompt_eval_ts, 0.0);
        assert_eq!(record.response_ts, 0.0);
        assert_eq!(record.total_ts, 0.0);
    }

    #[test]
    fn test_missing_prompt_count_is_zero() {
        let record = MetricRecord::from_response(&response(None, 100_000_000, 5, 1_000_000_000, 2_000_000_000));
        assert_eq!(record.prompt_tokens, 0);
        assert_eq!(record.prompt_eval_ts, 0.0);
    }

    #[test]
    fn test_total_time_never_below_eval_sum() {
        // engine reported no total
        let record = MetricRecord::from_response(&response(Some(4), 1_000_000_000, 4, 1_000_000_000, 0));
        assert!((record.total_time - 2.0).abs() < 1e-9);
        assert!((record.total_ts - 4.0).abs() < 1e-9);
    }

    #[test]
    fn test_huge_token_counts_saturate() {
        let record = MetricRecord::from_parts("m", u64::MAX, 5, 0.0, 1.0, 1.0, 2.0);
        assert_eq!(record.prompt_tokens, u64::MAX);
        assert_eq!(record.total_ts, rate(u64::MAX, 2.0));
    }

    #[test]
    fn test_rate_helper() {
        assert_eq!(rate(10, 0.0), 0.0);
        assert_eq!(rate(10, -1.0), 0.0);
        assert_eq!(rate(10, 2.0), 5.0);
        assert_eq!(nanos_to_secs(1_500_000_000), 1.5);
    }
}
