/*!
 * Harness Configuration
 *
 * Runtime configuration for benchmark runs, with presets and environment
 * overrides.
 */

use crate::core::errors::{CounterError, CounterResult};
use crate::core::limits::{
    DEFAULT_INCREMENTS_PER_WORKER, DEFAULT_WAIT, DEFAULT_WORKERS, MAX_INCREMENTS_PER_WORKER,
    MAX_WORKERS,
};
use crate::core::types::SubmitMode;
use std::str::FromStr;
use std::time::Duration;

/// Benchmark run configuration
#[derive(Debug, Clone, PartialEq)]
pub struct HarnessConfig {
    /// Concurrent worker threads per run
    pub workers: usize,
    /// Updates each worker performs
    pub increments_per_worker: usize,
    /// Upper bound on waiting for workers (and for queued updates to drain)
    pub wait_timeout: Duration,
    /// How the serialized-queue variant hands off updates
    pub submit_mode: SubmitMode,
    /// Reset the counter before each run
    pub reset_before_run: bool,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            workers: DEFAULT_WORKERS,
            increments_per_worker: DEFAULT_INCREMENTS_PER_WORKER,
            wait_timeout: DEFAULT_WAIT,
            submit_mode: SubmitMode::FireAndForget,
            reset_before_run: true,
        }
    }
}

impl HarnessConfig {
    /// Fewer workers, many updates each: makes lost updates in the
    /// unsynchronized variant near certain
    pub const fn contention() -> Self {
        Self {
            workers: 8,
            increments_per_worker: 500,
            wait_timeout: Duration::from_secs(10),
            submit_mode: SubmitMode::FireAndForget,
            reset_before_run: true,
        }
    }

    /// Total updates a run issues
    pub fn total_updates(&self) -> usize {
        self.workers.saturating_mul(self.increments_per_worker)
    }

    pub fn validate(&self) -> CounterResult<()> {
        if self.workers == 0 {
            return Err(CounterError::InvalidConfig("workers must be at least 1".into()));
        }
        if self.workers > MAX_WORKERS {
            return Err(CounterError::InvalidConfig(format!(
                "workers must be at most {}",
                MAX_WORKERS
            )));
        }
        if self.increments_per_worker == 0 {
            return Err(CounterError::InvalidConfig(
                "increments per worker must be at least 1".into(),
            ));
        }
        if self.increments_per_worker > MAX_INCREMENTS_PER_WORKER {
            return Err(CounterError::InvalidConfig(format!(
                "increments per worker must be at most {}",
                MAX_INCREMENTS_PER_WORKER
            )));
        }
        if self.wait_timeout.is_zero() {
            return Err(CounterError::InvalidConfig("wait timeout must be non-zero".into()));
        }
        Ok(())
    }

    /// Apply environment overrides on top of the defaults
    ///
    /// Environment variables:
    /// - BENCH_WORKERS: worker threads per run
    /// - BENCH_INCREMENTS: updates per worker
    /// - BENCH_WAIT_MS: wait bound in milliseconds
    /// - BENCH_SUBMIT: `fire-and-forget` or `blocking`
    pub fn from_env() -> CounterResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as `from_env`, reading variables through `lookup`
    pub fn from_lookup<F>(lookup: F) -> CounterResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(workers) = parse_var(&lookup, "BENCH_WORKERS")? {
            config.workers = workers;
        }
        if let Some(increments) = parse_var(&lookup, "BENCH_INCREMENTS")? {
            config.increments_per_worker = increments;
        }
        if let Some(wait_ms) = parse_var::<u64, _>(&lookup, "BENCH_WAIT_MS")? {
            config.wait_timeout = Duration::from_millis(wait_ms);
        }
        if let Some(mode) = parse_var(&lookup, "BENCH_SUBMIT")? {
            config.submit_mode = mode;
        }

        config.validate()?;
        Ok(config)
    }
}

fn parse_var<T, F>(lookup: &F, key: &str) -> CounterResult<Option<T>>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| CounterError::InvalidConfig(format!("{}={} is not valid", key, raw))),
    }
}
