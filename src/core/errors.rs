/*!
 * Error Types
 * Centralized error handling with thiserror, miette, and serde support
 */

use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type for counter and harness operations
pub type CounterResult<T> = Result<T, CounterError>;

/// Counter and harness errors with serialization support
///
/// Every failure is local and recoverable; none of them poisons the
/// variant that reported it.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq, Diagnostic)]
#[serde(tag = "error_type", content = "details", rename_all = "snake_case")]
pub enum CounterError {
    #[error("Reset rejected: {in_flight} update(s) still in flight")]
    #[diagnostic(
        code(counter::concurrent_reset),
        help("Reset only after every worker has finished. Wait for the run to complete first.")
    )]
    ConcurrentResetViolation { in_flight: usize },

    #[error("Update would overflow the counter (current value {value:e})")]
    #[diagnostic(
        code(counter::numeric_overflow),
        help("The counter saturated at its last finite value. Reset it before continuing.")
    )]
    NumericOverflow { value: f64 },

    #[error("Timed out after {waited_ms}ms: {completed}/{expected} workers completed")]
    #[diagnostic(
        code(harness::workers_timed_out),
        help("Raise the wait bound (BENCH_WAIT_MS) or lower the worker count.")
    )]
    WorkersTimedOut {
        completed: usize,
        expected: usize,
        waited_ms: u64,
    },

    #[error("Timed out after {waited_ms}ms draining queued updates ({pending} still pending)")]
    #[diagnostic(
        code(harness::drain_timed_out),
        help("The serial executor is still applying updates. Raise the wait bound.")
    )]
    DrainTimedOut { pending: usize, waited_ms: u64 },

    #[error("Worker {worker} panicked")]
    #[diagnostic(code(harness::worker_panicked))]
    WorkerPanicked { worker: usize },

    #[error("Serial executor is closed")]
    #[diagnostic(
        code(executor::closed),
        help("The executor thread has exited. Create a new variant instance.")
    )]
    ExecutorClosed,

    #[error("Failed to spawn thread: {0}")]
    #[diagnostic(code(executor::spawn_failed), help("The system may be out of threads."))]
    SpawnFailed(String),

    #[error("Invalid configuration: {0}")]
    #[diagnostic(code(config::invalid))]
    InvalidConfig(String),
}

impl CounterError {
    /// Whether retrying the same call later can succeed
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            CounterError::ConcurrentResetViolation { .. }
                | CounterError::WorkersTimedOut { .. }
                | CounterError::DrainTimedOut { .. }
        )
    }
}

impl From<flume::RecvError> for CounterError {
    fn from(_: flume::RecvError) -> Self {
        CounterError::ExecutorClosed
    }
}
