/*!
 * Limits and Constants
 *
 * Centralized location for the update rule's constants and harness defaults.
 */

use std::time::Duration;

// =============================================================================
// UPDATE RULE
// =============================================================================

/// Value a fresh or reset counter holds
pub const INITIAL_VALUE: f64 = 1.0;

/// Multiplier applied on every update
pub const GROWTH_FACTOR: f64 = 1.1;

/// Constant added after the multiplication
pub const INCREMENT: f64 = 1.0;

// =============================================================================
// HARNESS DEFAULTS
// =============================================================================

/// Concurrent workers per benchmark run
pub const DEFAULT_WORKERS: usize = 100;

/// Updates each worker performs
pub const DEFAULT_INCREMENTS_PER_WORKER: usize = 1;

/// Upper bound on how long the harness waits for workers to finish
pub const DEFAULT_WAIT: Duration = Duration::from_secs(1);

/// Iterations of the single-threaded demo loop
pub const SEQUENTIAL_DEMO_ITERATIONS: usize = 100;

/// Hard cap on workers per run (each worker is an OS thread)
pub const MAX_WORKERS: usize = 4096;

/// Hard cap on updates a single worker performs
pub const MAX_INCREMENTS_PER_WORKER: usize = 1_000_000;
