/*!
 * Benchmark Harness
 *
 * Concurrent runs over the counter variants:
 * - `HarnessConfig`: worker counts, wait bound, submit mode
 * - `Harness`: spawns workers, waits on completion, observes the result
 * - `BenchmarkResult`: final value against the sequential reference
 */

mod config;
mod report;
mod runner;

pub use config::HarnessConfig;
pub use report::{render_table, BenchmarkResult};
pub use runner::Harness;
