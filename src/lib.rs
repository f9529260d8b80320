/*!
 * Singleton Counter Library
 *
 * A process-wide numeric counter mutated by many concurrent workers under
 * four concurrency disciplines, plus the harness that exposes the
 * difference between them.
 */

pub mod core;
pub mod counter;
pub mod harness;
pub mod monitoring;

// Re-exports
pub use crate::core::errors::{CounterError, CounterResult};
pub use crate::core::types::{SubmitMode, VariantKind};
pub use counter::{CounterStrategy, SharedCounter, VariantRegistry};
pub use harness::{render_table, BenchmarkResult, Harness, HarnessConfig};
pub use monitoring::init_tracing;
