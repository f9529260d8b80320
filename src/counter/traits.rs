/*!
 * Counter Strategy Trait
 *
 * One contract, several concurrency disciplines. Every variant applies the
 * same update rule; they differ only in how concurrent callers are
 * coordinated.
 *
 * `SharedCounter` dispatches over the concrete variants with an enum; the
 * trait exists so the variants can also be driven generically (benchmarks,
 * tests).
 */

use crate::core::errors::CounterResult;
use crate::core::types::VariantKind;
use std::time::Duration;

/// Concurrency discipline around a single counter
///
/// Implementations must be:
/// - **Thread-safe to call**: `Send + Sync`, callable from many threads
/// - **Reset-checked**: `reset` refuses while updates are in flight
pub trait CounterStrategy: Send + Sync {
    /// Apply the update rule once
    fn increment(&self) -> CounterResult<()>;

    /// Current value
    fn read(&self) -> CounterResult<f64>;

    /// Return the value to `1.0`
    ///
    /// # Errors
    ///
    /// `ConcurrentResetViolation` if any update is running or queued.
    fn reset(&self) -> CounterResult<()>;

    /// Updates accepted but not yet applied
    fn in_flight(&self) -> usize;

    /// Wait until every accepted update has been applied
    ///
    /// Returns `Ok(false)` if `timeout` elapsed first. Variants that apply
    /// updates inside `increment` have nothing to wait for.
    fn quiesce(&self, timeout: Duration) -> CounterResult<bool> {
        let _ = timeout;
        Ok(true)
    }

    /// Updates that failed after `increment` had already returned
    fn deferred_failures(&self) -> usize {
        0
    }

    fn kind(&self) -> VariantKind;

    fn name(&self) -> &'static str {
        self.kind().as_str()
    }
}
