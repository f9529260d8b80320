/*!
 * RAII Guards
 *
 * Scope-bound bookkeeping with automatic cleanup on every exit path,
 * including unwinding.
 *
 * ## Guard Types
 *
 * - **InFlightGuard**: Marks one update as in flight for the guard's lifetime
 *
 * ## Example
 *
 * ```rust
 * use singleton_counter::core::guard::InFlight;
 *
 * let tracker = InFlight::new();
 * {
 *     let _guard = tracker.enter();
 *     assert!(tracker.ensure_idle().is_err());
 * }
 * assert!(tracker.ensure_idle().is_ok());
 * ```
 */

mod in_flight;

pub use in_flight::{InFlight, InFlightGuard};
