/*!
 * Counter Module
 *
 * A floating point counter under four concurrency disciplines:
 * - **Unsynchronized**: no coordination (lost updates under concurrency)
 * - **ExclusiveLock**: mutex per call
 * - **SerializedQueue**: single ordered executor thread
 * - **ConcurrentBarrier**: shared readers, exclusive writers
 *
 * All four apply the same update rule through the `CounterStrategy`
 * contract, and are handed out as lazily constructed singletons by the
 * `VariantRegistry`.
 */

pub mod rule;

mod barrier;
mod locked;
mod registry;
mod serial;
mod shared;
mod state;
mod traits;
mod unsync;

pub use barrier::BarrierCounter;
pub use locked::LockedCounter;
pub use registry::VariantRegistry;
pub use serial::SerialCounter;
pub use shared::SharedCounter;
pub use state::Counter;
pub use traits::CounterStrategy;
pub use unsync::UnsyncCounter;
