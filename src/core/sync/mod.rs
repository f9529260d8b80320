/*!
 * Synchronization Primitives
 *
 * Building blocks shared by the counter variants and the harness:
 * - `WaitGroup`: counting completion barrier replacing sleep-based joins
 * - `SerialExecutor`: single ordered consumer thread owning its state
 * - `SingletonCell`: one-time initialization with a construction counter
 */

mod executor;
mod once;
mod wait_group;

pub use executor::SerialExecutor;
pub use once::SingletonCell;
pub use wait_group::{Completion, WaitGroup};
