/*!
 * Concurrent-Barrier Counter
 *
 * Read-write exclusion: any number of readers may observe the value at
 * once, while a writer waits for in-flight readers to drain and then runs
 * alone. `parking_lot::RwLock` is writer-fair, so a stream of readers
 * cannot starve an update.
 */

use super::state::Counter;
use super::traits::CounterStrategy;
use crate::core::errors::CounterResult;
use crate::core::guard::InFlight;
use crate::core::types::VariantKind;
use parking_lot::RwLock;

/// Counter behind a reader-writer barrier
#[derive(Debug, Default)]
pub struct BarrierCounter {
    state: RwLock<Counter>,
    in_flight: InFlight,
}

impl BarrierCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `f` under a shared read lock
    ///
    /// Other readers may run concurrently; writers are excluded.
    pub fn with_read<R>(&self, f: impl FnOnce(&Counter) -> R) -> R {
        f(&self.state.read())
    }
}

impl CounterStrategy for BarrierCounter {
    fn increment(&self) -> CounterResult<()> {
        let _in_flight = self.in_flight.enter();
        self.state.write().update()
    }

    fn read(&self) -> CounterResult<f64> {
        Ok(self.state.read().read())
    }

    fn reset(&self) -> CounterResult<()> {
        self.in_flight.ensure_idle()?;
        let mut state = self.state.write();
        self.in_flight.ensure_idle()?;
        state.reset();
        Ok(())
    }

    fn in_flight(&self) -> usize {
        self.in_flight.current()
    }

    fn kind(&self) -> VariantKind {
        VariantKind::ConcurrentBarrier
    }
}
