/*!
 * Exclusive-Lock Counter
 * Mutual exclusion acquired and released around each call
 */

use super::state::Counter;
use super::traits::CounterStrategy;
use crate::core::errors::CounterResult;
use crate::core::guard::InFlight;
use crate::core::types::VariantKind;
use parking_lot::Mutex;

/// Counter guarded by a `parking_lot::Mutex`
///
/// The lock guard is scoped to the call, so it is released on every exit
/// path: normal return, the overflow error, and unwinding.
#[derive(Debug, Default)]
pub struct LockedCounter {
    state: Mutex<Counter>,
    in_flight: InFlight,
}

impl LockedCounter {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CounterStrategy for LockedCounter {
    fn increment(&self) -> CounterResult<()> {
        let _in_flight = self.in_flight.enter();
        self.state.lock().update()
    }

    fn read(&self) -> CounterResult<f64> {
        Ok(self.state.lock().read())
    }

    fn reset(&self) -> CounterResult<()> {
        self.in_flight.ensure_idle()?;
        // Callers blocked on the lock have already registered as in flight
        let mut state = self.state.lock();
        self.in_flight.ensure_idle()?;
        state.reset();
        Ok(())
    }

    fn in_flight(&self) -> usize {
        self.in_flight.current()
    }

    fn kind(&self) -> VariantKind {
        VariantKind::ExclusiveLock
    }
}
