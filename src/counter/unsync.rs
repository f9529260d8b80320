/*!
 * Unsynchronized Counter
 *
 * Negative control: the read-modify-write sequence is not atomic, so
 * concurrent callers overwrite each other's results (lost updates).
 *
 * The value lives in an `AtomicU64` holding the f64 bits, accessed with a
 * separate relaxed load and store. Each access is atomic, so there is no
 * data race in the language sense; only the composite update is unguarded.
 * A `yield_now` between load and store widens the window in which another
 * worker can interleave.
 */

use super::rule;
use super::traits::CounterStrategy;
use crate::core::errors::CounterResult;
use crate::core::guard::InFlight;
use crate::core::limits::INITIAL_VALUE;
use crate::core::types::VariantKind;
use std::sync::atomic::{AtomicU64, Ordering};
use std::thread;

/// Counter with no mutual exclusion
#[derive(Debug)]
pub struct UnsyncCounter {
    bits: AtomicU64,
    in_flight: InFlight,
}

impl UnsyncCounter {
    pub fn new() -> Self {
        Self {
            bits: AtomicU64::new(INITIAL_VALUE.to_bits()),
            in_flight: InFlight::new(),
        }
    }

    #[inline(always)]
    fn load(&self) -> f64 {
        f64::from_bits(self.bits.load(Ordering::Relaxed))
    }

    #[inline(always)]
    fn store(&self, value: f64) {
        self.bits.store(value.to_bits(), Ordering::Relaxed);
    }
}

impl Default for UnsyncCounter {
    fn default() -> Self {
        Self::new()
    }
}

impl CounterStrategy for UnsyncCounter {
    fn increment(&self) -> CounterResult<()> {
        let _in_flight = self.in_flight.enter();
        let next = rule::checked_apply(self.load())?;
        thread::yield_now();
        self.store(next);
        Ok(())
    }

    fn read(&self) -> CounterResult<f64> {
        Ok(self.load())
    }

    fn reset(&self) -> CounterResult<()> {
        self.in_flight.ensure_idle()?;
        self.store(INITIAL_VALUE);
        Ok(())
    }

    fn in_flight(&self) -> usize {
        self.in_flight.current()
    }

    fn kind(&self) -> VariantKind {
        VariantKind::Unsynchronized
    }
}
