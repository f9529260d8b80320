/*!
 * Serialized-Queue Counter
 *
 * All access funnels through a single ordered executor thread that owns
 * the counter. Updates execute one at a time in submission order; the
 * caller either returns once the update is enqueued or waits for it,
 * depending on `SubmitMode`. Reads and resets are synchronous round-trips
 * through the same queue.
 */

use super::state::Counter;
use super::traits::CounterStrategy;
use crate::core::errors::CounterResult;
use crate::core::guard::InFlight;
use crate::core::sync::SerialExecutor;
use crate::core::types::{SubmitMode, VariantKind};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;

/// Counter owned by a serial executor thread
pub struct SerialCounter {
    executor: SerialExecutor<Counter>,
    in_flight: InFlight,
    mode: SubmitMode,
    deferred_failures: Arc<AtomicUsize>,
}

impl SerialCounter {
    pub fn new(mode: SubmitMode) -> CounterResult<Self> {
        Ok(Self {
            executor: SerialExecutor::spawn("serial-counter", Counter::new())?,
            in_flight: InFlight::new(),
            mode,
            deferred_failures: Arc::new(AtomicUsize::new(0)),
        })
    }
}

impl CounterStrategy for SerialCounter {
    fn increment(&self) -> CounterResult<()> {
        // Travels with the job so the update stays in flight until applied
        let in_flight = self.in_flight.enter();

        match self.mode {
            SubmitMode::FireAndForget => {
                let failures = Arc::clone(&self.deferred_failures);
                self.executor.submit(move |counter| {
                    let _in_flight = in_flight;
                    if let Err(e) = counter.update() {
                        failures.fetch_add(1, Ordering::Relaxed);
                        warn!(error = %e, "queued update failed");
                    }
                })
            }
            SubmitMode::Blocking => self.executor.call(move |counter| {
                let _in_flight = in_flight;
                counter.update()
            })?,
        }
    }

    fn read(&self) -> CounterResult<f64> {
        self.executor.call(|counter| counter.read())
    }

    fn reset(&self) -> CounterResult<()> {
        // Checked on the executor thread: updates queued ahead have run,
        // anything still counted was queued behind the reset
        let in_flight = self.in_flight.clone();
        self.executor.call(move |counter| -> CounterResult<()> {
            in_flight.ensure_idle()?;
            counter.reset();
            Ok(())
        })?
    }

    fn in_flight(&self) -> usize {
        self.in_flight.current()
    }

    fn quiesce(&self, timeout: Duration) -> CounterResult<bool> {
        self.executor.flush(timeout)
    }

    fn deferred_failures(&self) -> usize {
        self.deferred_failures.load(Ordering::Relaxed)
    }

    fn kind(&self) -> VariantKind {
        VariantKind::SerializedQueue
    }
}

impl std::fmt::Debug for SerialCounter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SerialCounter")
            .field("executor", &self.executor.name())
            .field("mode", &self.mode)
            .field("in_flight", &self.in_flight.current())
            .field("pending", &self.executor.pending())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::errors::CounterError;
    use crate::counter::rule;
    use std::thread;

    #[test]
    fn test_fire_and_forget_then_quiesce() {
        let counter = SerialCounter::new(SubmitMode::FireAndForget).unwrap();
        for _ in 0..100 {
            counter.increment().unwrap();
        }

        assert!(counter.quiesce(Duration::from_secs(5)).unwrap());
        assert_eq!(counter.in_flight(), 0);
        assert_eq!(counter.read().unwrap().to_bits(), rule::iterate(100).to_bits());
    }

    #[test]
    fn test_blocking_mode_applies_before_return() {
        let counter = SerialCounter::new(SubmitMode::Blocking).unwrap();
        counter.increment().unwrap();
        assert_eq!(counter.in_flight(), 0);
        assert_eq!(counter.read().unwrap(), rule::iterate(1));
    }

    #[test]
    fn test_reset_rejected_with_updates_queued_behind() {
        let counter = Arc::new(SerialCounter::new(SubmitMode::FireAndForget).unwrap());

        // Park the executor so later submissions stay queued
        counter
            .executor
            .submit(|_| thread::sleep(Duration::from_millis(200)))
            .unwrap();
        let reset = {
            let counter = Arc::clone(&counter);
            thread::spawn(move || counter.reset())
        };
        thread::sleep(Duration::from_millis(50));
        counter.increment().unwrap();

        assert_eq!(
            reset.join().unwrap(),
            Err(CounterError::ConcurrentResetViolation { in_flight: 1 })
        );

        assert!(counter.quiesce(Duration::from_secs(5)).unwrap());
        counter.reset().unwrap();
        assert_eq!(counter.read().unwrap(), 1.0);
    }
}
