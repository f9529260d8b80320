/*!
 * In-Flight Update Tracking
 *
 * Counts updates that have started but not finished, so a reset can refuse
 * to run underneath them.
 */

use crate::core::errors::{CounterError, CounterResult};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Shared in-flight counter
///
/// Cheap to clone; clones observe the same count.
#[derive(Debug, Clone, Default)]
pub struct InFlight {
    active: Arc<AtomicUsize>,
}

impl InFlight {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark one update as in flight until the returned guard drops
    ///
    /// The guard is `'static` so it can travel into a queued job.
    #[inline]
    pub fn enter(&self) -> InFlightGuard {
        self.active.fetch_add(1, Ordering::AcqRel);
        InFlightGuard {
            active: Arc::clone(&self.active),
        }
    }

    /// Updates currently in flight
    #[inline]
    pub fn current(&self) -> usize {
        self.active.load(Ordering::Acquire)
    }

    /// Fail with `ConcurrentResetViolation` unless nothing is in flight
    ///
    /// Best-effort: a worker that has not called `enter` yet is invisible.
    pub fn ensure_idle(&self) -> CounterResult<()> {
        match self.current() {
            0 => Ok(()),
            in_flight => Err(CounterError::ConcurrentResetViolation { in_flight }),
        }
    }
}

/// Decrements its tracker on drop
#[must_use = "the update is only tracked while the guard is alive"]
#[derive(Debug)]
pub struct InFlightGuard {
    active: Arc<AtomicUsize>,
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.active.fetch_sub(1, Ordering::AcqRel);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_guard_tracks_scope() {
        let tracker = InFlight::new();
        assert_eq!(tracker.current(), 0);

        let first = tracker.enter();
        let second = tracker.enter();
        assert_eq!(tracker.current(), 2);
        assert_eq!(
            tracker.ensure_idle(),
            Err(CounterError::ConcurrentResetViolation { in_flight: 2 })
        );

        drop(first);
        drop(second);
        assert!(tracker.ensure_idle().is_ok());
    }

    #[test]
    fn test_guard_released_on_panic() {
        let tracker = InFlight::new();
        let worker_tracker = tracker.clone();

        let result = thread::spawn(move || {
            let _guard = worker_tracker.enter();
            panic!("update failed");
        })
        .join();

        assert!(result.is_err());
        assert_eq!(tracker.current(), 0);
    }
}
