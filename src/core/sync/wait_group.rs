/*!
 * Wait Group
 *
 * Counting completion barrier: every participant signals once when it
 * finishes, and a coordinator blocks until all of them have.
 *
 * Built on `parking_lot::{Mutex, Condvar}` like the condvar wait strategy,
 * but keyed on a single pending count instead of a slot table.
 */

use parking_lot::{Condvar, Mutex};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

struct Inner {
    pending: Mutex<usize>,
    condvar: Condvar,
    completed: AtomicUsize,
}

/// Shared completion counter
///
/// Clones refer to the same group.
///
/// # Example
///
/// ```
/// use singleton_counter::core::sync::WaitGroup;
/// use std::time::Duration;
///
/// let wg = WaitGroup::new(2);
/// for _ in 0..2 {
///     let wg = wg.clone();
///     std::thread::spawn(move || wg.done());
/// }
/// assert!(wg.wait_timeout(Duration::from_secs(5)));
/// ```
#[derive(Clone)]
pub struct WaitGroup {
    inner: Arc<Inner>,
}

impl WaitGroup {
    /// Create a group expecting `count` completions
    pub fn new(count: usize) -> Self {
        Self {
            inner: Arc::new(Inner {
                pending: Mutex::new(count),
                condvar: Condvar::new(),
                completed: AtomicUsize::new(0),
            }),
        }
    }

    /// Expect `n` more completions
    ///
    /// Call before starting the participant, so its `done` cannot arrive
    /// first and be discarded.
    pub fn add(&self, n: usize) {
        *self.inner.pending.lock() += n;
    }

    /// Signal one completion
    ///
    /// Extra signals past zero are ignored.
    pub fn done(&self) {
        let mut pending = self.inner.pending.lock();
        if *pending == 0 {
            return;
        }
        *pending -= 1;
        self.inner.completed.fetch_add(1, Ordering::Relaxed);
        if *pending == 0 {
            self.inner.condvar.notify_all();
        }
    }

    /// Guard that signals completion when dropped, including during unwinding
    pub fn completion(&self) -> Completion {
        Completion {
            group: self.clone(),
        }
    }

    /// Completions still outstanding
    pub fn pending(&self) -> usize {
        *self.inner.pending.lock()
    }

    /// Completions signalled so far
    pub fn completed(&self) -> usize {
        self.inner.completed.load(Ordering::Relaxed)
    }

    /// Block until every participant has signalled
    pub fn wait(&self) {
        let mut pending = self.inner.pending.lock();
        while *pending > 0 {
            self.inner.condvar.wait(&mut pending);
        }
    }

    /// Block until every participant has signalled or `timeout` elapses
    ///
    /// Returns `true` if the group completed.
    pub fn wait_timeout(&self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        let mut pending = self.inner.pending.lock();
        while *pending > 0 {
            if self
                .inner
                .condvar
                .wait_until(&mut pending, deadline)
                .timed_out()
            {
                return *pending == 0;
            }
        }
        true
    }
}

/// Signals its wait group on drop
pub struct Completion {
    group: WaitGroup,
}

impl Drop for Completion {
    fn drop(&mut self) {
        self.group.done();
    }
}
