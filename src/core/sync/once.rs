/*!
 * Counted One-Time Initialization
 *
 * `OnceLock` wrapper that also records how many times its initializer ran,
 * so exactly-once construction under concurrent first access can be observed.
 *
 * Initialization is double-checked: a lock-free `get` on the fast path, and
 * an init lock serializing first-time callers so a fallible initializer can
 * leave the cell empty on error.
 */

use parking_lot::{const_mutex, Mutex};
use std::convert::Infallible;
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::OnceLock;

/// Lazily constructed shared instance with a construction counter
pub struct SingletonCell<T> {
    cell: OnceLock<T>,
    init_lock: Mutex<()>,
    constructed: AtomicUsize,
}

impl<T> SingletonCell<T> {
    pub const fn new() -> Self {
        Self {
            cell: OnceLock::new(),
            init_lock: const_mutex(()),
            constructed: AtomicUsize::new(0),
        }
    }

    /// Return the instance, constructing it on first access
    ///
    /// Concurrent first callers block until the single winning initializer
    /// finishes; `init` runs at most once per cell.
    pub fn get_or_init<F>(&self, init: F) -> &T
    where
        F: FnOnce() -> T,
    {
        match self.get_or_try_init(|| Ok::<T, Infallible>(init())) {
            Ok(value) => value,
            Err(never) => match never {},
        }
    }

    /// Fallible variant of [`get_or_init`](Self::get_or_init)
    ///
    /// A failed initializer leaves the cell empty and does not count as a
    /// construction; the next caller retries.
    pub fn get_or_try_init<F, E>(&self, init: F) -> Result<&T, E>
    where
        F: FnOnce() -> Result<T, E>,
    {
        if let Some(value) = self.cell.get() {
            return Ok(value);
        }

        let _init = self.init_lock.lock();
        if let Some(value) = self.cell.get() {
            return Ok(value);
        }

        let value = init()?;
        self.constructed.fetch_add(1, Ordering::SeqCst);
        Ok(self.cell.get_or_init(|| value))
    }

    /// The instance, if already constructed
    #[inline]
    pub fn get(&self) -> Option<&T> {
        self.cell.get()
    }

    /// Number of times the initializer has run
    #[inline]
    pub fn instances_created(&self) -> usize {
        self.constructed.load(Ordering::SeqCst)
    }
}

impl<T> Default for SingletonCell<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: fmt::Debug> fmt::Debug for SingletonCell<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SingletonCell")
            .field("value", &self.cell.get())
            .field("instances_created", &self.instances_created())
            .finish()
    }
}
