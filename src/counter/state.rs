/*!
 * Counter State
 *
 * Plain numeric state plus the update rule. Provides no concurrency
 * guarantees of its own; the enclosing variant decides how calls are
 * coordinated.
 */

use super::rule;
use crate::core::errors::CounterResult;
use crate::core::limits::INITIAL_VALUE;

/// A single floating point counter
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Counter {
    value: f64,
}

impl Counter {
    pub const fn new() -> Self {
        Self::with_value(INITIAL_VALUE)
    }

    pub const fn with_value(value: f64) -> Self {
        Self { value }
    }

    /// Apply `v = v * 1.1 + 1`
    ///
    /// On overflow the value saturates at its last finite state and
    /// `NumericOverflow` is returned.
    #[inline]
    pub fn update(&mut self) -> CounterResult<()> {
        self.value = rule::checked_apply(self.value)?;
        Ok(())
    }

    #[inline]
    pub fn read(&self) -> f64 {
        self.value
    }

    /// Return to the initial value
    #[inline]
    pub fn reset(&mut self) {
        self.value = INITIAL_VALUE;
    }
}

impl Default for Counter {
    fn default() -> Self {
        Self::new()
    }
}
