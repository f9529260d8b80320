/*!
 * Update Rule
 *
 * The fixed transform `f(v) = v * 1.1 + 1` and the reference values
 * derived from it.
 *
 * `f` is affine, so `f^n(v0) = a^n * (v0 + k) - k` with `a = 1.1` and
 * `k = 1 / (a - 1)`. The closed form is only used to estimate how many
 * updates produced an observed value; exact comparisons always go through
 * `iterate`, which applies `f` in the same order as the counters do.
 */

use crate::core::errors::{CounterError, CounterResult};
use crate::core::limits::{GROWTH_FACTOR, INCREMENT, INITIAL_VALUE};

/// Fixed point offset `k` of the affine rule
const OFFSET: f64 = INCREMENT / (GROWTH_FACTOR - 1.0);

/// Apply the update rule once
#[inline(always)]
pub fn apply(value: f64) -> f64 {
    value * GROWTH_FACTOR + INCREMENT
}

/// Apply the update rule once, refusing to leave the finite range
///
/// The error carries the value the update started from.
#[inline]
pub fn checked_apply(value: f64) -> CounterResult<f64> {
    let next = apply(value);
    if next.is_finite() {
        Ok(next)
    } else {
        Err(CounterError::NumericOverflow { value })
    }
}

/// `f^n(INITIAL_VALUE)`, computed sequentially
pub fn iterate(n: usize) -> f64 {
    iterate_from(INITIAL_VALUE, n)
}

/// `f^n(start)`, computed sequentially
pub fn iterate_from(start: f64, n: usize) -> f64 {
    (0..n).fold(start, |value, _| apply(value))
}

/// `f^n(INITIAL_VALUE)` via the closed form (approximate)
pub fn closed_form(n: usize) -> f64 {
    GROWTH_FACTOR.powi(n as i32) * (INITIAL_VALUE + OFFSET) - OFFSET
}

/// Number of updates that turn `start` into `value`
///
/// Returns `None` for values the rule cannot reach from `start`
/// (non-finite, or below the starting point).
pub fn applied_updates(start: f64, value: f64) -> Option<u64> {
    if !start.is_finite() || !value.is_finite() || value < start {
        return None;
    }
    let ratio = (value + OFFSET) / (start + OFFSET);
    let steps = ratio.ln() / GROWTH_FACTOR.ln();
    Some(steps.round() as u64)
}
