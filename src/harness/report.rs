/*!
 * Benchmark Reporting
 *
 * Result records for a run and their table / JSON renderings.
 */

use crate::core::types::VariantKind;
use crate::counter::rule;
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;

/// Outcome of one benchmark run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkResult {
    pub run_id: String,
    pub variant: VariantKind,
    pub workers: usize,
    /// Updates the run issued
    pub updates_expected: usize,
    /// Value before the first update
    pub initial_value: f64,
    pub final_value: f64,
    /// `f^updates_expected(initial_value)`, computed sequentially
    pub expected_value: f64,
    /// Constructions of the variant's shared instance so far
    pub instances_created: usize,
    /// Updates the final value corresponds to, if reachable
    pub applied_updates: Option<u64>,
    /// Updates issued but not reflected in the final value
    pub lost_updates: Option<u64>,
    /// Updates that reported an error
    pub failed_updates: usize,
    pub elapsed_ms: f64,
}

impl BenchmarkResult {
    /// Fill in the derived fields from the raw observations
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn from_observation(
        run_id: String,
        variant: VariantKind,
        workers: usize,
        updates_expected: usize,
        initial_value: f64,
        final_value: f64,
        instances_created: usize,
        failed_updates: usize,
        elapsed_ms: f64,
    ) -> Self {
        let expected_value = rule::iterate_from(initial_value, updates_expected);
        let applied_updates = rule::applied_updates(initial_value, final_value);
        let lost_updates = applied_updates.map(|applied| (updates_expected as u64).saturating_sub(applied));

        Self {
            run_id,
            variant,
            workers,
            updates_expected,
            initial_value,
            final_value,
            expected_value,
            instances_created,
            applied_updates,
            lost_updates,
            failed_updates,
            elapsed_ms,
        }
    }

    /// Final value equals the sequential reference bit-for-bit and no
    /// update failed
    pub fn is_consistent(&self) -> bool {
        self.failed_updates == 0 && self.final_value.to_bits() == self.expected_value.to_bits()
    }

    /// Serialize as a single JSON line
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

/// Render results as a fixed-width text table
pub fn render_table(results: &[BenchmarkResult]) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<20} {:>7} {:>8} {:>14} {:>14} {:>6} {:>6} {:>9} {:>10}",
        "variant", "workers", "updates", "final", "expected", "lost", "failed", "instances", "elapsed"
    );
    let _ = writeln!(out, "{}", "-".repeat(102));

    for result in results {
        let lost = result
            .lost_updates
            .map(|n| n.to_string())
            .unwrap_or_else(|| "?".to_string());
        let _ = writeln!(
            out,
            "{:<20} {:>7} {:>8} {:>14.6e} {:>14.6e} {:>6} {:>6} {:>9} {:>8.2}ms",
            result.variant.as_str(),
            result.workers,
            result.updates_expected,
            result.final_value,
            result.expected_value,
            lost,
            result.failed_updates,
            result.instances_created,
            result.elapsed_ms,
        );
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(final_value: f64) -> BenchmarkResult {
        BenchmarkResult::from_observation(
            "run".into(),
            VariantKind::ExclusiveLock,
            100,
            100,
            1.0,
            final_value,
            1,
            0,
            1.5,
        )
    }

    #[test]
    fn test_consistent_result() {
        let result = sample(rule::iterate(100));
        assert!(result.is_consistent());
        assert_eq!(result.applied_updates, Some(100));
        assert_eq!(result.lost_updates, Some(0));
    }

    #[test]
    fn test_lost_updates_estimated() {
        let result = sample(rule::iterate(93));
        assert!(!result.is_consistent());
        assert_eq!(result.lost_updates, Some(7));
    }

    #[test]
    fn test_json_line() {
        let json = sample(rule::iterate(100)).to_json().unwrap();
        assert!(json.contains("\"variant\":\"exclusive-lock\""));
        assert!(!json.contains('\n'));
    }

    #[test]
    fn test_table_has_row_per_result() {
        let table = render_table(&[sample(rule::iterate(100)), sample(rule::iterate(50))]);
        assert_eq!(table.lines().count(), 4);
        assert!(table.contains("exclusive-lock"));
    }
}
