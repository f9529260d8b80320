/*!
 * Harness Tests
 * Run orchestration, bounded waits and reporting
 */

use pretty_assertions::assert_eq;
use proptest::prelude::*;
use singleton_counter::counter::rule;
use singleton_counter::{
    render_table, BenchmarkResult, CounterError, CounterStrategy, Harness, HarnessConfig, VariantKind,
};
use std::time::Duration;

#[test]
fn test_bounded_wait_reports_timeout() {
    let config = HarnessConfig {
        increments_per_worker: 5_000,
        ..HarnessConfig::default()
    };
    let harness = Harness::new(config).unwrap();

    let err = harness
        .run(VariantKind::Unsynchronized, 64, Duration::from_nanos(1))
        .unwrap_err();

    match err {
        CounterError::WorkersTimedOut {
            completed,
            expected,
            ..
        } => {
            assert_eq!(expected, 64);
            assert!(completed < expected);
        }
        other => panic!("expected timeout, got {:?}", other),
    }
}

#[test]
fn test_sequential_demo_value() {
    let harness = Harness::new(HarnessConfig::default()).unwrap();
    let result = harness
        .run_sequential(VariantKind::ExclusiveLock, 100)
        .unwrap();

    // f^100(1.0) = 11 * 1.1^100 - 10, roughly 1.5e5
    assert_eq!(result.final_value.to_bits(), rule::iterate(100).to_bits());
    assert!((result.final_value - rule::closed_form(100)).abs() / result.final_value < 1e-9);
    assert_eq!(result.workers, 1);
}

#[test]
fn test_reset_through_harness() {
    let harness = Harness::new(HarnessConfig::default()).unwrap();
    harness.run_sequential(VariantKind::SerializedQueue, 10).unwrap();

    harness.reset(VariantKind::SerializedQueue).unwrap();
    let value = harness
        .counter(VariantKind::SerializedQueue)
        .unwrap()
        .read()
        .unwrap();
    assert_eq!(value, 1.0);
}

#[test]
fn test_results_render_and_serialize() {
    let harness = Harness::new(HarnessConfig::default()).unwrap();
    let results: Vec<BenchmarkResult> = VariantKind::ALL
        .into_iter()
        .map(|kind| harness.run(kind, 10, Duration::from_secs(10)).unwrap())
        .collect();

    let table = render_table(&results);
    for kind in VariantKind::ALL {
        assert!(table.contains(kind.as_str()));
    }

    for result in &results {
        let json = result.to_json().unwrap();
        let back: BenchmarkResult = serde_json::from_str(&json).unwrap();
        assert_eq!(back.run_id, result.run_id);
        assert_eq!(back.variant, result.variant);
        assert_eq!(back.instances_created, 1);
        assert!((back.final_value - result.final_value).abs() <= result.final_value * 1e-12);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn prop_sequential_runs_match_reference(n in 0usize..400, kind_index in 0usize..4) {
        let kind = VariantKind::ALL[kind_index];
        let harness = Harness::new(HarnessConfig::default()).unwrap();
        let result = harness.run_sequential(kind, n).unwrap();

        prop_assert_eq!(result.final_value.to_bits(), rule::iterate(n).to_bits());
        prop_assert_eq!(result.applied_updates, Some(n as u64));
        prop_assert!(result.is_consistent());
    }
}
