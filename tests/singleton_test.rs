/*!
 * Singleton Construction Tests
 * Exactly-once construction of shared counters under concurrent first access
 */

use pretty_assertions::assert_eq;
use serial_test::serial;
use singleton_counter::core::sync::SingletonCell;
use singleton_counter::{CounterStrategy, SharedCounter, SubmitMode, VariantKind, VariantRegistry};
use std::sync::{Arc, Barrier};
use std::thread;

#[test]
fn test_concurrent_first_access_creates_one_instance() {
    for kind in VariantKind::ALL {
        let registry = Arc::new(VariantRegistry::default());
        let start = Arc::new(Barrier::new(100));

        let handles: Vec<_> = (0..100)
            .map(|_| {
                let registry = Arc::clone(&registry);
                let start = Arc::clone(&start);
                thread::spawn(move || {
                    start.wait();
                    registry.get(kind).unwrap() as *const SharedCounter as usize
                })
            })
            .collect();

        let addresses: Vec<usize> = handles.into_iter().map(|h| h.join().unwrap()).collect();

        assert_eq!(registry.instances_created(kind), 1, "{}", kind);
        assert!(addresses.iter().all(|&a| a == addresses[0]));
        assert_eq!(registry.total_instances_created(), 1);
    }
}

#[test]
fn test_harness_workers_share_one_instance() {
    let harness = singleton_counter::Harness::new(Default::default()).unwrap();

    for kind in VariantKind::ALL {
        let result = harness
            .run(kind, 100, std::time::Duration::from_secs(10))
            .unwrap();
        assert_eq!(result.instances_created, 1);
    }
    assert_eq!(harness.registry().total_instances_created(), VariantKind::COUNT);
}

#[test]
fn test_cell_counts_only_successful_construction() {
    let cell = SingletonCell::<u32>::new();
    assert!(cell.get_or_try_init(|| Err::<u32, ()>(())).is_err());
    assert_eq!(cell.instances_created(), 0);

    assert_eq!(*cell.get_or_init(|| 9), 9);
    assert_eq!(cell.instances_created(), 1);
}

#[test]
#[serial]
fn test_global_registry_is_process_wide() {
    let first = VariantRegistry::global(SubmitMode::FireAndForget);
    let second = VariantRegistry::global(SubmitMode::Blocking);

    assert!(Arc::ptr_eq(&first, &second));
    // First caller's mode wins
    assert_eq!(second.submit_mode(), SubmitMode::FireAndForget);

    let counter = first.get(VariantKind::ExclusiveLock).unwrap();
    assert_eq!(counter.kind(), VariantKind::ExclusiveLock);
    assert_eq!(second.instances_created(VariantKind::ExclusiveLock), 1);
}
