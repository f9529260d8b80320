/*!
 * Variant Registry
 *
 * One lazily constructed `SharedCounter` per variant kind. The first caller
 * for a kind constructs it; every later caller, concurrent or not, gets the
 * same instance. Construction counts are kept per kind so the exactly-once
 * guarantee is observable.
 *
 * Registries are normally caller-owned; `global()` provides a process-wide
 * one for the binary.
 */

use super::shared::SharedCounter;
use crate::core::errors::CounterResult;
use crate::core::sync::SingletonCell;
use crate::core::types::{SubmitMode, VariantKind};
use std::sync::{Arc, OnceLock};
use tracing::info;

/// Process-wide registry used by the binary
static GLOBAL_REGISTRY: OnceLock<Arc<VariantRegistry>> = OnceLock::new();

/// Lazily constructed counters, one per variant kind
#[derive(Debug)]
pub struct VariantRegistry {
    cells: [SingletonCell<SharedCounter>; VariantKind::COUNT],
    submit_mode: SubmitMode,
}

impl VariantRegistry {
    pub fn new(submit_mode: SubmitMode) -> Self {
        Self {
            cells: [const { SingletonCell::new() }; VariantKind::COUNT],
            submit_mode,
        }
    }

    /// Get or initialize the process-wide registry
    ///
    /// The submit mode of the first caller wins.
    pub fn global(submit_mode: SubmitMode) -> Arc<Self> {
        Arc::clone(GLOBAL_REGISTRY.get_or_init(|| Arc::new(Self::new(submit_mode))))
    }

    /// The shared instance for `kind`, constructed on first access
    pub fn get(&self, kind: VariantKind) -> CounterResult<&SharedCounter> {
        self.cells[kind.index()].get_or_try_init(|| -> CounterResult<SharedCounter> {
            let counter = SharedCounter::new(kind, self.submit_mode)?;
            info!(variant = %kind, mode = ?self.submit_mode, "variant instance created");
            Ok(counter)
        })
    }

    /// The instance for `kind`, if some caller has already requested it
    pub fn try_get(&self, kind: VariantKind) -> Option<&SharedCounter> {
        self.cells[kind.index()].get()
    }

    /// How many times the instance for `kind` has been constructed (0 or 1)
    pub fn instances_created(&self, kind: VariantKind) -> usize {
        self.cells[kind.index()].instances_created()
    }

    pub fn total_instances_created(&self) -> usize {
        self.cells.iter().map(SingletonCell::instances_created).sum()
    }

    pub fn submit_mode(&self) -> SubmitMode {
        self.submit_mode
    }
}

impl Default for VariantRegistry {
    fn default() -> Self {
        Self::new(SubmitMode::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::counter::CounterStrategy;

    #[test]
    fn test_lazy_construction() {
        let registry = VariantRegistry::default();
        assert_eq!(registry.total_instances_created(), 0);
        assert!(registry.try_get(VariantKind::ExclusiveLock).is_none());

        let first = registry.get(VariantKind::ExclusiveLock).unwrap() as *const SharedCounter;
        let second = registry.get(VariantKind::ExclusiveLock).unwrap() as *const SharedCounter;

        assert_eq!(first, second);
        assert_eq!(registry.instances_created(VariantKind::ExclusiveLock), 1);
        assert_eq!(registry.instances_created(VariantKind::Unsynchronized), 0);
        assert_eq!(registry.total_instances_created(), 1);
    }

    #[test]
    fn test_kinds_do_not_share_counters() {
        let registry = VariantRegistry::default();
        registry.get(VariantKind::ExclusiveLock).unwrap().increment().unwrap();

        let barrier = registry.get(VariantKind::ConcurrentBarrier).unwrap();
        assert_eq!(barrier.read().unwrap(), 1.0);
        assert_eq!(barrier.kind(), VariantKind::ConcurrentBarrier);
    }
}
