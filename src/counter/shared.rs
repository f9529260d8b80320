/*!
 * Shared Counter
 *
 * Enum dispatch over the four variants, so the harness and registry hold a
 * single concrete type without `Box<dyn CounterStrategy>` indirection.
 */

use super::barrier::BarrierCounter;
use super::locked::LockedCounter;
use super::serial::SerialCounter;
use super::traits::CounterStrategy;
use super::unsync::UnsyncCounter;
use crate::core::errors::CounterResult;
use crate::core::types::{SubmitMode, VariantKind};
use std::time::Duration;

/// One counter under one concurrency discipline
#[derive(Debug)]
pub enum SharedCounter {
    Unsynchronized(UnsyncCounter),
    ExclusiveLock(LockedCounter),
    SerializedQueue(SerialCounter),
    ConcurrentBarrier(BarrierCounter),
}

impl SharedCounter {
    /// Construct the variant for `kind`
    ///
    /// `mode` only affects the serialized-queue variant.
    pub fn new(kind: VariantKind, mode: SubmitMode) -> CounterResult<Self> {
        Ok(match kind {
            VariantKind::Unsynchronized => Self::Unsynchronized(UnsyncCounter::new()),
            VariantKind::ExclusiveLock => Self::ExclusiveLock(LockedCounter::new()),
            VariantKind::SerializedQueue => Self::SerializedQueue(SerialCounter::new(mode)?),
            VariantKind::ConcurrentBarrier => Self::ConcurrentBarrier(BarrierCounter::new()),
        })
    }

    #[inline(always)]
    fn strategy(&self) -> &dyn CounterStrategy {
        match self {
            Self::Unsynchronized(c) => c,
            Self::ExclusiveLock(c) => c,
            Self::SerializedQueue(c) => c,
            Self::ConcurrentBarrier(c) => c,
        }
    }
}

impl CounterStrategy for SharedCounter {
    #[inline]
    fn increment(&self) -> CounterResult<()> {
        match self {
            Self::Unsynchronized(c) => c.increment(),
            Self::ExclusiveLock(c) => c.increment(),
            Self::SerializedQueue(c) => c.increment(),
            Self::ConcurrentBarrier(c) => c.increment(),
        }
    }

    #[inline]
    fn read(&self) -> CounterResult<f64> {
        match self {
            Self::Unsynchronized(c) => c.read(),
            Self::ExclusiveLock(c) => c.read(),
            Self::SerializedQueue(c) => c.read(),
            Self::ConcurrentBarrier(c) => c.read(),
        }
    }

    fn reset(&self) -> CounterResult<()> {
        self.strategy().reset()
    }

    fn in_flight(&self) -> usize {
        self.strategy().in_flight()
    }

    fn quiesce(&self, timeout: Duration) -> CounterResult<bool> {
        self.strategy().quiesce(timeout)
    }

    fn deferred_failures(&self) -> usize {
        self.strategy().deferred_failures()
    }

    fn kind(&self) -> VariantKind {
        match self {
            Self::Unsynchronized(_) => VariantKind::Unsynchronized,
            Self::ExclusiveLock(_) => VariantKind::ExclusiveLock,
            Self::SerializedQueue(_) => VariantKind::SerializedQueue,
            Self::ConcurrentBarrier(_) => VariantKind::ConcurrentBarrier,
        }
    }
}
