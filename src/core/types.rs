/*!
 * Core Types
 * Common types shared by the counter variants and the harness
 */

use super::errors::CounterError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Concurrency discipline guarding a counter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum VariantKind {
    /// No coordination at all (negative control)
    Unsynchronized,
    /// Mutual exclusion per call
    ExclusiveLock,
    /// Single ordered consumer thread
    SerializedQueue,
    /// Shared readers, exclusive writers
    ConcurrentBarrier,
}

impl VariantKind {
    pub const COUNT: usize = 4;

    pub const ALL: [VariantKind; Self::COUNT] = [
        VariantKind::Unsynchronized,
        VariantKind::ExclusiveLock,
        VariantKind::SerializedQueue,
        VariantKind::ConcurrentBarrier,
    ];

    /// Stable kebab-case name
    pub const fn as_str(&self) -> &'static str {
        match self {
            VariantKind::Unsynchronized => "unsynchronized",
            VariantKind::ExclusiveLock => "exclusive-lock",
            VariantKind::SerializedQueue => "serialized-queue",
            VariantKind::ConcurrentBarrier => "concurrent-barrier",
        }
    }

    /// Whether concurrent updates are guaranteed not to be lost
    pub const fn is_synchronized(&self) -> bool {
        !matches!(self, VariantKind::Unsynchronized)
    }

    /// Position in `ALL`, usable as an array index
    pub const fn index(&self) -> usize {
        match self {
            VariantKind::Unsynchronized => 0,
            VariantKind::ExclusiveLock => 1,
            VariantKind::SerializedQueue => 2,
            VariantKind::ConcurrentBarrier => 3,
        }
    }
}

impl fmt::Display for VariantKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VariantKind {
    type Err = CounterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('_', "-").as_str() {
            "unsynchronized" | "unsync" => Ok(VariantKind::Unsynchronized),
            "exclusive-lock" | "lock" | "mutex" => Ok(VariantKind::ExclusiveLock),
            "serialized-queue" | "serial" | "queue" => Ok(VariantKind::SerializedQueue),
            "concurrent-barrier" | "barrier" | "rwlock" => Ok(VariantKind::ConcurrentBarrier),
            other => Err(CounterError::InvalidConfig(format!(
                "unknown variant '{}'",
                other
            ))),
        }
    }
}

/// How a queued increment is handed to the serial executor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SubmitMode {
    /// Return once the update is enqueued
    #[default]
    FireAndForget,
    /// Return once the update has executed
    Blocking,
}

impl FromStr for SubmitMode {
    type Err = CounterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "fire-and-forget" | "async" => Ok(SubmitMode::FireAndForget),
            "blocking" | "sync" => Ok(SubmitMode::Blocking),
            other => Err(CounterError::InvalidConfig(format!(
                "unknown submit mode '{}'",
                other
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variant_names_round_trip() {
        for kind in VariantKind::ALL {
            assert_eq!(kind.as_str().parse::<VariantKind>().unwrap(), kind);
        }
    }

    #[test]
    fn test_variant_aliases() {
        assert_eq!("MUTEX".parse::<VariantKind>().unwrap(), VariantKind::ExclusiveLock);
        assert_eq!(
            "serialized_queue".parse::<VariantKind>().unwrap(),
            VariantKind::SerializedQueue
        );
        assert!("spinlock".parse::<VariantKind>().is_err());
    }

    #[test]
    fn test_indices_are_distinct() {
        let mut seen = [false; VariantKind::COUNT];
        for kind in VariantKind::ALL {
            assert!(!seen[kind.index()]);
            seen[kind.index()] = true;
        }
    }
}
