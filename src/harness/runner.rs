/*!
 * Benchmark Runner
 *
 * Launches concurrent workers against one variant's shared counter and
 * observes the outcome.
 *
 * # Completion
 *
 * Workers signal a `WaitGroup` as they finish (also when they panic). The
 * harness blocks on it for at most the configured wait bound, then drains
 * any updates the variant accepted but has not applied yet. An elapsed
 * bound is reported as an error rather than read as completion.
 */

use super::config::HarnessConfig;
use super::report::BenchmarkResult;
use crate::core::errors::{CounterError, CounterResult};
use crate::core::limits::{INITIAL_VALUE, MAX_WORKERS};
use crate::core::sync::WaitGroup;
use crate::core::types::VariantKind;
use crate::counter::{CounterStrategy, SharedCounter, VariantRegistry};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, info, info_span, warn};
use uuid::Uuid;

/// Drives benchmark runs against a variant registry
pub struct Harness {
    registry: Arc<VariantRegistry>,
    config: HarnessConfig,
}

impl Harness {
    /// Create a harness with its own registry
    pub fn new(config: HarnessConfig) -> CounterResult<Self> {
        let registry = Arc::new(VariantRegistry::new(config.submit_mode));
        Self::with_registry(registry, config)
    }

    /// Create a harness over an existing registry
    pub fn with_registry(registry: Arc<VariantRegistry>, config: HarnessConfig) -> CounterResult<Self> {
        config.validate()?;
        Ok(Self { registry, config })
    }

    pub fn config(&self) -> &HarnessConfig {
        &self.config
    }

    pub fn registry(&self) -> &Arc<VariantRegistry> {
        &self.registry
    }

    /// The shared counter for `kind`, constructing it if needed
    pub fn counter(&self, kind: VariantKind) -> CounterResult<&SharedCounter> {
        self.registry.get(kind)
    }

    /// Reset the counter for `kind`
    ///
    /// Must only be called with no run in progress; a detected violation
    /// is returned as `ConcurrentResetViolation`.
    pub fn reset(&self, kind: VariantKind) -> CounterResult<()> {
        self.registry.get(kind)?.reset()
    }

    /// Run with the configured worker count and wait bound
    pub fn run_default(&self, kind: VariantKind) -> CounterResult<BenchmarkResult> {
        self.run(kind, self.config.workers, self.config.wait_timeout)
    }

    /// Launch `workers` concurrent workers against `kind`
    ///
    /// Each worker resolves the shared instance through the registry and
    /// performs `increments_per_worker` updates. No ordering is imposed
    /// between workers.
    pub fn run(
        &self,
        kind: VariantKind,
        workers: usize,
        wait: Duration,
    ) -> CounterResult<BenchmarkResult> {
        let increments = self.config.increments_per_worker;
        let updates_expected = planned_updates(workers, increments)?;

        let run_id = Uuid::new_v4().to_string();
        let span = info_span!("benchmark", run_id = %run_id, variant = %kind, workers);
        let _enter = span.enter();

        let (initial_value, failures_before) = self.prepare(kind)?;

        let group = WaitGroup::new(0);
        let failures = Arc::new(AtomicUsize::new(0));
        let mut handles = Vec::with_capacity(workers);
        let start = Instant::now();

        for worker in 0..workers {
            let registry = Arc::clone(&self.registry);
            let worker_group = group.clone();
            let failures = Arc::clone(&failures);

            group.add(1);
            let spawned = thread::Builder::new()
                .name(format!("{}-{}", kind, worker))
                .spawn(move || {
                    let _completion = worker_group.completion();
                    let counter = match registry.get(kind) {
                        Ok(counter) => counter,
                        Err(e) => {
                            warn!(worker, error = %e, "worker could not obtain counter");
                            failures.fetch_add(increments, Ordering::Relaxed);
                            return;
                        }
                    };
                    for _ in 0..increments {
                        if let Err(e) = counter.increment() {
                            debug!(worker, error = %e, "update failed");
                            failures.fetch_add(1, Ordering::Relaxed);
                        }
                    }
                });

            match spawned {
                Ok(handle) => handles.push(handle),
                Err(e) => {
                    // Already-running workers finish on their own
                    group.done();
                    warn!(worker, error = %e, "failed to spawn worker");
                    return Err(CounterError::SpawnFailed(e.to_string()));
                }
            }
        }

        if !group.wait_timeout(wait) {
            let completed = group.completed();
            warn!(completed, expected = workers, "wait bound elapsed before all workers finished");
            return Err(CounterError::WorkersTimedOut {
                completed,
                expected: workers,
                waited_ms: duration_ms(wait),
            });
        }

        for (worker, handle) in handles.into_iter().enumerate() {
            if handle.join().is_err() {
                return Err(CounterError::WorkerPanicked { worker });
            }
        }

        let counter = self.registry.get(kind)?;
        self.drain(counter, wait)?;
        let elapsed_ms = start.elapsed().as_secs_f64() * 1000.0;

        let failed_updates = failures.load(Ordering::Relaxed)
            + counter.deferred_failures().saturating_sub(failures_before);

        let result = BenchmarkResult::from_observation(
            run_id,
            kind,
            workers,
            updates_expected,
            initial_value,
            counter.read()?,
            self.registry.instances_created(kind),
            failed_updates,
            elapsed_ms,
        );

        info!(
            final_value = result.final_value,
            expected_value = result.expected_value,
            lost_updates = ?result.lost_updates,
            failed_updates = result.failed_updates,
            instances_created = result.instances_created,
            elapsed_ms = result.elapsed_ms,
            "benchmark complete"
        );

        Ok(result)
    }

    /// Apply `iterations` updates one at a time from the calling thread
    pub fn run_sequential(
        &self,
        kind: VariantKind,
        iterations: usize,
    ) -> CounterResult<BenchmarkResult> {
        let run_id = Uuid::new_v4().to_string();
        let span = info_span!("sequential", run_id = %run_id, variant = %kind, iterations);
        let _enter = span.enter();

        let (initial_value, failures_before) = self.prepare(kind)?;
        let counter = self.registry.get(kind)?;
        let start = Instant::now();

        let mut failed = 0;
        for _ in 0..iterations {
            if counter.increment().is_err() {
                failed += 1;
            }
        }
        self.drain(counter, self.config.wait_timeout)?;
        let elapsed_ms = start.elapsed().as_secs_f64() * 1000.0;

        let result = BenchmarkResult::from_observation(
            run_id,
            kind,
            1,
            iterations,
            initial_value,
            counter.read()?,
            self.registry.instances_created(kind),
            failed + counter.deferred_failures().saturating_sub(failures_before),
            elapsed_ms,
        );

        info!(
            final_value = result.final_value,
            consistent = result.is_consistent(),
            "sequential run complete"
        );

        Ok(result)
    }

    /// Reset an existing counter if configured and capture the starting
    /// value and failure count
    ///
    /// A counter nobody has requested yet is left unconstructed so the run
    /// itself performs the concurrent first access.
    fn prepare(&self, kind: VariantKind) -> CounterResult<(f64, usize)> {
        match self.registry.try_get(kind) {
            None => Ok((INITIAL_VALUE, 0)),
            Some(counter) => {
                if self.config.reset_before_run {
                    counter.reset()?;
                }
                Ok((counter.read()?, counter.deferred_failures()))
            }
        }
    }

    fn drain(&self, counter: &SharedCounter, wait: Duration) -> CounterResult<()> {
        if counter.quiesce(wait)? {
            Ok(())
        } else {
            Err(CounterError::DrainTimedOut {
                pending: counter.in_flight(),
                waited_ms: duration_ms(wait),
            })
        }
    }
}

/// Total updates for a run, rejecting worker counts the config would refuse
fn planned_updates(workers: usize, increments: usize) -> CounterResult<usize> {
    if workers == 0 {
        return Err(CounterError::InvalidConfig("workers must be at least 1".into()));
    }
    if workers > MAX_WORKERS {
        return Err(CounterError::InvalidConfig(format!(
            "workers must be at most {}",
            MAX_WORKERS
        )));
    }
    workers.checked_mul(increments).ok_or_else(|| {
        CounterError::InvalidConfig(format!(
            "{} workers x {} increments overflows the update count",
            workers, increments
        ))
    })
}

fn duration_ms(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::counter::rule;

    #[test]
    fn test_run_single_worker() {
        let harness = Harness::new(HarnessConfig::default()).unwrap();
        let result = harness
            .run(VariantKind::ExclusiveLock, 1, Duration::from_secs(5))
            .unwrap();

        assert_eq!(result.final_value, rule::iterate(1));
        assert_eq!(result.instances_created, 1);
        assert!(result.is_consistent());
    }

    #[test]
    fn test_zero_workers_rejected() {
        let harness = Harness::new(HarnessConfig::default()).unwrap();
        let err = harness
            .run(VariantKind::ExclusiveLock, 0, Duration::from_secs(1))
            .unwrap_err();
        assert!(matches!(err, CounterError::InvalidConfig(_)));
    }

    #[test]
    fn test_worker_cap_enforced_per_run() {
        let harness = Harness::new(HarnessConfig::default()).unwrap();
        let err = harness
            .run(VariantKind::ExclusiveLock, MAX_WORKERS + 1, Duration::from_secs(1))
            .unwrap_err();
        assert!(matches!(err, CounterError::InvalidConfig(_)));
        // Rejected before any instance was touched
        assert_eq!(harness.registry().instances_created(VariantKind::ExclusiveLock), 0);
    }

    #[test]
    fn test_update_count_overflow_rejected() {
        let err = planned_updates(2, usize::MAX / 2 + 1).unwrap_err();
        assert!(matches!(err, CounterError::InvalidConfig(_)));
        assert_eq!(planned_updates(100, 1).unwrap(), 100);
    }

    #[test]
    fn test_runs_reset_between_each_other() {
        let harness = Harness::new(HarnessConfig::default()).unwrap();
        let first = harness
            .run(VariantKind::ConcurrentBarrier, 10, Duration::from_secs(5))
            .unwrap();
        let second = harness
            .run(VariantKind::ConcurrentBarrier, 10, Duration::from_secs(5))
            .unwrap();

        assert_eq!(first.initial_value, 1.0);
        assert_eq!(second.initial_value, 1.0);
        assert_eq!(first.final_value, second.final_value);
        assert_eq!(second.instances_created, 1);
    }

    #[test]
    fn test_without_reset_runs_accumulate() {
        let config = HarnessConfig {
            reset_before_run: false,
            ..HarnessConfig::default()
        };
        let harness = Harness::new(config).unwrap();
        harness.run_sequential(VariantKind::ExclusiveLock, 5).unwrap();
        let result = harness.run_sequential(VariantKind::ExclusiveLock, 5).unwrap();

        assert_eq!(result.initial_value, rule::iterate(5));
        assert_eq!(result.final_value.to_bits(), rule::iterate(10).to_bits());
        assert!(result.is_consistent());
    }
}
