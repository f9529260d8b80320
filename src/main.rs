/*!
 * Counter Bench - Main Entry Point
 *
 * Runs every counter variant twice:
 * - sequentially, as the determinism baseline
 * - with concurrent workers, to expose lost updates in the unsynchronized
 *   variant and their absence in the others
 *
 * Usage: counter-bench [all|<variant>...] [--json]
 */

use anyhow::{Context, Result};
use singleton_counter::core::limits::SEQUENTIAL_DEMO_ITERATIONS;
use singleton_counter::{
    init_tracing, render_table, BenchmarkResult, Harness, HarnessConfig, VariantKind,
    VariantRegistry,
};
use tracing::{info, warn};

fn parse_args() -> Result<(Vec<VariantKind>, bool)> {
    let mut kinds: Vec<VariantKind> = Vec::new();
    let mut json = false;

    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--json" => json = true,
            "all" => kinds.extend(VariantKind::ALL),
            name => kinds.push(
                name.parse::<VariantKind>()
                    .with_context(|| format!("unrecognized argument '{}'", name))?,
            ),
        }
    }

    if kinds.is_empty() {
        kinds.extend(VariantKind::ALL);
    }
    Ok((unique_in_order(kinds), json))
}

/// Drop repeated variants, keeping the first occurrence
fn unique_in_order(mut kinds: Vec<VariantKind>) -> Vec<VariantKind> {
    let mut seen = [false; VariantKind::COUNT];
    kinds.retain(|kind| !std::mem::replace(&mut seen[kind.index()], true));
    kinds
}

/// Run the concurrent benchmark, retrying once on a transient failure
fn run_concurrent(harness: &Harness, kind: VariantKind) -> Result<BenchmarkResult> {
    match harness.run_default(kind) {
        Err(e) if e.is_transient() => {
            warn!(variant = %kind, error = %e, "transient failure, retrying once");
            harness.reset(kind)?;
            harness
                .run_default(kind)
                .with_context(|| format!("concurrent run of {} failed after retry", kind))
        }
        other => other.with_context(|| format!("concurrent run of {} failed", kind)),
    }
}

fn main() -> Result<()> {
    init_tracing();

    let (kinds, json) = parse_args()?;
    let config = HarnessConfig::from_env().context("invalid benchmark configuration")?;

    info!(
        workers = config.workers,
        increments = config.increments_per_worker,
        wait_ms = config.wait_timeout.as_millis() as u64,
        submit = ?config.submit_mode,
        "Counter bench starting"
    );

    let registry = VariantRegistry::global(config.submit_mode);
    let harness = Harness::with_registry(registry, config)?;

    let mut results = Vec::with_capacity(kinds.len() * 2);
    for kind in kinds {
        let sequential = harness
            .run_sequential(kind, SEQUENTIAL_DEMO_ITERATIONS)
            .with_context(|| format!("sequential run of {} failed", kind))?;
        results.push(sequential);

        harness.reset(kind)?;

        let concurrent = run_concurrent(&harness, kind)?;

        if kind.is_synchronized() && !concurrent.is_consistent() {
            warn!(variant = %kind, "synchronized variant diverged from the sequential reference");
        } else if !kind.is_synchronized() && !concurrent.is_consistent() {
            info!(variant = %kind, lost_updates = ?concurrent.lost_updates, "lost updates observed");
        }
        results.push(concurrent);
    }

    if json {
        for result in &results {
            println!("{}", result.to_json()?);
        }
    } else {
        print!("{}", render_table(&results));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repeated_variants_run_once() {
        let kinds = unique_in_order(vec![
            VariantKind::Unsynchronized,
            VariantKind::ExclusiveLock,
            VariantKind::Unsynchronized,
            VariantKind::SerializedQueue,
            VariantKind::ConcurrentBarrier,
            VariantKind::ExclusiveLock,
        ]);
        assert_eq!(kinds, VariantKind::ALL.to_vec());
    }
}
