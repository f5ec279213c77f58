//! `evictor stress`: concurrent puts of distinct keys, then a consistency
//! check of the policy's running count against the cache

use super::{employee_cache, rng};
use crate::employee::Employee;
use evictor_cache::{EvictionConfig, MetricsSnapshot, PolicyKind};
use rand::Rng;
use serde::Serialize;
use std::sync::Barrier;
use std::thread;
use std::time::Instant;
use tracing::{debug, info};

pub struct StressOptions {
    pub threads: usize,
    pub entries_per_thread: u64,
    pub max_priority: u32,
    pub seed: Option<u64>,
}

#[derive(Debug, Serialize)]
struct StressReport {
    threads: usize,
    inserted: u64,
    tracked: u64,
    resident: u64,
    consistent: bool,
    within_bound: bool,
    elapsed_ms: u64,
    metrics: MetricsSnapshot,
}

pub fn execute(
    config: &EvictionConfig,
    kind: PolicyKind,
    options: StressOptions,
    json: bool,
) -> eyre::Result<()> {
    eyre::ensure!(options.threads > 0, "--threads must be greater than zero");
    eyre::ensure!(
        options.max_priority > 0,
        "--max-priority must be greater than zero"
    );

    let cache = employee_cache(config, kind)?;
    let barrier = Barrier::new(options.threads);
    let base_seed = rng(options.seed).gen::<u64>();

    info!(
        threads = options.threads,
        per_thread = options.entries_per_thread,
        max_size = config.max_size,
        "Starting stress run"
    );
    let started = Instant::now();

    thread::scope(|scope| {
        for t in 0..options.threads {
            let cache = &cache;
            let barrier = &barrier;
            let options = &options;
            scope.spawn(move || {
                let mut rng = rng(Some(base_seed.wrapping_add(t as u64)));
                barrier.wait();
                for i in 0..options.entries_per_thread {
                    let id = t as u64 * options.entries_per_thread + i;
                    cache.put(id, Employee::new(id, rng.gen_range(0..options.max_priority)));
                }
                debug!(thread = t, "Writer finished");
            });
        }
    });

    let elapsed = started.elapsed();
    let tracked = cache.policy().tracked();
    let resident = cache.len() as u64;
    let report = StressReport {
        threads: options.threads,
        inserted: options.threads as u64 * options.entries_per_thread,
        tracked,
        resident,
        consistent: tracked == resident,
        within_bound: tracked <= config.max_size,
        elapsed_ms: elapsed.as_millis() as u64,
        metrics: cache.policy().snapshot(),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!(
            "{} puts on {} threads in {:?}",
            report.inserted, report.threads, elapsed
        );
        println!(
            "tracked={} resident={} max_size={}",
            report.tracked, report.resident, config.max_size
        );
        println!(
            "evictions={} rollbacks={} refusals={}",
            report.metrics.evictions, report.metrics.rollbacks, report.metrics.refusals
        );
    }

    eyre::ensure!(
        report.consistent,
        "tracked count {} does not match resident count {}",
        report.tracked,
        report.resident
    );
    Ok(())
}
