use clap::Subcommand;

pub mod demo;
pub mod stress;

use crate::employee::Employee;
use evictor_cache::{
    create_eviction_policy, EvictionConfig, LocalCache, LocalHandle, PolicyKind, SharedPolicy,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Arc;

#[derive(Subcommand)]
pub enum Commands {
    /// Put employees with random priorities and show who survives
    Demo {
        /// Number of employees to put
        #[arg(long, default_value = "30")]
        entries: u64,

        /// Priorities are drawn from 0..max-priority
        #[arg(long, default_value = "20")]
        max_priority: u32,

        /// Seed for reproducible priorities
        #[arg(long)]
        seed: Option<u64>,

        /// Print a JSON report instead of text
        #[arg(long)]
        json: bool,
    },

    /// Put distinct keys from many threads and check the tracked count
    Stress {
        /// Number of writer threads
        #[arg(long, default_value = "8")]
        threads: usize,

        /// Puts per thread
        #[arg(long, default_value = "1000")]
        entries_per_thread: u64,

        /// Priorities are drawn from 0..max-priority
        #[arg(long, default_value = "100")]
        max_priority: u32,

        /// Seed for reproducible priorities
        #[arg(long)]
        seed: Option<u64>,

        /// Print a JSON report instead of text
        #[arg(long)]
        json: bool,
    },
}

/// Cache of employees keyed by id, driven by the configured policy
pub(crate) fn employee_cache(
    config: &EvictionConfig,
    kind: PolicyKind,
) -> eyre::Result<LocalCache<u64, Employee>> {
    let policy = create_eviction_policy::<LocalHandle<u64, Employee>, _, _>(
        kind,
        config,
        Employee::priority_of,
    )?;
    let policy: SharedPolicy<u64, Employee> = Arc::from(policy);
    Ok(LocalCache::new(policy))
}

pub(crate) fn rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}
