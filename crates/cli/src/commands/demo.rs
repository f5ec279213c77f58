//! `evictor demo`: put employees with random priorities into a bounded
//! cache and report which ones survive

use super::{employee_cache, rng};
use crate::employee::Employee;
use evictor_cache::{EvictionConfig, MetricsSnapshot, PolicyKind};
use rand::Rng;
use serde::Serialize;
use tracing::info;

#[derive(Debug, Serialize)]
struct DemoReport {
    max_size: u64,
    inserted: u64,
    /// Survivors, lowest priority first
    employees: Vec<Employee>,
    metrics: MetricsSnapshot,
}

pub fn execute(
    config: &EvictionConfig,
    kind: PolicyKind,
    entries: u64,
    max_priority: u32,
    seed: Option<u64>,
    json: bool,
) -> eyre::Result<()> {
    eyre::ensure!(max_priority > 0, "--max-priority must be greater than zero");

    let cache = employee_cache(config, kind)?;
    let mut rng = rng(seed);

    for id in 0..entries {
        let employee = Employee::new(id, rng.gen_range(0..max_priority));
        info!("Putting: {employee}");
        cache.put(id, employee);
    }

    let mut employees = cache.values();
    employees.sort_by_key(|e| (e.priority, e.id));

    let report = DemoReport {
        max_size: config.max_size,
        inserted: entries,
        employees,
        metrics: cache.policy().snapshot(),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("Employees in cache:");
        for employee in &report.employees {
            println!("{employee}");
        }
        println!(
            "{} of {} kept, {} evicted",
            report.employees.len(),
            report.inserted,
            report.metrics.evictions
        );
    }

    Ok(())
}
