use clap::Parser;
use evictor_cache::{EvictionConfig, EvictionConfigLoader, PolicyKind};
use tracing::Level;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod employee;
mod execute;

use commands::Commands;

#[derive(Parser)]
#[command(name = "evictor")]
#[command(about = "Drive the priority eviction policy against an in-memory cache", long_about = None)]
#[command(version)]
struct Cli {
    /// Maximum number of tracked entries (overrides config file and environment)
    #[arg(long, global = true)]
    max_size: Option<u64>,

    /// Eviction policy (priority, fifo)
    #[arg(long, global = true, default_value = "priority")]
    policy: PolicyKind,

    /// Log level
    #[arg(long, global = true, default_value = "info")]
    log_level: Level,

    #[command(subcommand)]
    command: Commands,
}

fn main() -> eyre::Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();

    // Logs go to stderr so reports on stdout stay machine readable
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_level(true)
                .with_target(true)
                .with_thread_ids(true),
        )
        .with(tracing_subscriber::filter::LevelFilter::from_level(
            cli.log_level,
        ))
        .init();

    let config = load_config(cli.max_size)?;

    cli.command.execute(&config, cli.policy)
}

/// Load the effective config, surfacing the recovery hint of a failure
fn load_config(max_size: Option<u64>) -> eyre::Result<EvictionConfig> {
    EvictionConfigLoader::load()
        .and_then(|config| EvictionConfigLoader::apply_cli_args(config, max_size))
        .map_err(|e| {
            let hint = e.recovery_hint().to_string();
            eyre::Report::new(e).wrap_err(format!("Failed to load configuration ({hint})"))
        })
}
