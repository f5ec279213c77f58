use crate::commands::{demo, stress, Commands};
use evictor_cache::{EvictionConfig, PolicyKind};

impl Commands {
    pub fn execute(self, config: &EvictionConfig, kind: PolicyKind) -> eyre::Result<()> {
        match self {
            Commands::Demo {
                entries,
                max_priority,
                seed,
                json,
            } => demo::execute(config, kind, entries, max_priority, seed, json),
            Commands::Stress {
                threads,
                entries_per_thread,
                max_priority,
                seed,
                json,
            } => stress::execute(
                config,
                kind,
                stress::StressOptions {
                    threads,
                    entries_per_thread,
                    max_priority,
                    seed,
                },
                json,
            ),
        }
    }
}
