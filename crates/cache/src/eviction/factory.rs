//! Factory for creating eviction policies

use crate::config::EvictionConfig;
use crate::errors::{Error, RecoveryHint, Result};
use std::fmt::Debug;
use std::str::FromStr;

use super::policies::{FifoEvictionPolicy, PriorityEvictionPolicy};
use super::traits::{EvictableEntry, EvictionPolicy};

/// Available policy flavours
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PolicyKind {
    /// Order by the extracted priority, then by tracking order
    #[default]
    Priority,
    /// Order by tracking order only
    Fifo,
}

impl FromStr for PolicyKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "priority" => Ok(Self::Priority),
            "fifo" => Ok(Self::Fifo),
            _ => Err(Error::Configuration {
                message: format!("Unknown eviction policy: {s}"),
                recovery_hint: RecoveryHint::UseDefault {
                    value: "priority".to_string(),
                },
            }),
        }
    }
}

/// Eviction policy factory
pub fn create_eviction_policy<E, P, F>(
    kind: PolicyKind,
    config: &EvictionConfig,
    priority_of: F,
) -> Result<Box<dyn EvictionPolicy<E>>>
where
    E: EvictableEntry,
    P: Ord + Clone + Debug + Send + Sync + 'static,
    F: Fn(&E::Value) -> P + Send + Sync + 'static,
{
    config.validate()?;

    let policy: Box<dyn EvictionPolicy<E>> = match kind {
        PolicyKind::Priority => Box::new(PriorityEvictionPolicy::new(config, priority_of)),
        PolicyKind::Fifo => Box::new(FifoEvictionPolicy::<E>::fifo(config)),
    };
    Ok(policy)
}
