//! Display implementations for evictor errors

use super::types::{EvictorError, RecoveryHint};
use std::fmt;

impl fmt::Display for EvictorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io {
                path,
                operation,
                source,
                ..
            } => write!(
                f,
                "I/O error during {} on '{}': {}",
                operation,
                path.display(),
                source
            ),
            Self::Serialization {
                key,
                operation,
                source,
                ..
            } => write!(f, "Failed to {operation:?} '{key}': {source}"),
            Self::Configuration { message, .. } => {
                write!(f, "Configuration error: {message}")
            }
        }
    }
}

impl std::error::Error for EvictorError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Serialization { source, .. } => Some(source.as_ref()),
            Self::Configuration { .. } => None,
        }
    }
}

impl fmt::Display for RecoveryHint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CheckPermissions { path } => {
                write!(f, "check permissions on '{}'", path.display())
            }
            Self::UseDefault { value } => write!(f, "use the default value '{value}'"),
            Self::Manual { instructions } => write!(f, "{instructions}"),
        }
    }
}
