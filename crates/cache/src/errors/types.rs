//! Core error types

use std::path::PathBuf;

/// Result type for evictor operations
pub type Result<T> = std::result::Result<T, EvictorError>;

pub use EvictorError as Error;

#[derive(Debug)]
pub enum EvictorError {
    /// I/O errors while reading configuration
    Io {
        path: PathBuf,
        operation: &'static str,
        source: std::io::Error,
        recovery_hint: RecoveryHint,
    },

    /// Configuration could not be decoded
    Serialization {
        key: String,
        operation: SerializationOp,
        source: Box<dyn std::error::Error + Send + Sync>,
        recovery_hint: RecoveryHint,
    },

    /// Invalid or missing configuration
    Configuration {
        message: String,
        recovery_hint: RecoveryHint,
    },
}

/// Recovery hints for error handling
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecoveryHint {
    /// Check file permissions
    CheckPermissions { path: PathBuf },

    /// Use a default value
    UseDefault { value: String },

    /// No automated recovery possible
    Manual { instructions: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SerializationOp {
    Decode,
}
