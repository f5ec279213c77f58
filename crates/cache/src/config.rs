//! Eviction configuration with precedence and validation
use crate::errors::{Error, RecoveryHint, Result, SerializationOp};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Default bound on tracked entries
pub const DEFAULT_MAX_SIZE: u64 = 10;

/// Environment variable overriding `max_size`
pub const MAX_SIZE_ENV: &str = "EVICTOR_MAX_SIZE";

/// Configuration of one eviction policy instance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvictionConfig {
    /// Number of tracked entries above which a sweep evicts
    pub max_size: u64,
    /// Where the effective configuration came from
    #[serde(skip)]
    pub source: ConfigSource,
}

impl EvictionConfig {
    /// Create a validated configuration
    pub fn new(max_size: u64) -> Result<Self> {
        let config = Self {
            max_size,
            source: ConfigSource::Default,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_size == 0 {
            return Err(Error::Configuration {
                message: "max_size must be greater than zero".to_string(),
                recovery_hint: RecoveryHint::UseDefault {
                    value: DEFAULT_MAX_SIZE.to_string(),
                },
            });
        }
        Ok(())
    }
}

impl Default for EvictionConfig {
    fn default() -> Self {
        Self {
            max_size: DEFAULT_MAX_SIZE,
            source: ConfigSource::Default,
        }
    }
}

/// Source of configuration for debugging and precedence tracking
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfigSource {
    /// Default configuration
    #[default]
    Default,
    /// Configuration file
    ConfigFile(PathBuf),
    /// Environment variable
    EnvironmentVariable(String),
    /// Command line argument
    CommandLine,
}

/// Builder for creating eviction configurations
#[derive(Debug, Default)]
pub struct EvictionConfigBuilder {
    config: EvictionConfig,
}

impl EvictionConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_size(mut self, max_size: u64) -> Self {
        self.config.max_size = max_size;
        self
    }

    pub fn with_source(mut self, source: ConfigSource) -> Self {
        self.config.source = source;
        self
    }

    /// Build and validate the configuration
    pub fn build(self) -> Result<EvictionConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}

/// On-disk layout: `{ "eviction": { "max_size": 10 } }`
#[derive(Debug, Default, Deserialize)]
struct FileConfig {
    #[serde(default)]
    eviction: Option<FileEvictionConfig>,
}

#[derive(Debug, Default, Deserialize)]
struct FileEvictionConfig {
    max_size: Option<u64>,
}

/// Configuration loader that handles precedence
pub struct EvictionConfigLoader;

impl EvictionConfigLoader {
    /// Load configuration: defaults, then config file, then environment
    pub fn load() -> Result<EvictionConfig> {
        let path = Self::get_config_file_path()?;
        Self::load_with_file(&path)
    }

    /// Same as [`load`](Self::load) with an explicit config file path
    pub fn load_with_file(path: &Path) -> Result<EvictionConfig> {
        let mut config = EvictionConfig::default();

        if let Some(max_size) = Self::load_from_config_file(path)? {
            config.max_size = max_size;
            config.source = ConfigSource::ConfigFile(path.to_path_buf());
        }

        if let Some(max_size) = Self::load_from_env() {
            config.max_size = max_size;
            config.source = ConfigSource::EnvironmentVariable(MAX_SIZE_ENV.to_string());
        }

        config.validate()?;
        debug!(max_size = config.max_size, source = ?config.source, "Loaded eviction config");
        Ok(config)
    }

    /// Read `max_size` from a JSON config file, `None` if the file or the
    /// setting is missing
    fn load_from_config_file(path: &Path) -> Result<Option<u64>> {
        if !path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(path).map_err(|e| Error::Io {
            path: path.to_path_buf(),
            operation: "read config file",
            source: e,
            recovery_hint: RecoveryHint::CheckPermissions {
                path: path.to_path_buf(),
            },
        })?;

        let file_config: FileConfig =
            serde_json::from_str(&content).map_err(|e| Error::Serialization {
                key: path.display().to_string(),
                operation: SerializationOp::Decode,
                source: Box::new(e),
                recovery_hint: RecoveryHint::Manual {
                    instructions: "Check config file syntax".to_string(),
                },
            })?;

        Ok(file_config.eviction.and_then(|e| e.max_size))
    }

    fn load_from_env() -> Option<u64> {
        let raw = std::env::var(MAX_SIZE_ENV).ok()?;
        match raw.trim().parse::<u64>() {
            Ok(max_size) => Some(max_size),
            Err(e) => {
                warn!("Ignoring {MAX_SIZE_ENV}={raw:?}: {e}");
                None
            }
        }
    }

    /// Get the configuration file path
    pub fn get_config_file_path() -> Result<PathBuf> {
        let config_dir = if let Ok(xdg_config_home) = std::env::var("XDG_CONFIG_HOME") {
            PathBuf::from(xdg_config_home)
        } else {
            dirs::config_dir().ok_or_else(|| Error::Configuration {
                message: "Could not determine config directory".to_string(),
                recovery_hint: RecoveryHint::Manual {
                    instructions: "Set XDG_CONFIG_HOME or HOME environment variable".to_string(),
                },
            })?
        };

        Ok(config_dir.join("evictor").join("config.json"))
    }

    /// Apply command line arguments (highest precedence)
    pub fn apply_cli_args(
        mut config: EvictionConfig,
        max_size: Option<u64>,
    ) -> Result<EvictionConfig> {
        if let Some(max_size) = max_size {
            config.max_size = max_size;
            config.source = ConfigSource::CommandLine;
        }

        config.validate()?;
        Ok(config)
    }
}
