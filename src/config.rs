//! Configuration for the harness CLI.
//!
//! Layered loading with the `config` crate: an optional TOML file
//! (`proctor.toml` by default), `PROCTOR_*` environment overrides, then
//! built-in defaults. CLI flags are merged on top by the binary.

use crate::error::HarnessError;
use crate::logging::LoggingConfig;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProctorConfig {
    /// Directory receiving every context's log-file pair.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for ProctorConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            logging: LoggingConfig::default(),
        }
    }
}

/// Loads configuration from file, environment, and defaults.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration. An explicit path must exist; otherwise
    /// `proctor.toml` in the working directory is used when present.
    pub fn load(config_path: Option<&Path>) -> Result<ProctorConfig, HarnessError> {
        let mut builder = Config::builder();

        builder = match config_path {
            Some(path) => builder.add_source(File::from(path.to_path_buf())),
            None => builder.add_source(File::with_name("proctor").required(false)),
        };

        builder = builder.add_source(
            Environment::with_prefix("PROCTOR")
                .prefix_separator("_")
                .separator("__"),
        );

        let config = builder
            .build()
            .map_err(|e| HarnessError::Config(e.to_string()))?;
        config
            .try_deserialize()
            .map_err(|e| HarnessError::Config(e.to_string()))
    }
}
