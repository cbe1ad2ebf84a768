//! core::config
//!
//! Configuration schema and loading.
//!
//! # Locations
//!
//! Searched in order; the first file found wins:
//!
//! 1. `$GRAFT_CONFIG` if set
//! 2. `./graft.toml` (relative to the working directory)
//! 3. `<user config dir>/graft/config.toml`
//!
//! Every key is optional; accessors apply defaults, so a missing config
//! file is equivalent to an empty one.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Reading the config file failed.
    #[error("failed to read config file '{path}': {source}", path = .path.display())]
    Read {
        /// Config file path.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },

    /// The config file is not valid TOML.
    #[error("failed to parse config file '{path}': {message}", path = .path.display())]
    Parse {
        /// Config file path.
        path: PathBuf,
        /// Parser message.
        message: String,
    },
}

/// Crate configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Path of the persisted snapshot document.
    pub project_data: Option<PathBuf>,
    /// Command invoked to re-parse a source file (file path appended).
    pub surveyor_command: Option<Vec<String>>,
    /// Command invoked to build/deploy after a commit.
    pub deploy_command: Option<Vec<String>>,
    /// Path of the deployment ledger file.
    pub ledger_path: Option<PathBuf>,
    /// Maximum number of ledger records retained.
    pub ledger_cap: Option<usize>,
}

impl Config {
    /// Load configuration with standard precedence.
    pub fn load(cwd: Option<&Path>) -> Result<Self, ConfigError> {
        let mut candidates: Vec<PathBuf> = Vec::new();

        if let Ok(explicit) = std::env::var("GRAFT_CONFIG") {
            candidates.push(PathBuf::from(explicit));
        }
        let base = cwd.map(Path::to_path_buf).unwrap_or_else(|| PathBuf::from("."));
        candidates.push(base.join("graft.toml"));
        if let Some(config_dir) = dirs::config_dir() {
            candidates.push(config_dir.join("graft").join("config.toml"));
        }

        for candidate in candidates {
            if candidate.is_file() {
                return Self::from_path(&candidate);
            }
        }
        Ok(Self::default())
    }

    /// Load configuration from an explicit file.
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&text).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Snapshot document path, defaulting to `project_data.json`.
    pub fn project_data(&self) -> PathBuf {
        self.project_data
            .clone()
            .unwrap_or_else(|| PathBuf::from("project_data.json"))
    }

    /// Surveyor command line.
    pub fn surveyor_command(&self) -> Vec<String> {
        self.surveyor_command.clone().unwrap_or_else(|| {
            vec!["node".to_string(), "scripts/surveyor.js".to_string()]
        })
    }

    /// Deploy command line.
    pub fn deploy_command(&self) -> Vec<String> {
        self.deploy_command
            .clone()
            .unwrap_or_else(|| vec!["npm".to_string(), "run".to_string(), "build".to_string()])
    }

    /// Ledger file path, defaulting to `deployment_history.json`.
    pub fn ledger_path(&self) -> PathBuf {
        self.ledger_path
            .clone()
            .unwrap_or_else(|| PathBuf::from("deployment_history.json"))
    }

    /// Ledger retention cap.
    pub fn ledger_cap(&self) -> usize {
        self.ledger_cap.unwrap_or(50)
    }
}
