//! cli
//!
//! Command-line interface layer for Graftwork.
//!
//! # Responsibilities
//!
//! - Parse command-line arguments and global flags
//! - Construct the logger and collaborators from config
//! - Delegate to command handlers
//!
//! The CLI layer is thin. It parses arguments via clap and dispatches to
//! the [`crate::engine`] for execution. All file mutations flow through
//! the engine's transactional path.

pub mod args;
pub mod commands;

pub use args::{Cli, Shell};

use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};

use crate::core::Config;
use crate::ui::log::Logger;

/// Per-invocation context shared by all command handlers.
pub struct Context {
    /// Directory to resolve relative paths against; None means the
    /// process working directory.
    pub cwd: Option<PathBuf>,
    /// Explicit config file, bypassing the lookup chain.
    pub config_path: Option<PathBuf>,
    /// Machine-readable output requested.
    pub json: bool,
    /// The run's logging capability.
    pub log: Logger,
}

impl Context {
    /// Load configuration, honoring `--config` over the lookup chain.
    pub fn config(&self) -> Result<Config> {
        match &self.config_path {
            Some(path) => Config::from_path(path).context("failed to load config"),
            None => Config::load(self.cwd.as_deref()).context("failed to load config"),
        }
    }

    /// Resolve a possibly-relative path against `--cwd`.
    pub fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            return path.to_path_buf();
        }
        match &self.cwd {
            Some(cwd) => cwd.join(path),
            None => path.to_path_buf(),
        }
    }
}

/// Run the CLI application.
///
/// This is the main entry point called from `main.rs`.
pub fn run() -> Result<()> {
    let cli = Cli::parse_args();
    let log = Logger::new(cli.verbosity());

    let ctx = Context {
        cwd: cli.cwd.clone(),
        config_path: cli.config.clone(),
        json: cli.json,
        log,
    };

    commands::dispatch(cli.command, &ctx)
}
