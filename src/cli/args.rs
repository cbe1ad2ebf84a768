//! cli::args
//!
//! Command-line argument definitions using clap derive.
//!
//! # Global Flags
//!
//! These flags are available on all commands:
//! - `--help` / `-h`: Show help
//! - `--version`: Show version
//! - `--cwd <path>`: Run as if in that directory
//! - `--config <path>`: Explicit config file
//! - `--debug`: Enable debug logging
//! - `--quiet` / `-q`: Minimal output
//! - `--json`: Machine-readable output

use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub use clap_complete::Shell;

use crate::ui::log::Verbosity;

/// Graftwork - path-addressed, transactional edits to component trees
#[derive(Parser, Debug)]
#[command(name = "graft")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Run as if graft was started in this directory
    #[arg(long, global = true)]
    pub cwd: Option<PathBuf>,

    /// Use this config file instead of the lookup chain
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// Minimal output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Machine-readable JSON output
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Parser::parse()
    }

    /// Log verbosity implied by the global flags.
    pub fn verbosity(&self) -> Verbosity {
        Verbosity::from_flags(self.quiet, self.debug)
    }
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Apply a transformation command to the project
    #[command(
        name = "apply",
        long_about = "Apply a transformation command to the project.\n\n\
            The command names a location in the component tree by its computed \
            path, a property, and a new value. The engine projects the intended \
            state, rewrites the owning component's source file inside a \
            backup-guarded transaction, re-parses the committed file to verify \
            it, and then triggers the deploy pipeline.\n\n\
            Any failure before commit restores the original file bytes.",
        after_help = "\
EXAMPLES:
    # Set a prop on a component's root element
    graft apply '/Program/FunctionDeclaration[name=Header].props.className=\"header-dark\"'

    # Values are JSON literals; bare words fall back to strings
    graft apply '/Program/FunctionDeclaration[name=Card].props.elevated=true'"
    )]
    Apply {
        /// The transformation command, path.property=value
        command: String,
    },

    /// List every addressable path in the project
    #[command(
        name = "paths",
        long_about = "List every computed address in the component tree, one per \
            line. Useful when authoring apply commands."
    )]
    Paths {
        /// Only list addresses owned by this component
        #[arg(long, value_name = "NAME")]
        component: Option<String>,
    },

    /// Validate the project data document against the schema
    #[command(name = "validate")]
    Validate,

    /// Roll the deployment back to the last successful version
    #[command(
        name = "rollback",
        long_about = "Inspect the deployment ledger and report the last \
            successful version as the rollback target. Exits non-zero when no \
            successful deployment exists."
    )]
    Rollback,

    /// Show the deployment ledger
    #[command(name = "history")]
    History {
        /// Show at most this many records, newest last
        #[arg(short = 'n', long, value_name = "COUNT")]
        limit: Option<usize>,
    },

    /// Generate shell completion scripts
    #[command(name = "completion")]
    Completion {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}
