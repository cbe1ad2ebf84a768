//! cli::commands
//!
//! Command dispatch and handlers.
//!
//! Each handler wires collaborators from config, calls into the engine
//! or core, and formats output. Handlers never mutate files directly;
//! every file mutation flows through the engine's transaction.

mod apply;
mod completion;
mod ledger_cmd;
mod paths;
mod validate;

use crate::cli::args::Command;
use crate::cli::Context;
use anyhow::Result;

/// Dispatch a command to its handler.
pub fn dispatch(command: Command, ctx: &Context) -> Result<()> {
    match command {
        Command::Apply { command } => apply::apply(ctx, &command),
        Command::Paths { component } => paths::paths(ctx, component.as_deref()),
        Command::Validate => validate::validate(ctx),
        Command::Rollback => ledger_cmd::rollback(ctx),
        Command::History { limit } => ledger_cmd::history(ctx, limit),
        Command::Completion { shell } => completion::completion(shell),
    }
}
