//! pipeline
//!
//! Abstraction over the build/deploy step that runs after a commit.
//!
//! # Design
//!
//! The engine invokes the deployer fire-and-forget: a deploy failure is
//! logged and reported, but it never reopens or affects the already
//! committed transaction. The deployer keeps its own append-only,
//! length-capped ledger of attempts keyed by version ([`ledger`]), which
//! is queried for the last success during pipeline-level rollback. That
//! ledger is entirely the pipeline's concern; the engine never reads it.

pub mod ledger;
pub mod mock;
pub mod process;

pub use ledger::{DeployLedger, DeployRecord, DeployStatus, LedgerError};
pub use mock::MockDeployer;
pub use process::ProcessDeployer;

use thiserror::Error;

/// Errors from the deploy collaborator.
#[derive(Debug, Clone, Error)]
pub enum DeployError {
    /// The deploy process could not be started or exited nonzero.
    #[error("deploy process failed: {0}")]
    Process(String),

    /// The deployment ledger could not be updated.
    #[error("deployment ledger error: {0}")]
    Ledger(String),
}

/// The deploy collaborator.
pub trait Deployer {
    /// Run the build/deploy step once, recording the attempt.
    fn deploy(&self) -> Result<DeployRecord, DeployError>;
}
