//! The transformation engine layer.
//!
//! `projector` computes intended state, `transaction` guards the
//! mutation window with backups, `verify` closes the loop through the
//! external re-parser, and `transform` sequences them as a phase
//! machine. Collaborators (re-parser, deploy pipeline) enter through
//! the trait seams in `survey` and `pipeline`, so everything here is
//! testable without subprocesses.

pub mod projector;
pub mod transaction;
pub mod transform;
pub mod verify;

pub use projector::{apply, ProjectError};
pub use transaction::{FileTransaction, RollbackOutcome, TransactionError};
pub use transform::{Engine, EngineError, Phase, TransformOutcome};
pub use verify::{first_mismatch, structural_eq, VerifyError};
