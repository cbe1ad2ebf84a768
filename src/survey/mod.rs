//! survey
//!
//! Abstraction over the external source-to-tree parser.
//!
//! # Design
//!
//! The parser is a collaborator, not part of the core: the engine only
//! needs a function from a file path to a fresh structural snapshot of
//! that file. The trait seam keeps the core testable against canned
//! snapshots, independent of how parsing is actually performed.
//!
//! # Contract
//!
//! `survey` must be deterministic and non-mutating: the same file content
//! yields the same snapshot, and the file is never changed. Round-trip
//! verification is meaningless without this.

pub mod mock;
pub mod process;

pub use mock::MockSurveyor;
pub use process::ProcessSurveyor;

use std::path::Path;

use thiserror::Error;

use crate::core::tree::Node;

/// Errors from the re-parse collaborator.
#[derive(Debug, Clone, Error)]
pub enum SurveyError {
    /// The parser process could not be started or exited nonzero.
    #[error("surveyor process failed: {0}")]
    Process(String),

    /// The parser produced output that is not a snapshot.
    #[error("surveyor produced malformed output: {0}")]
    MalformedOutput(String),
}

/// The re-parse collaborator.
pub trait Surveyor {
    /// Produce a fresh structural snapshot of one source file.
    fn survey(&self, file: &Path) -> Result<Node, SurveyError>;
}
