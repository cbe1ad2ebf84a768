//! survey::process
//!
//! Process-backed surveyor: runs the configured parser command with the
//! file path appended and reads a snapshot from its stdout.
//!
//! The call blocks with no timeout imposed here; callers that need one
//! must wrap the invocation.

use std::path::Path;
use std::process::Command;

use serde_json::Value;

use super::{SurveyError, Surveyor};
use crate::core::project::ProjectDocument;
use crate::core::tree::Node;

/// Surveyor that shells out to an external parser.
#[derive(Debug, Clone)]
pub struct ProcessSurveyor {
    command: Vec<String>,
}

impl ProcessSurveyor {
    /// Create a surveyor for the given command line.
    pub fn new(command: Vec<String>) -> Self {
        Self { command }
    }
}

impl Surveyor for ProcessSurveyor {
    fn survey(&self, file: &Path) -> Result<Node, SurveyError> {
        let (program, args) = self
            .command
            .split_first()
            .ok_or_else(|| SurveyError::Process("empty surveyor command".to_string()))?;

        let output = Command::new(program)
            .args(args)
            .arg(file)
            .output()
            .map_err(|e| SurveyError::Process(format!("failed to spawn {}: {}", program, e)))?;

        if !output.status.success() {
            return Err(SurveyError::Process(format!(
                "{} exited with {}: {}",
                program,
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        parse_snapshot(&output.stdout)
    }
}

/// Parse surveyor stdout into a snapshot node.
///
/// Accepts either a bare node or a full snapshot document (in which case
/// the tree is taken), since parsers in the wild emit both shapes.
fn parse_snapshot(stdout: &[u8]) -> Result<Node, SurveyError> {
    let value: Value = serde_json::from_slice(stdout)
        .map_err(|e| SurveyError::MalformedOutput(e.to_string()))?;

    if value.get("tree").is_some() {
        return ProjectDocument::from_value(value)
            .map(|document| document.tree)
            .map_err(|e| SurveyError::MalformedOutput(e.to_string()));
    }

    serde_json::from_value(value).map_err(|e| SurveyError::MalformedOutput(e.to_string()))
}
