//! pipeline::ledger
//!
//! The deployment ledger: an append-only, length-capped record of deploy
//! attempts keyed by version.
//!
//! # Design
//!
//! The ledger is evidence, not authority: it records what the pipeline
//! attempted and observed. Records are appended in order; once the cap
//! is exceeded the oldest records are dropped. The only queries are the
//! full history and the most recent success, which pipeline-level
//! rollback targets.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::json;
use thiserror::Error;

use crate::ui::Logger;

/// Errors from ledger operations.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// Reading or writing the ledger file failed.
    #[error("ledger io error at '{path}': {source}", path = .path.display())]
    Io {
        /// Ledger file path.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },

    /// The ledger file exists but does not parse.
    #[error("ledger corrupted at '{path}': {message}", path = .path.display())]
    Corrupted {
        /// Ledger file path.
        path: PathBuf,
        /// Parser message.
        message: String,
    },
}

/// Outcome of one deploy attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeployStatus {
    /// The attempt succeeded.
    Success,
    /// The attempt failed.
    Failed,
}

/// One deploy attempt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeployRecord {
    /// Version string for the attempt.
    pub version: String,
    /// When the attempt was recorded (UTC, RFC 3339).
    pub timestamp: String,
    /// Outcome.
    pub status: DeployStatus,
    /// Free-form detail (command output summary, error text).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

/// The append-only, length-capped ledger.
#[derive(Debug, Clone)]
pub struct DeployLedger {
    path: PathBuf,
    cap: usize,
}

impl DeployLedger {
    /// Open a ledger at `path`, retaining at most `cap` records.
    pub fn new(path: impl Into<PathBuf>, cap: usize) -> Self {
        Self {
            path: path.into(),
            cap: cap.max(1),
        }
    }

    /// Generate a timestamp-derived version string.
    pub fn next_version() -> String {
        format!("v{}", Utc::now().format("%Y%m%d_%H%M%S"))
    }

    /// All retained records, oldest first. A missing file is an empty
    /// ledger.
    pub fn history(&self) -> Result<Vec<DeployRecord>, LedgerError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let text = fs::read_to_string(&self.path).map_err(|source| LedgerError::Io {
            path: self.path.clone(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|e| LedgerError::Corrupted {
            path: self.path.clone(),
            message: e.to_string(),
        })
    }

    /// Append one record, enforcing the cap, and persist.
    pub fn record(
        &self,
        version: impl Into<String>,
        status: DeployStatus,
        detail: Option<String>,
    ) -> Result<DeployRecord, LedgerError> {
        let record = DeployRecord {
            version: version.into(),
            timestamp: Utc::now().to_rfc3339(),
            status,
            detail,
        };

        let mut history = self.history()?;
        history.push(record.clone());
        if history.len() > self.cap {
            let excess = history.len() - self.cap;
            history.drain(..excess);
        }

        let text = serde_json::to_string_pretty(&history).map_err(|e| LedgerError::Corrupted {
            path: self.path.clone(),
            message: e.to_string(),
        })?;
        fs::write(&self.path, text).map_err(|source| LedgerError::Io {
            path: self.path.clone(),
            source,
        })?;

        Ok(record)
    }

    /// The most recent successful record, if any.
    pub fn last_successful(&self) -> Result<Option<DeployRecord>, LedgerError> {
        Ok(self
            .history()?
            .into_iter()
            .rev()
            .find(|record| record.status == DeployStatus::Success))
    }

    /// Best-effort rollback to the last successful deployment.
    ///
    /// Returns the record rolled back to, or `None` when no success
    /// exists to target. The actual restore is the deployment target's
    /// concern; this logs and reports the decision.
    pub fn rollback_to_previous(&self, log: &Logger) -> Result<Option<DeployRecord>, LedgerError> {
        match self.last_successful()? {
            Some(record) => {
                log.info(
                    "rolling back to previous successful deployment",
                    &[
                        ("target_version", json!(record.version)),
                        ("target_timestamp", json!(record.timestamp)),
                    ],
                );
                Ok(Some(record))
            }
            None => {
                log.error("no successful deployment found for rollback", &[]);
                Ok(None)
            }
        }
    }

    /// Path of the ledger file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}
