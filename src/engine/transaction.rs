//! engine::transaction
//!
//! Backup-and-restore file transaction around the mutation window.
//!
//! A [`FileTransaction`] owns a temporary staging directory. Every file
//! backed up through it gets a private copy there. On [`commit`] the
//! backups are discarded; on [`roll_back`] (or on drop while still
//! armed) each backed-up file is restored from its copy. Restore keeps
//! going past individual failures so one bad file never strands the
//! rest, and any failure is surfaced loudly rather than swallowed.
//!
//! [`commit`]: FileTransaction::commit
//! [`roll_back`]: FileTransaction::roll_back

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde_json::json;
use tempfile::TempDir;
use thiserror::Error;

use crate::ui::log::Logger;

/// Errors while establishing backups.
#[derive(Debug, Error)]
pub enum TransactionError {
    /// The file to back up does not exist.
    #[error("cannot back up '{path}': file not found", path = .path.display())]
    FileNotFound { path: PathBuf },

    /// Copying the file into the staging directory failed.
    #[error("backup of '{path}' failed: {source}", path = .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The staging directory itself could not be created.
    #[error("failed to allocate backup staging directory: {0}")]
    Staging(#[source] std::io::Error),
}

/// Result of a rollback attempt. Restore is attempted for every backup
/// even when earlier ones fail.
#[derive(Debug)]
pub struct RollbackOutcome {
    /// Files restored to their backed-up contents.
    pub restored: Vec<PathBuf>,
    /// Files whose restore failed, with the failure text.
    pub failed: Vec<(PathBuf, String)>,
}

impl RollbackOutcome {
    /// True when every backed-up file was restored.
    pub fn complete(&self) -> bool {
        self.failed.is_empty()
    }

    /// Paths that could not be restored.
    pub fn failed_paths(&self) -> Vec<PathBuf> {
        self.failed.iter().map(|(p, _)| p.clone()).collect()
    }
}

/// A file transaction backed by a temporary staging directory.
pub struct FileTransaction {
    staging: TempDir,
    backups: BTreeMap<PathBuf, PathBuf>,
    armed: bool,
    log: Logger,
}

impl FileTransaction {
    /// Open a transaction with a fresh staging directory. The
    /// transaction starts armed: dropping it before [`commit`] rolls
    /// back every backup.
    ///
    /// [`commit`]: FileTransaction::commit
    pub fn open(log: &Logger) -> Result<Self, TransactionError> {
        let staging = tempfile::tempdir().map_err(TransactionError::Staging)?;
        log.debug(
            "transaction opened",
            &[("staging", json!(staging.path().display().to_string()))],
        );
        Ok(Self {
            staging,
            backups: BTreeMap::new(),
            armed: true,
            log: log.clone(),
        })
    }

    /// Back up a file into the staging directory. Backing up the same
    /// path twice is a no-op returning the original backup, so the
    /// pre-mutation contents are never overwritten by a later snapshot.
    pub fn backup(&mut self, path: &Path) -> Result<PathBuf, TransactionError> {
        if let Some(existing) = self.backups.get(path) {
            return Ok(existing.clone());
        }
        if !path.exists() {
            return Err(TransactionError::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "file".to_string());
        // Index prefix keeps same-named files from distinct directories apart.
        let dest = self
            .staging
            .path()
            .join(format!("{}-{}", self.backups.len(), file_name));
        fs::copy(path, &dest).map_err(|source| TransactionError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        self.log.debug(
            "file backed up",
            &[("path", json!(path.display().to_string()))],
        );
        self.backups.insert(path.to_path_buf(), dest.clone());
        Ok(dest)
    }

    /// Restore a single file from its backup. Returns false when the
    /// path was never backed up or the copy back failed.
    pub fn restore(&self, path: &Path) -> bool {
        match self.backups.get(path) {
            Some(backup) => fs::copy(backup, path).is_ok(),
            None => false,
        }
    }

    /// Restore every backed-up file, continuing past failures. Disarms
    /// the transaction.
    pub fn roll_back(&mut self) -> RollbackOutcome {
        self.armed = false;
        let mut outcome = RollbackOutcome {
            restored: Vec::new(),
            failed: Vec::new(),
        };
        for (path, backup) in &self.backups {
            match fs::copy(backup, path) {
                Ok(_) => outcome.restored.push(path.clone()),
                Err(err) => {
                    self.log.error(
                        "restore failed",
                        &[
                            ("path", json!(path.display().to_string())),
                            ("error", json!(err.to_string())),
                        ],
                    );
                    outcome.failed.push((path.clone(), err.to_string()));
                }
            }
        }
        if outcome.complete() {
            self.log.info(
                "rollback complete",
                &[("restored", json!(outcome.restored.len()))],
            );
        } else {
            self.log.error(
                "rollback incomplete",
                &[
                    ("restored", json!(outcome.restored.len())),
                    ("failed", json!(outcome.failed.len())),
                ],
            );
        }
        outcome
    }

    /// Commit: keep the mutated files and discard the backups.
    pub fn commit(mut self) {
        self.armed = false;
        self.log
            .debug("transaction committed", &[("backups", json!(self.backups.len()))]);
    }

    /// Staging directory location, for inspection.
    pub fn staging_path(&self) -> &Path {
        self.staging.path()
    }
}

impl Drop for FileTransaction {
    fn drop(&mut self) {
        if self.armed {
            // Unwound without an explicit commit or rollback; restore
            // everything. Failures were already logged loudly.
            let _ = self.roll_back();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::log::{Logger, Verbosity};

    fn quiet() -> Logger {
        Logger::new(Verbosity::Quiet)
    }

    mod backup {
        use super::*;

        #[test]
        fn copies_the_file_into_staging() {
            let dir = tempfile::tempdir().unwrap();
            let target = dir.path().join("Header.tsx");
            fs::write(&target, "original").unwrap();

            let log = quiet();
            let mut tx = FileTransaction::open(&log).unwrap();
            let copy = tx.backup(&target).unwrap();

            assert!(copy.starts_with(tx.staging_path()));
            assert_eq!(fs::read_to_string(&copy).unwrap(), "original");
        }

        #[test]
        fn is_idempotent_per_path() {
            let dir = tempfile::tempdir().unwrap();
            let target = dir.path().join("Header.tsx");
            fs::write(&target, "original").unwrap();

            let log = quiet();
            let mut tx = FileTransaction::open(&log).unwrap();
            let first = tx.backup(&target).unwrap();

            // Mutate, then back up again: the first snapshot must survive.
            fs::write(&target, "mutated").unwrap();
            let second = tx.backup(&target).unwrap();

            assert_eq!(first, second);
            assert_eq!(fs::read_to_string(&first).unwrap(), "original");
        }

        #[test]
        fn missing_file_is_file_not_found() {
            let dir = tempfile::tempdir().unwrap();
            let log = quiet();
            let mut tx = FileTransaction::open(&log).unwrap();
            let err = tx.backup(&dir.path().join("ghost.tsx")).unwrap_err();
            assert!(matches!(err, TransactionError::FileNotFound { .. }));
        }
    }

    mod rollback {
        use super::*;

        #[test]
        fn restores_pre_mutation_bytes() {
            let dir = tempfile::tempdir().unwrap();
            let target = dir.path().join("Header.tsx");
            fs::write(&target, "original").unwrap();

            let log = quiet();
            let mut tx = FileTransaction::open(&log).unwrap();
            tx.backup(&target).unwrap();
            fs::write(&target, "mutated").unwrap();

            let outcome = tx.roll_back();
            assert!(outcome.complete());
            assert_eq!(outcome.restored, vec![target.clone()]);
            assert_eq!(fs::read_to_string(&target).unwrap(), "original");
        }

        #[test]
        fn continues_past_individual_failures() {
            let dir = tempfile::tempdir().unwrap();
            let doomed_dir = tempfile::tempdir().unwrap();
            let healthy = dir.path().join("a.tsx");
            let doomed = doomed_dir.path().join("b.tsx");
            fs::write(&healthy, "a-original").unwrap();
            fs::write(&doomed, "b-original").unwrap();

            let log = quiet();
            let mut tx = FileTransaction::open(&log).unwrap();
            tx.backup(&healthy).unwrap();
            tx.backup(&doomed).unwrap();
            fs::write(&healthy, "a-mutated").unwrap();

            // Removing the parent directory makes the second restore fail.
            drop(doomed_dir);

            let outcome = tx.roll_back();
            assert!(!outcome.complete());
            assert_eq!(outcome.restored, vec![healthy.clone()]);
            assert_eq!(outcome.failed_paths(), vec![doomed]);
            assert_eq!(fs::read_to_string(&healthy).unwrap(), "a-original");
        }

        #[test]
        fn restore_of_unknown_path_is_false() {
            let log = quiet();
            let tx = FileTransaction::open(&log).unwrap();
            assert!(!tx.restore(Path::new("/nowhere/at/all.tsx")));
        }
    }

    mod lifecycle {
        use super::*;

        #[test]
        fn drop_while_armed_rolls_back() {
            let dir = tempfile::tempdir().unwrap();
            let target = dir.path().join("Header.tsx");
            fs::write(&target, "original").unwrap();

            let log = quiet();
            {
                let mut tx = FileTransaction::open(&log).unwrap();
                tx.backup(&target).unwrap();
                fs::write(&target, "mutated").unwrap();
            }
            assert_eq!(fs::read_to_string(&target).unwrap(), "original");
        }

        #[test]
        fn commit_keeps_mutations_and_removes_staging() {
            let dir = tempfile::tempdir().unwrap();
            let target = dir.path().join("Header.tsx");
            fs::write(&target, "original").unwrap();

            let log = quiet();
            let mut tx = FileTransaction::open(&log).unwrap();
            tx.backup(&target).unwrap();
            fs::write(&target, "mutated").unwrap();

            let staging = tx.staging_path().to_path_buf();
            tx.commit();

            assert_eq!(fs::read_to_string(&target).unwrap(), "mutated");
            assert!(!staging.exists());
        }
    }
}
