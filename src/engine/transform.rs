//! engine::transform
//!
//! The transformation engine. One [`Engine::run`] call drives a single
//! command through the full lifecycle:
//!
//! ```text
//! Idle -> Parsed -> Projected -> Located -> Transacting -> Verified -> Committed
//!                                    \-> (any failure) -> RolledBack
//! ```
//!
//! Every run gets an operation id that appears on every log line, and
//! every failure inside the mutation window triggers a rollback from
//! the transaction's backups. Restore failures during that rollback are
//! never swallowed: they wrap the original failure and take over the
//! reported error.

use std::fs;
use std::path::PathBuf;

use serde_json::json;
use thiserror::Error;

use crate::core::command::{parse, ParseError};
use crate::core::path::find_owning_component;
use crate::core::project::ProjectDocument;
use crate::core::synth::render_component;
use crate::core::tree::ComponentNode;
use crate::core::types::{AstPath, Fingerprint, OpId};
use crate::engine::projector::{self, ProjectError};
use crate::engine::transaction::{FileTransaction, TransactionError};
use crate::engine::verify::{self, VerifyError};
use crate::pipeline::Deployer;
use crate::survey::Surveyor;
use crate::ui::log::Logger;

/// Lifecycle phase of one transformation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Parsed,
    Projected,
    Located,
    Transacting,
    Verified,
    Committed,
    RolledBack,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Idle => "idle",
            Phase::Parsed => "parsed",
            Phase::Projected => "projected",
            Phase::Located => "located",
            Phase::Transacting => "transacting",
            Phase::Verified => "verified",
            Phase::Committed => "committed",
            Phase::RolledBack => "rolled_back",
        }
    }
}

/// Errors from a transformation run. Each carries a stable machine code
/// via [`EngineError::code`].
#[derive(Debug, Error)]
pub enum EngineError {
    /// The command string did not parse.
    #[error("{0}")]
    MalformedCommand(#[from] ParseError),

    /// Projection found no location with the target address.
    #[error("{0}")]
    TargetNotFound(#[from] ProjectError),

    /// No component in the tree owns the target address.
    #[error("no component owns target path: {0}")]
    ComponentNotFound(AstPath),

    /// Establishing the backup failed; the target file was not touched.
    #[error("{0}")]
    BackupFailed(#[from] TransactionError),

    /// Reading or writing the target file failed.
    #[error("io failure on '{path}': {source}", path = .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The rendered pre-mutation text did not occur exactly once in the
    /// target file, so the substitution site is ambiguous or missing.
    #[error(
        "expected exactly one occurrence of the component's current text in '{path}', found {occurrences}",
        path = .path.display()
    )]
    BeforeTextNotFound {
        path: PathBuf,
        occurrences: usize,
    },

    /// The re-parsed file diverges from the intended state.
    #[error("verification failed: committed file does not match intended state")]
    VerificationFailed,

    /// The re-parse collaborator itself failed.
    #[error("collaborator failed: {0}")]
    CollaboratorFailed(String),

    /// Rollback after a failure could not restore every file. The
    /// original failure is preserved as the cause.
    #[error(
        "restore failed for {} file(s) while rolling back: {cause}",
        .failed.len()
    )]
    RestoreFailed {
        failed: Vec<PathBuf>,
        #[source]
        cause: Box<EngineError>,
    },
}

impl EngineError {
    /// Stable machine-readable code for the error kind.
    pub fn code(&self) -> &'static str {
        match self {
            EngineError::MalformedCommand(_) => "malformed_command",
            EngineError::TargetNotFound(_) => "target_not_found",
            EngineError::ComponentNotFound(_) => "component_not_found",
            EngineError::BackupFailed(_) => "backup_failed",
            EngineError::Io { .. } => "io_failure",
            EngineError::BeforeTextNotFound { .. } => "before_text_not_found",
            EngineError::VerificationFailed => "verification_failed",
            EngineError::CollaboratorFailed(_) => "collaborator_failed",
            EngineError::RestoreFailed { .. } => "restore_failed",
        }
    }
}

impl From<VerifyError> for EngineError {
    fn from(err: VerifyError) -> Self {
        EngineError::CollaboratorFailed(err.to_string())
    }
}

/// What a successful run produced.
#[derive(Debug)]
pub struct TransformOutcome {
    /// Operation id stamped on every log line of this run.
    pub op_id: OpId,
    /// File the transformation rewrote.
    pub target_file: PathBuf,
    /// Fingerprint of the intended owning component.
    pub fingerprint: Fingerprint,
    /// Deploy outcome: version string on success, None when the deploy
    /// collaborator failed. Deploy failure never rolls back the commit.
    pub deploy_version: Option<String>,
}

impl TransformOutcome {
    pub fn deploy_ok(&self) -> bool {
        self.deploy_version.is_some()
    }
}

/// The transformation engine. Holds the loaded document and the two
/// collaborator seams; each [`run`](Engine::run) is one command.
pub struct Engine<'a> {
    document: &'a ProjectDocument,
    surveyor: &'a dyn Surveyor,
    deployer: &'a dyn Deployer,
    log: Logger,
}

impl<'a> Engine<'a> {
    pub fn new(
        document: &'a ProjectDocument,
        surveyor: &'a dyn Surveyor,
        deployer: &'a dyn Deployer,
        log: Logger,
    ) -> Self {
        Self {
            document,
            surveyor,
            deployer,
            log,
        }
    }

    /// Run one transformation command end to end.
    pub fn run(&self, raw: &str) -> Result<TransformOutcome, EngineError> {
        let op_id = OpId::new();
        self.phase(&op_id, Phase::Idle);
        self.log.info(
            "transformation started",
            &[("op_id", json!(op_id.to_string())), ("command", json!(raw))],
        );

        let command = parse(raw)?;
        self.phase(&op_id, Phase::Parsed);

        let intended = projector::apply(self.document, &command)?;
        self.phase(&op_id, Phase::Projected);

        let owner = find_owning_component(&self.document.tree, &command.target)
            .ok_or_else(|| EngineError::ComponentNotFound(command.target.clone()))?;
        // The same component exists in the intended clone; projection
        // succeeded, so this lookup cannot miss.
        let intended_owner = find_owning_component(&intended.tree, &command.target)
            .ok_or_else(|| EngineError::ComponentNotFound(command.target.clone()))?;
        let target_file = PathBuf::from(&owner.path);
        self.phase(&op_id, Phase::Located);
        self.log.debug(
            "target located",
            &[
                ("op_id", json!(op_id.to_string())),
                ("component", json!(owner.name)),
                ("file", json!(target_file.display().to_string())),
            ],
        );

        let mut tx = FileTransaction::open(&self.log)?;
        self.phase(&op_id, Phase::Transacting);

        match self.transact(&op_id, owner, intended_owner, &target_file, &mut tx) {
            Ok(()) => {
                self.phase(&op_id, Phase::Verified);
                tx.commit();
                self.phase(&op_id, Phase::Committed);

                let fingerprint = Fingerprint::of(intended_owner);
                let deploy_version = self.deploy(&op_id);
                self.log.info(
                    "transformation committed",
                    &[
                        ("op_id", json!(op_id.to_string())),
                        ("file", json!(target_file.display().to_string())),
                        ("fingerprint", json!(fingerprint.to_string())),
                    ],
                );
                Ok(TransformOutcome {
                    op_id,
                    target_file,
                    fingerprint,
                    deploy_version,
                })
            }
            Err(err) => {
                self.log.warn(
                    "transformation failed, rolling back",
                    &[
                        ("op_id", json!(op_id.to_string())),
                        ("code", json!(err.code())),
                        ("error", json!(err.to_string())),
                    ],
                );
                let rollback = tx.roll_back();
                self.phase(&op_id, Phase::RolledBack);
                if rollback.complete() {
                    Err(err)
                } else {
                    Err(EngineError::RestoreFailed {
                        failed: rollback.failed_paths(),
                        cause: Box::new(err),
                    })
                }
            }
        }
    }

    /// The mutation window: backup, substitute, verify. Any error here
    /// sends the caller down the rollback path.
    fn transact(
        &self,
        op_id: &OpId,
        owner: &ComponentNode,
        intended_owner: &ComponentNode,
        target_file: &PathBuf,
        tx: &mut FileTransaction,
    ) -> Result<(), EngineError> {
        tx.backup(target_file)?;

        let before = render_component(owner);
        let after = render_component(intended_owner);

        let current = fs::read_to_string(target_file).map_err(|source| EngineError::Io {
            path: target_file.clone(),
            source,
        })?;
        let occurrences = current.matches(&before).count();
        if occurrences != 1 {
            return Err(EngineError::BeforeTextNotFound {
                path: target_file.clone(),
                occurrences,
            });
        }

        let updated = current.replacen(&before, &after, 1);
        fs::write(target_file, updated).map_err(|source| EngineError::Io {
            path: target_file.clone(),
            source,
        })?;
        self.log.debug(
            "file rewritten",
            &[
                ("op_id", json!(op_id.to_string())),
                ("file", json!(target_file.display().to_string())),
            ],
        );

        if !verify::verify(self.surveyor, target_file, intended_owner, &self.log)? {
            return Err(EngineError::VerificationFailed);
        }
        Ok(())
    }

    /// Fire the deploy collaborator after commit. Failure is reported
    /// but never unwinds the committed transformation.
    fn deploy(&self, op_id: &OpId) -> Option<String> {
        match self.deployer.deploy() {
            Ok(record) => {
                self.log.info(
                    "deploy succeeded",
                    &[
                        ("op_id", json!(op_id.to_string())),
                        ("version", json!(record.version)),
                    ],
                );
                Some(record.version)
            }
            Err(err) => {
                self.log.error(
                    "deploy failed after commit; transformation stands",
                    &[
                        ("op_id", json!(op_id.to_string())),
                        ("error", json!(err.to_string())),
                    ],
                );
                None
            }
        }
    }

    fn phase(&self, op_id: &OpId, phase: Phase) {
        self.log.debug(
            "phase",
            &[
                ("op_id", json!(op_id.to_string())),
                ("phase", json!(phase.as_str())),
            ],
        );
    }
}
