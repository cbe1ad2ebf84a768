//! pipeline::process
//!
//! Process-backed deployer: runs the configured build command and records
//! the attempt in the deployment ledger.
//!
//! The call blocks with no timeout imposed here.

use std::process::Command;

use serde_json::json;

use super::ledger::{DeployLedger, DeployRecord, DeployStatus};
use super::{DeployError, Deployer};
use crate::ui::Logger;

/// Deployer that shells out to a build command.
#[derive(Debug, Clone)]
pub struct ProcessDeployer {
    command: Vec<String>,
    ledger: DeployLedger,
    log: Logger,
}

impl ProcessDeployer {
    /// Create a deployer for the given command line and ledger.
    pub fn new(command: Vec<String>, ledger: DeployLedger, log: Logger) -> Self {
        Self {
            command,
            ledger,
            log,
        }
    }

    fn record(&self, version: &str, status: DeployStatus, detail: Option<String>) -> Result<DeployRecord, DeployError> {
        self.ledger
            .record(version, status, detail)
            .map_err(|e| DeployError::Ledger(e.to_string()))
    }
}

impl Deployer for ProcessDeployer {
    fn deploy(&self) -> Result<DeployRecord, DeployError> {
        let version = DeployLedger::next_version();
        self.log.info(
            "starting deploy",
            &[
                ("version", json!(version)),
                ("command", json!(self.command)),
            ],
        );

        let (program, args) = self
            .command
            .split_first()
            .ok_or_else(|| DeployError::Process("empty deploy command".to_string()))?;

        let output = Command::new(program).args(args).output().map_err(|e| {
            DeployError::Process(format!("failed to spawn {}: {}", program, e))
        })?;

        if output.status.success() {
            let record = self.record(&version, DeployStatus::Success, None)?;
            self.log.info("deploy completed", &[("version", json!(version))]);
            Ok(record)
        } else {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            self.record(&version, DeployStatus::Failed, Some(stderr.clone()))?;
            self.log.error(
                "deploy failed",
                &[("version", json!(version)), ("stderr", json!(stderr))],
            );
            Err(DeployError::Process(format!(
                "{} exited with {}",
                program, output.status
            )))
        }
    }
}
