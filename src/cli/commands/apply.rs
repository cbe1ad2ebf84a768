//! apply command - run one transformation through the engine

use anyhow::{Context as _, Result};
use serde_json::json;

use crate::cli::Context;
use crate::core::ProjectDocument;
use crate::engine::Engine;
use crate::pipeline::{DeployLedger, ProcessDeployer};
use crate::survey::ProcessSurveyor;

/// Apply a transformation command to the project.
pub fn apply(ctx: &Context, raw: &str) -> Result<()> {
    let config = ctx.config()?;
    let document = ProjectDocument::load(&ctx.resolve(&config.project_data()), &ctx.log)
        .context("failed to load project data")?;

    let surveyor = ProcessSurveyor::new(config.surveyor_command());
    let ledger = DeployLedger::new(ctx.resolve(&config.ledger_path()), config.ledger_cap());
    let deployer = ProcessDeployer::new(config.deploy_command(), ledger, ctx.log.clone());

    let engine = Engine::new(&document, &surveyor, &deployer, ctx.log.clone());
    match engine.run(raw) {
        Ok(outcome) => {
            if ctx.json {
                println!(
                    "{}",
                    json!({
                        "ok": true,
                        "op_id": outcome.op_id.to_string(),
                        "file": outcome.target_file.display().to_string(),
                        "fingerprint": outcome.fingerprint.to_string(),
                        "deploy_version": outcome.deploy_version,
                    })
                );
            } else {
                println!("committed {}", outcome.target_file.display());
                match &outcome.deploy_version {
                    Some(version) => println!("deployed {version}"),
                    None => eprintln!("deploy failed; transformation stands"),
                }
            }
            Ok(())
        }
        Err(err) => {
            if ctx.json {
                println!(
                    "{}",
                    json!({
                        "ok": false,
                        "code": err.code(),
                        "error": err.to_string(),
                    })
                );
            }
            Err(anyhow::Error::new(err))
        }
    }
}
