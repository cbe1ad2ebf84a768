//! rollback and history commands - deployment ledger queries

use anyhow::{Context as _, Result};
use serde_json::json;

use crate::cli::Context;
use crate::pipeline::DeployLedger;

/// Roll the deployment back to the last successful version. The ledger
/// supplies the target; exits non-zero when no success exists.
pub fn rollback(ctx: &Context) -> Result<()> {
    let config = ctx.config()?;
    let ledger = DeployLedger::new(ctx.resolve(&config.ledger_path()), config.ledger_cap());

    match ledger
        .rollback_to_previous(&ctx.log)
        .context("failed to read deployment ledger")?
    {
        Some(record) => {
            if ctx.json {
                println!(
                    "{}",
                    json!({
                        "ok": true,
                        "version": record.version,
                        "timestamp": record.timestamp,
                    })
                );
            } else {
                println!("rollback target: {} ({})", record.version, record.timestamp);
            }
            Ok(())
        }
        None => anyhow::bail!("no successful deployment to roll back to"),
    }
}

/// Print the deployment ledger, oldest first.
pub fn history(ctx: &Context, limit: Option<usize>) -> Result<()> {
    let config = ctx.config()?;
    let ledger = DeployLedger::new(ctx.resolve(&config.ledger_path()), config.ledger_cap());
    let mut records = ledger
        .history()
        .context("failed to read deployment ledger")?;

    if let Some(limit) = limit {
        let skip = records.len().saturating_sub(limit);
        records.drain(..skip);
    }

    if ctx.json {
        println!("{}", serde_json::to_string_pretty(&records)?);
    } else if records.is_empty() {
        println!("no deployments recorded");
    } else {
        for record in records {
            let status = match record.status {
                crate::pipeline::DeployStatus::Success => "success",
                crate::pipeline::DeployStatus::Failed => "failed",
            };
            println!("{}\t{}\t{}", record.version, status, record.timestamp);
        }
    }
    Ok(())
}
