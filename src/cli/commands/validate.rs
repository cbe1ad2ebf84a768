//! validate command - schema-check the project data document

use std::fs;

use anyhow::{Context as _, Result};
use serde_json::{json, Value};

use crate::cli::Context;
use crate::core::{project, ProjectDocument};

/// Validate the project data document. Prints the accumulated errors
/// and exits non-zero when the document does not satisfy the schema.
pub fn validate(ctx: &Context) -> Result<()> {
    let config = ctx.config()?;
    let path = ctx.resolve(&config.project_data());
    let text = fs::read_to_string(&path)
        .with_context(|| format!("failed to read project data '{}'", path.display()))?;
    let value: Value = serde_json::from_str(&text)
        .with_context(|| format!("invalid JSON in project data '{}'", path.display()))?;

    let errors = project::validate(&value);
    if errors.is_empty() {
        // Full deserialization also exercises the typed schema.
        let document =
            ProjectDocument::from_value(value).context("project data failed to deserialize")?;
        if ctx.json {
            println!(
                "{}",
                json!({
                    "ok": true,
                    "project": document.project_name,
                    "components": document.component_count(),
                })
            );
        } else {
            println!(
                "{}: valid, {} component(s)",
                document.project_name,
                document.component_count()
            );
        }
        Ok(())
    } else {
        if ctx.json {
            println!("{}", json!({ "ok": false, "errors": errors }));
        } else {
            for error in &errors {
                eprintln!("{error}");
            }
        }
        anyhow::bail!("project data validation failed ({} error(s))", errors.len())
    }
}
