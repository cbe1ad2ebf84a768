//! paths command - enumerate every addressable path

use anyhow::{Context as _, Result};
use serde_json::json;

use crate::cli::Context;
use crate::core::{enumerate, ProjectDocument};

/// List every computed address in the component tree, optionally
/// filtered to one component. Addresses print one per line in
/// traversal order; duplicates are printed as-is so collisions from
/// unrecognized relations stay visible.
pub fn paths(ctx: &Context, component: Option<&str>) -> Result<()> {
    let config = ctx.config()?;
    let document = ProjectDocument::load(&ctx.resolve(&config.project_data()), &ctx.log)
        .context("failed to load project data")?;

    let mut rows: Vec<(String, String)> = Vec::new();
    for node in document.tree.components() {
        if let Some(name) = component {
            if node.name != name {
                continue;
            }
        }
        for address in enumerate(node) {
            rows.push((node.name.clone(), address.path.to_string()));
        }
    }

    if let Some(name) = component {
        if rows.is_empty() {
            anyhow::bail!("no component named '{name}'");
        }
    }

    if ctx.json {
        let items: Vec<_> = rows
            .iter()
            .map(|(component, path)| json!({"component": component, "path": path}))
            .collect();
        println!("{}", serde_json::to_string_pretty(&items)?);
    } else {
        for (component, path) in rows {
            println!("{component}\t{path}");
        }
    }
    Ok(())
}
