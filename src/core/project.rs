//! core::project
//!
//! Loading and validation of the persisted snapshot document.
//!
//! # Document Shape
//!
//! ```json
//! {
//!   "projectName": "...",
//!   "rootDirectory": "...",
//!   "tree": { "type": "directory", ... }
//! }
//! ```
//!
//! All three top-level fields are required and `tree` must be
//! object-shaped. Violations are collected and reported as validation
//! errors, never panics: the document comes from an external parser and
//! is treated as untrusted input.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use thiserror::Error;

use crate::core::tree::Node;
use crate::ui::Logger;

/// Errors from document loading.
#[derive(Debug, Error)]
pub enum LoadError {
    /// Reading the document failed.
    #[error("failed to read project data '{path}': {source}", path = .path.display())]
    Io {
        /// Document path.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },

    /// The document is not JSON.
    #[error("invalid JSON in project data '{path}': {message}", path = .path.display())]
    Json {
        /// Document path.
        path: PathBuf,
        /// Parser message.
        message: String,
    },

    /// The document does not satisfy the schema.
    #[error("project data validation failed: {}", .errors.join("; "))]
    Validation {
        /// Accumulated per-field errors.
        errors: Vec<String>,
    },
}

/// A loaded structural snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectDocument {
    /// Project display name.
    #[serde(rename = "projectName")]
    pub project_name: String,
    /// Root directory the snapshot was parsed from.
    #[serde(rename = "rootDirectory")]
    pub root_directory: String,
    /// Root of the component tree.
    pub tree: Node,
}

impl ProjectDocument {
    /// Number of components in the tree.
    pub fn component_count(&self) -> usize {
        self.tree.components().len()
    }

    /// Parse a document from a JSON value, validating first.
    pub fn from_value(value: Value) -> Result<Self, LoadError> {
        let errors = validate(&value);
        if !errors.is_empty() {
            return Err(LoadError::Validation { errors });
        }
        serde_json::from_value(value).map_err(|e| LoadError::Validation {
            errors: vec![e.to_string()],
        })
    }

    /// Load a document from disk.
    pub fn load(path: &Path, log: &Logger) -> Result<Self, LoadError> {
        let text = fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let value: Value = serde_json::from_str(&text).map_err(|e| LoadError::Json {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        let document = Self::from_value(value)?;
        log.info(
            "project data loaded",
            &[
                ("project_name", json!(document.project_name)),
                ("components", json!(document.component_count())),
            ],
        );
        Ok(document)
    }
}

/// Validate the raw document, accumulating every violation.
pub fn validate(value: &Value) -> Vec<String> {
    let mut errors = Vec::new();

    let Some(object) = value.as_object() else {
        return vec!["document must be an object".to_string()];
    };

    for field in ["projectName", "rootDirectory"] {
        match object.get(field) {
            None => errors.push(format!("missing required field: {}", field)),
            Some(v) if !v.is_string() => errors.push(format!("field {} must be a string", field)),
            Some(_) => {}
        }
    }

    match object.get("tree") {
        None => errors.push("missing required field: tree".to_string()),
        Some(tree) => validate_tree(tree, &mut errors),
    }

    errors
}

fn validate_tree(tree: &Value, errors: &mut Vec<String>) {
    let Some(object) = tree.as_object() else {
        errors.push("tree must be an object".to_string());
        return;
    };

    for field in ["type", "name", "path"] {
        if !object.contains_key(field) {
            errors.push(format!("tree missing required field: {}", field));
        }
    }

    if let Some(children) = object.get("children").and_then(Value::as_array) {
        for (i, child) in children.iter().enumerate() {
            let mut child_errors = Vec::new();
            validate_tree(child, &mut child_errors);
            errors.extend(
                child_errors
                    .into_iter()
                    .map(|e| format!("children[{}].{}", i, e)),
            );
        }
    }
}
