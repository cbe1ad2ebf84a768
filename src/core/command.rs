//! core::command
//!
//! Parsing of transformation command strings.
//!
//! # Grammar
//!
//! ```text
//! <path>.<property>=<value>
//! ```
//!
//! The string is split on the first `=` outside any bracketed segment to
//! separate the assignment target from the value, and the target is
//! split on the last such `.` to separate the address from the property.
//! Bracketed segments (`[name=X]`, `[0]`) are opaque to both splits.
//! Addresses never contain bare dots outside brackets, with one
//! exception: a property-map assignment leaves the `.props` designator
//! on the address, e.g.
//!
//! ```text
//! /Program/FunctionDeclaration[name=Header].props.className="header-dark"
//! ```
//!
//! parses to target `/Program/FunctionDeclaration[name=Header].props`,
//! property `className`, value `"header-dark"`.
//!
//! Values are parsed as JSON literals (number, boolean, null, string,
//! object, array); anything that does not parse is taken as the trimmed
//! raw string.

use thiserror::Error;

use crate::core::types::{AstPath, TransformCommand};

/// Errors from command parsing.
#[derive(Debug, Error, PartialEq)]
pub enum ParseError {
    /// No `=` in the command.
    #[error("malformed command: missing '=' property assignment")]
    MissingAssignment,

    /// No `.` before the `=`.
    #[error("malformed command: missing '.' property selector before '='")]
    MissingProperty,

    /// Nothing on the address side.
    #[error("malformed command: empty target path")]
    EmptyPath,

    /// Nothing between the last `.` and the `=`.
    #[error("malformed command: empty property name")]
    EmptyProperty,
}

/// Parse a command string into a [`TransformCommand`].
pub fn parse(raw: &str) -> Result<TransformCommand, ParseError> {
    let eq = assignment_position(raw).ok_or(ParseError::MissingAssignment)?;
    let (target, value_text) = (&raw[..eq], &raw[eq + 1..]);

    let dot = property_dot_position(target).ok_or(ParseError::MissingProperty)?;
    let (path, property) = (&target[..dot], &target[dot + 1..]);
    if path.is_empty() {
        return Err(ParseError::EmptyPath);
    }
    if property.is_empty() {
        return Err(ParseError::EmptyProperty);
    }

    let trimmed = value_text.trim();
    let value = serde_json::from_str(trimmed)
        .unwrap_or_else(|_| serde_json::Value::String(trimmed.to_string()));

    Ok(TransformCommand {
        target: AstPath::new(path),
        property: property.to_string(),
        value,
    })
}

/// Byte offset of the first `=` outside brackets, if any.
fn assignment_position(raw: &str) -> Option<usize> {
    let mut depth = 0usize;
    for (i, c) in raw.char_indices() {
        match c {
            '[' => depth += 1,
            ']' => depth = depth.saturating_sub(1),
            '=' if depth == 0 => return Some(i),
            _ => {}
        }
    }
    None
}

/// Byte offset of the last `.` outside brackets, if any.
fn property_dot_position(target: &str) -> Option<usize> {
    let mut depth = 0usize;
    let mut last = None;
    for (i, c) in target.char_indices() {
        match c {
            '[' => depth += 1,
            ']' => depth = depth.saturating_sub(1),
            '.' if depth == 0 => last = Some(i),
            _ => {}
        }
    }
    last
}
