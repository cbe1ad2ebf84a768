//! core::types
//!
//! Small domain newtypes shared across the crate.
//!
//! # Design
//!
//! Addresses, operation ids, and fingerprints are newtypes rather than
//! bare strings so that signatures say what they mean and the few
//! normalization rules live in one place.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

/// A computed node address within a structural snapshot.
///
/// Addresses are `/`-joined typed segments, e.g.
/// `/Program/FunctionDeclaration[name=Header]`, optionally followed by
/// the `.props` designator addressing a node's property map. They are
/// compared by exact string equality; there are no prefix or wildcard
/// semantics.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AstPath(String);

impl AstPath {
    /// Wrap an address string.
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    /// The address as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The `.props` address for this node address.
    pub fn props(&self) -> AstPath {
        AstPath(format!("{}.props", self.0))
    }
}

impl std::fmt::Display for AstPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A parsed transformation command.
///
/// Immutable once parsed: one target address, one property, one value.
#[derive(Debug, Clone, PartialEq)]
pub struct TransformCommand {
    /// Address of the node (or `.props` map) to mutate.
    pub target: AstPath,
    /// Property to set, created if absent.
    pub property: String,
    /// The new value.
    pub value: serde_json::Value,
}

/// Unique id for one transformation attempt.
///
/// Tags every log entry and ledger record belonging to the attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OpId(String);

impl OpId {
    /// Generate a new unique operation id.
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Get the string representation.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for OpId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for OpId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Content digest of a structural snapshot.
///
/// Computed over canonical JSON so that two structurally equal trees
/// produce the same fingerprint regardless of construction order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Fingerprint(String);

impl Fingerprint {
    /// Compute a fingerprint for any serializable value.
    pub fn of<T: Serialize>(value: &T) -> Self {
        let canonical = serde_json::to_value(value).unwrap_or(serde_json::Value::Null);
        let bytes = serde_json::to_vec(&canonical).unwrap_or_default();

        let mut hasher = Sha256::new();
        hasher.update(&bytes);
        Self(hex::encode(hasher.finalize()))
    }

    /// Get the fingerprint as a hex string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
