//! engine::verify
//!
//! Round-trip verification: after the file is rewritten, the external
//! re-parser reads it back and the freshly parsed structure of the
//! owning component is compared against the intended state. A byte-level
//! diff would flag formatting noise; the comparison here is structural,
//! over the canonical JSON form of the component.

use std::path::Path;

use serde_json::{json, Value};
use thiserror::Error;

use crate::core::tree::ComponentNode;
use crate::survey::{SurveyError, Surveyor};
use crate::ui::log::Logger;

/// Errors from verification. A mismatch is not an error here; it is the
/// `Ok(false)` outcome.
#[derive(Debug, Error)]
pub enum VerifyError {
    /// The re-parse collaborator failed to produce a snapshot.
    #[error("re-parse failed: {0}")]
    Survey(#[from] SurveyError),
}

/// Structural equality over canonical JSON values.
pub fn structural_eq(a: &Value, b: &Value) -> bool {
    first_mismatch(a, b).is_none()
}

/// Find the first point where two values diverge, as a dotted path.
/// Object keys are visited in canonical (sorted) order, so the reported
/// path is deterministic.
pub fn first_mismatch(a: &Value, b: &Value) -> Option<String> {
    mismatch_at(a, b, "$")
}

fn mismatch_at(a: &Value, b: &Value, at: &str) -> Option<String> {
    match (a, b) {
        (Value::Object(left), Value::Object(right)) => {
            for key in left.keys() {
                if !right.contains_key(key) {
                    return Some(format!("{at}.{key} (missing on right)"));
                }
            }
            for key in right.keys() {
                if !left.contains_key(key) {
                    return Some(format!("{at}.{key} (missing on left)"));
                }
            }
            for (key, lv) in left {
                if let Some(path) = mismatch_at(lv, &right[key], &format!("{at}.{key}")) {
                    return Some(path);
                }
            }
            None
        }
        (Value::Array(left), Value::Array(right)) => {
            if left.len() != right.len() {
                return Some(format!("{at} (length {} vs {})", left.len(), right.len()));
            }
            for (index, (lv, rv)) in left.iter().zip(right).enumerate() {
                if let Some(path) = mismatch_at(lv, rv, &format!("{at}[{index}]")) {
                    return Some(path);
                }
            }
            None
        }
        _ => (a != b).then(|| at.to_string()),
    }
}

/// Re-parse the committed file and compare the fresh structure of the
/// owning component against the intended one. Returns `Ok(true)` on a
/// match, `Ok(false)` on any structural divergence (including the
/// component disappearing from the file).
pub fn verify(
    surveyor: &dyn Surveyor,
    committed: &Path,
    intended: &ComponentNode,
    log: &Logger,
) -> Result<bool, VerifyError> {
    let snapshot = surveyor.survey(committed)?;
    let Some(fresh) = snapshot
        .components()
        .into_iter()
        .find(|c| c.name == intended.name)
        .cloned()
    else {
        log.warn(
            "verification: component missing from re-parse",
            &[("component", json!(intended.name))],
        );
        return Ok(false);
    };

    // Both sides pass through the same serialization, so optional-field
    // elision cannot produce spurious mismatches.
    let want = canonical(intended);
    let got = canonical(&fresh);
    match first_mismatch(&want, &got) {
        None => Ok(true),
        Some(path) => {
            log.warn(
                "verification: structural mismatch",
                &[
                    ("component", json!(intended.name)),
                    ("at", json!(path)),
                ],
            );
            Ok(false)
        }
    }
}

fn canonical(component: &ComponentNode) -> Value {
    serde_json::to_value(component).unwrap_or(Value::Null)
}
