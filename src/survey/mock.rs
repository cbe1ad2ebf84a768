//! survey::mock
//!
//! Mock surveyor for deterministic testing.
//!
//! Serves canned snapshots keyed by file path, records every call, and
//! can be scripted to fail. Thread-safe via internal `Arc<Mutex<...>>`
//! wrapping; clones share state.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use super::{SurveyError, Surveyor};
use crate::core::tree::Node;

/// Mock surveyor for testing.
#[derive(Debug, Clone, Default)]
pub struct MockSurveyor {
    inner: Arc<Mutex<MockSurveyorInner>>,
}

#[derive(Debug, Default)]
struct MockSurveyorInner {
    /// Canned snapshots by file path.
    snapshots: HashMap<PathBuf, Node>,
    /// Scripted failure, served on every call while set.
    fail_with: Option<SurveyError>,
    /// Paths surveyed, in call order.
    calls: Vec<PathBuf>,
}

impl MockSurveyor {
    /// Create an empty mock.
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `snapshot` for `path`.
    pub fn set_snapshot(&self, path: impl Into<PathBuf>, snapshot: Node) {
        let mut inner = self.inner.lock().expect("mock lock");
        inner.snapshots.insert(path.into(), snapshot);
    }

    /// Fail every subsequent call with `error`.
    pub fn fail_with(&self, error: SurveyError) {
        let mut inner = self.inner.lock().expect("mock lock");
        inner.fail_with = Some(error);
    }

    /// Number of calls made so far.
    pub fn call_count(&self) -> usize {
        self.inner.lock().expect("mock lock").calls.len()
    }

    /// Paths surveyed, in call order.
    pub fn calls(&self) -> Vec<PathBuf> {
        self.inner.lock().expect("mock lock").calls.clone()
    }
}

impl Surveyor for MockSurveyor {
    fn survey(&self, file: &Path) -> Result<Node, SurveyError> {
        let mut inner = self.inner.lock().expect("mock lock");
        inner.calls.push(file.to_path_buf());

        if let Some(error) = &inner.fail_with {
            return Err(error.clone());
        }
        inner
            .snapshots
            .get(file)
            .cloned()
            .ok_or_else(|| SurveyError::Process(format!("no snapshot for {}", file.display())))
    }
}
