//! pipeline::mock
//!
//! Mock deployer for deterministic testing. Counts invocations and can
//! be scripted to fail; clones share state.

use std::sync::{Arc, Mutex};

use chrono::Utc;

use super::ledger::{DeployRecord, DeployStatus};
use super::{DeployError, Deployer};

/// Mock deployer for testing.
#[derive(Debug, Clone, Default)]
pub struct MockDeployer {
    inner: Arc<Mutex<MockDeployerInner>>,
}

#[derive(Debug, Default)]
struct MockDeployerInner {
    deploys: usize,
    fail_with: Option<DeployError>,
}

impl MockDeployer {
    /// Create a mock that succeeds.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail every subsequent deploy with `error`.
    pub fn fail_with(&self, error: DeployError) {
        self.inner.lock().expect("mock lock").fail_with = Some(error);
    }

    /// Number of deploy invocations so far.
    pub fn deploy_count(&self) -> usize {
        self.inner.lock().expect("mock lock").deploys
    }
}

impl Deployer for MockDeployer {
    fn deploy(&self) -> Result<DeployRecord, DeployError> {
        let mut inner = self.inner.lock().expect("mock lock");
        inner.deploys += 1;

        if let Some(error) = &inner.fail_with {
            return Err(error.clone());
        }
        Ok(DeployRecord {
            version: format!("v-test-{}", inner.deploys),
            timestamp: Utc::now().to_rfc3339(),
            status: DeployStatus::Success,
            detail: None,
        })
    }
}
