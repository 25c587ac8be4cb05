use std::collections::HashMap;

use anyhow::{bail, Result};
use async_trait::async_trait;

use crate::traits::CommitteeSource;
use crate::types::{CommitteeSnapshot, SnapshotId};

/// Mock committee source for testing.
#[derive(Default)]
pub struct MockSource {
    snapshots: HashMap<SnapshotId, CommitteeSnapshot>,
    fail: bool,
}

impl MockSource {
    pub fn new(snapshots: Vec<CommitteeSnapshot>) -> Self {
        Self {
            snapshots: snapshots.into_iter().map(|s| (s.id.clone(), s)).collect(),
            fail: false,
        }
    }

    /// A source that errors on every fetch.
    pub fn failing() -> Self {
        Self { snapshots: HashMap::new(), fail: true }
    }
}

#[async_trait]
impl CommitteeSource for MockSource {
    fn name(&self) -> &'static str {
        "mock-committee"
    }

    async fn fetch(&self, id: &SnapshotId) -> Result<Option<CommitteeSnapshot>> {
        if self.fail {
            bail!("mock committee source failure");
        }
        Ok(self.snapshots.get(id).cloned())
    }
}
