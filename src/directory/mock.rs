use anyhow::{bail, Result};
use async_trait::async_trait;

use crate::traits::ProposalDirectory;
use crate::types::{Mode, ProposalTarget};

/// Mock proposal directory for testing.
#[derive(Default)]
pub struct MockDirectory {
    targets: Vec<ProposalTarget>,
    fail: bool,
}

impl MockDirectory {
    pub fn new(targets: Vec<ProposalTarget>) -> Self {
        Self { targets, fail: false }
    }

    pub fn failing() -> Self {
        Self { targets: Vec::new(), fail: true }
    }
}

#[async_trait]
impl ProposalDirectory for MockDirectory {
    fn name(&self) -> &'static str {
        "mock-directory"
    }

    async fn current(&self, _mode: Mode, ids: Option<&[u64]>) -> Result<Vec<ProposalTarget>> {
        if self.fail {
            bail!("mock directory failure");
        }
        Ok(self
            .targets
            .iter()
            .filter(|t| ids.map_or(true, |ids| ids.contains(&t.id)))
            .cloned()
            .collect())
    }
}
