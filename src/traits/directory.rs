use anyhow::Result;
use async_trait::async_trait;

use crate::types::{Mode, ProposalTarget};

/// External query surface listing the proposals currently open for
/// eligibility processing.
#[async_trait]
pub trait ProposalDirectory: Send + Sync {
    /// Human-readable directory name for logging.
    fn name(&self) -> &'static str;

    /// List proposals currently processable in `mode`, optionally
    /// restricted to an explicit id subset.
    async fn current(&self, mode: Mode, ids: Option<&[u64]>) -> Result<Vec<ProposalTarget>>;
}
