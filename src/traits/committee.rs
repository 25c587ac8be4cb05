use anyhow::Result;
use async_trait::async_trait;

use crate::types::{CommitteeSnapshot, SnapshotId};

/// One place committee snapshots can come from (bundle, remote, ...).
///
/// Sources are tried by the resolver in a fixed priority order; the first
/// one returning a valid snapshot wins.
#[async_trait]
pub trait CommitteeSource: Send + Sync {
    /// Human-readable source name for logging.
    fn name(&self) -> &'static str;

    /// Fetch the snapshot with the given content id.
    ///
    /// `Ok(None)` means this source does not have it (the resolver moves
    /// on); `Err` means the source itself failed.
    async fn fetch(&self, id: &SnapshotId) -> Result<Option<CommitteeSnapshot>>;
}
