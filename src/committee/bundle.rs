use std::path::PathBuf;

use anyhow::{Context, Result};
use async_trait::async_trait;

use super::CommitteePayload;
use crate::traits::CommitteeSource;
use crate::types::{CommitteeSnapshot, SnapshotId};

/// Committee source backed by a local bundle directory; files are named
/// by their content hash (`<snapshot-id>.json`).
pub struct BundleSource {
    dir: PathBuf,
}

impl BundleSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

#[async_trait]
impl CommitteeSource for BundleSource {
    fn name(&self) -> &'static str {
        "bundle"
    }

    async fn fetch(&self, id: &SnapshotId) -> Result<Option<CommitteeSnapshot>> {
        let path = self.dir.join(format!("{}.json", id));
        let raw = match tokio::fs::read_to_string(&path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e).with_context(|| format!("reading {}", path.display())),
        };
        let payload: CommitteePayload = serde_json::from_str(&raw)
            .with_context(|| format!("parsing committee bundle {}", path.display()))?;
        Ok(Some(CommitteeSnapshot { id: id.clone(), members: payload.members }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Address, CommitteeMember, ADDRESS_LEN};

    fn member(id: u8) -> CommitteeMember {
        let mut bytes = [0u8; ADDRESS_LEN];
        bytes[0] = id;
        CommitteeMember { address: Address::new(bytes), votes: id as u64 }
    }

    #[tokio::test]
    async fn reads_bundled_committee_by_id() {
        let dir = tempfile::tempdir().unwrap();
        let payload = CommitteePayload { members: vec![member(1), member(2)] };
        let id = "deadbeef".to_string();
        std::fs::write(
            dir.path().join(format!("{}.json", id)),
            serde_json::to_string(&payload).unwrap(),
        )
        .unwrap();

        let source = BundleSource::new(dir.path());
        let snapshot = source.fetch(&id).await.unwrap().unwrap();
        assert_eq!(snapshot.id, id);
        assert_eq!(snapshot.members.len(), 2);
    }

    #[tokio::test]
    async fn missing_file_is_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let source = BundleSource::new(dir.path());
        assert!(source.fetch(&"absent".to_string()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let id = "broken".to_string();
        std::fs::write(dir.path().join(format!("{}.json", id)), "not json").unwrap();

        let source = BundleSource::new(dir.path());
        assert!(source.fetch(&id).await.is_err());
    }
}
