use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use anyhow::{bail, Result};
use tokio::sync::Mutex;
use tracing::{debug, warn};

use super::CommitteeSourceVariant;
use crate::traits::CommitteeSource;
use crate::types::{CommitteeSnapshot, SnapshotId};

/// Resolves committee snapshots through an ordered source chain.
///
/// Snapshots are content-addressed, so a resolved id can be cached for the
/// lifetime of the process without invalidation.
#[derive(Clone)]
pub struct Resolver {
    sources: Arc<Vec<CommitteeSourceVariant>>,
    cache: Arc<Mutex<HashMap<SnapshotId, Arc<CommitteeSnapshot>>>>,
}

impl Resolver {
    /// Sources are tried in the given order; the first valid snapshot wins.
    pub fn new(sources: Vec<CommitteeSourceVariant>) -> Self {
        Self { sources: Arc::new(sources), cache: Arc::new(Mutex::new(HashMap::new())) }
    }

    pub async fn resolve(&self, id: &SnapshotId) -> Result<Arc<CommitteeSnapshot>> {
        if let Some(hit) = self.cache.lock().await.get(id) {
            return Ok(Arc::clone(hit));
        }

        for source in self.sources.iter() {
            match source.fetch(id).await {
                Ok(Some(snapshot)) => {
                    if let Err(e) = validate(&snapshot) {
                        warn!("{} returned an invalid committee {}: {}", source.name(), id, e);
                        continue;
                    }
                    debug!(
                        "resolved committee {} from {} ({} members)",
                        id,
                        source.name(),
                        snapshot.members.len()
                    );
                    let snapshot = Arc::new(snapshot);
                    self.cache.lock().await.insert(id.clone(), Arc::clone(&snapshot));
                    return Ok(snapshot);
                }
                Ok(None) => debug!("{} does not hold committee {}", source.name(), id),
                Err(e) => warn!("{} failed for committee {}: {}", source.name(), id, e),
            }
        }
        bail!("no source returned a valid committee for {}", id)
    }
}

fn validate(snapshot: &CommitteeSnapshot) -> Result<()> {
    if snapshot.members.is_empty() {
        bail!("member list is empty");
    }
    let mut seen = HashSet::with_capacity(snapshot.members.len());
    for member in &snapshot.members {
        if !seen.insert(member.address) {
            bail!("duplicate member {}", member.address);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::committee::MockSource;
    use crate::types::{Address, CommitteeMember, ADDRESS_LEN};

    fn member(id: u8) -> CommitteeMember {
        let mut bytes = [0u8; ADDRESS_LEN];
        bytes[0] = id;
        CommitteeMember { address: Address::new(bytes), votes: id as u64 }
    }

    fn snapshot(id: &str, ids: &[u8]) -> CommitteeSnapshot {
        CommitteeSnapshot {
            id: id.to_string(),
            members: ids.iter().map(|&i| member(i)).collect(),
        }
    }

    #[tokio::test]
    async fn first_source_with_the_snapshot_wins() {
        let resolver = Resolver::new(vec![
            CommitteeSourceVariant::Mock(MockSource::new(vec![])),
            CommitteeSourceVariant::Mock(MockSource::new(vec![snapshot("c1", &[1, 2])])),
        ]);
        let resolved = resolver.resolve(&"c1".to_string()).await.unwrap();
        assert_eq!(resolved.members.len(), 2);
    }

    #[tokio::test]
    async fn failing_source_falls_through_to_the_next() {
        let resolver = Resolver::new(vec![
            CommitteeSourceVariant::Mock(MockSource::failing()),
            CommitteeSourceVariant::Mock(MockSource::new(vec![snapshot("c1", &[1])])),
        ]);
        assert!(resolver.resolve(&"c1".to_string()).await.is_ok());
    }

    #[tokio::test]
    async fn unknown_id_is_an_error() {
        let resolver = Resolver::new(vec![CommitteeSourceVariant::Mock(MockSource::new(vec![]))]);
        assert!(resolver.resolve(&"nowhere".to_string()).await.is_err());
    }

    #[tokio::test]
    async fn empty_committee_is_rejected() {
        let resolver = Resolver::new(vec![CommitteeSourceVariant::Mock(MockSource::new(vec![
            snapshot("empty", &[]),
        ]))]);
        assert!(resolver.resolve(&"empty".to_string()).await.is_err());
    }

    #[tokio::test]
    async fn duplicate_members_are_rejected() {
        let resolver = Resolver::new(vec![CommitteeSourceVariant::Mock(MockSource::new(vec![
            snapshot("dup", &[1, 1]),
        ]))]);
        assert!(resolver.resolve(&"dup".to_string()).await.is_err());
    }

    #[tokio::test]
    async fn resolution_is_cached_by_id() {
        let resolver = Resolver::new(vec![CommitteeSourceVariant::Mock(MockSource::new(vec![
            snapshot("c1", &[1]),
        ]))]);
        let first = resolver.resolve(&"c1".to_string()).await.unwrap();
        let second = resolver.resolve(&"c1".to_string()).await.unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }
}
