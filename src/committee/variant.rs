use anyhow::Result;
use async_trait::async_trait;

use super::{BundleSource, HttpSource, MockSource};
use crate::traits::CommitteeSource;
use crate::types::{CommitteeSnapshot, SnapshotId};

/// Enum over the available committee source implementations.
pub enum CommitteeSourceVariant {
    Bundle(BundleSource),
    Http(HttpSource),
    Mock(MockSource),
}

#[async_trait]
impl CommitteeSource for CommitteeSourceVariant {
    fn name(&self) -> &'static str {
        match self {
            CommitteeSourceVariant::Bundle(inner) => inner.name(),
            CommitteeSourceVariant::Http(inner) => inner.name(),
            CommitteeSourceVariant::Mock(inner) => inner.name(),
        }
    }

    async fn fetch(&self, id: &SnapshotId) -> Result<Option<CommitteeSnapshot>> {
        match self {
            CommitteeSourceVariant::Bundle(inner) => inner.fetch(id).await,
            CommitteeSourceVariant::Http(inner) => inner.fetch(id).await,
            CommitteeSourceVariant::Mock(inner) => inner.fetch(id).await,
        }
    }
}
