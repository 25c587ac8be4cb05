use anyhow::Result;
use async_trait::async_trait;

use super::{HttpDirectory, MockDirectory};
use crate::traits::ProposalDirectory;
use crate::types::{Mode, ProposalTarget};

/// Enum over the available proposal directory implementations.
pub enum DirectoryVariant {
    Http(HttpDirectory),
    Mock(MockDirectory),
}

#[async_trait]
impl ProposalDirectory for DirectoryVariant {
    fn name(&self) -> &'static str {
        match self {
            DirectoryVariant::Http(inner) => inner.name(),
            DirectoryVariant::Mock(inner) => inner.name(),
        }
    }

    async fn current(&self, mode: Mode, ids: Option<&[u64]>) -> Result<Vec<ProposalTarget>> {
        match self {
            DirectoryVariant::Http(inner) => inner.current(mode, ids).await,
            DirectoryVariant::Mock(inner) => inner.current(mode, ids).await,
        }
    }
}
