use anyhow::Result;
use async_trait::async_trait;

use super::{AlgodClient, MockLedger, PendingStatus, SignedAppCall, SuggestedParams};
use crate::traits::LedgerClient;

/// Enum over the available ledger client implementations.
#[derive(Clone)]
pub enum LedgerVariant {
    Algod(AlgodClient),
    Mock(MockLedger),
}

#[async_trait]
impl LedgerClient for LedgerVariant {
    fn name(&self) -> &'static str {
        match self {
            LedgerVariant::Algod(inner) => inner.name(),
            LedgerVariant::Mock(inner) => inner.name(),
        }
    }

    async fn suggested_params(&self) -> Result<SuggestedParams> {
        match self {
            LedgerVariant::Algod(inner) => inner.suggested_params().await,
            LedgerVariant::Mock(inner) => inner.suggested_params().await,
        }
    }

    async fn box_names(&self, app_id: u64) -> Result<Vec<Vec<u8>>> {
        match self {
            LedgerVariant::Algod(inner) => inner.box_names(app_id).await,
            LedgerVariant::Mock(inner) => inner.box_names(app_id).await,
        }
    }

    async fn submit_group(&self, group: &[SignedAppCall]) -> Result<String> {
        match self {
            LedgerVariant::Algod(inner) => inner.submit_group(group).await,
            LedgerVariant::Mock(inner) => inner.submit_group(group).await,
        }
    }

    async fn pending_status(&self, txid: &str) -> Result<PendingStatus> {
        match self {
            LedgerVariant::Algod(inner) => inner.pending_status(txid).await,
            LedgerVariant::Mock(inner) => inner.pending_status(txid).await,
        }
    }
}
