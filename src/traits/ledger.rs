use anyhow::Result;
use async_trait::async_trait;

use crate::ledger::{PendingStatus, SignedAppCall, SuggestedParams};

/// The ledger node RPC surface the engine consumes.
///
/// The smart-contract call semantics behind it are opaque; the engine only
/// needs box listings, transaction parameters, group submission and
/// confirmation status.
#[async_trait]
pub trait LedgerClient: Send + Sync {
    /// Human-readable client name for logging.
    fn name(&self) -> &'static str;

    /// Current transaction parameters (validity window, fee).
    async fn suggested_params(&self) -> Result<SuggestedParams>;

    /// All box names stored by the given application.
    async fn box_names(&self, app_id: u64) -> Result<Vec<Vec<u8>>>;

    /// Submit one atomic group; all transactions land or none do.
    /// Returns the id used to poll for confirmation.
    async fn submit_group(&self, group: &[SignedAppCall]) -> Result<String>;

    /// Confirmation status of a previously submitted group.
    async fn pending_status(&self, txid: &str) -> Result<PendingStatus>;
}
