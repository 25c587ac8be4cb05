//! Ledger node clients and the transaction wire types they exchange.

pub mod algod;
pub mod mock;
pub mod variant;

pub use algod::AlgodClient;
pub use mock::MockLedger;
pub use variant::LedgerVariant;

use serde::{Deserialize, Serialize};

use crate::types::Address;

/// Transaction parameters supplied by the node.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestedParams {
    pub fee: u64,
    pub first_round: u64,
    pub last_round: u64,
    pub genesis_id: String,
}

/// Explicit reference to one box a call touches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoxRef {
    pub app_id: u64,
    pub name: Vec<u8>,
}

/// Arguments of the two contract call kinds the engine issues.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum CallArgs {
    /// Create voter records with per-member voting power.
    Assign(Vec<(Address, u64)>),
    /// Destroy voter records.
    Unassign(Vec<Address>),
}

impl CallArgs {
    pub fn member_count(&self) -> usize {
        match self {
            CallArgs::Assign(members) => members.len(),
            CallArgs::Unassign(members) => members.len(),
        }
    }
}

/// One application call of an atomic group.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppCall {
    pub app_id: u64,
    pub sender: Address,
    pub args: CallArgs,
    /// One reference per member touched by this call.
    pub boxes: Vec<BoxRef>,
    /// Registry cross-reference; populated only on the first call of a group.
    pub foreign_apps: Vec<u64>,
    pub fee: u64,
    pub first_round: u64,
    pub last_round: u64,
    pub genesis_id: String,
    /// Hex group id shared by all calls of one atomic group.
    pub group: Option<String>,
}

/// An application call plus the operator's detached signature (hex).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignedAppCall {
    pub txn: AppCall,
    pub signature: String,
}

/// Confirmation status of a submitted group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingStatus {
    Pending,
    Confirmed(u64),
    Rejected(String),
}
