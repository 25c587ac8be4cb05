use std::collections::{BTreeSet, HashMap, HashSet};
use std::sync::Arc;

use anyhow::{bail, Result};
use async_trait::async_trait;
use ed25519_dalek::{PublicKey, Signature, Verifier};
use tokio::sync::Mutex;

use super::{CallArgs, PendingStatus, SignedAppCall, SuggestedParams};
use crate::planner::{FIRST_TXN_CAPACITY, MAX_GROUP_TXNS, TXN_CAPACITY};
use crate::submitter::signing_bytes;
use crate::traits::LedgerClient;

#[derive(Default)]
struct MockState {
    /// Per-app box names; the ledger's only persisted state.
    boxes: Mutex<HashMap<u64, BTreeSet<Vec<u8>>>>,
    /// Groups submitted so far per app, accepted or not.
    submitted: Mutex<HashMap<u64, usize>>,
    /// Group indices (per app, in submission order) scripted to fail.
    fail_at: Mutex<HashMap<u64, HashSet<usize>>>,
    /// Per-transaction member counts of every accepted group, per app.
    accepted_shapes: Mutex<HashMap<u64, Vec<Vec<usize>>>>,
    confirmed: Mutex<HashMap<String, u64>>,
}

/// In-memory ledger double.
///
/// Enforces the group constraints a real node would (size limits, group id
/// consistency, registry reference placement, signature validity, box
/// existence rules) so planner or submitter violations fail tests loudly.
#[derive(Clone, Default)]
pub struct MockLedger {
    state: Arc<MockState>,
}

impl MockLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-create box names for an app.
    pub async fn seed_boxes(&self, app_id: u64, names: Vec<Vec<u8>>) {
        self.state.boxes.lock().await.entry(app_id).or_default().extend(names);
    }

    /// Script the `index`-th submitted group for `app_id` to be rejected.
    pub async fn fail_group(&self, app_id: u64, index: usize) {
        self.state.fail_at.lock().await.entry(app_id).or_default().insert(index);
    }

    pub async fn box_count(&self, app_id: u64) -> usize {
        self.state.boxes.lock().await.get(&app_id).map_or(0, |b| b.len())
    }

    pub async fn has_box(&self, app_id: u64, name: &[u8]) -> bool {
        self.state.boxes.lock().await.get(&app_id).is_some_and(|b| b.contains(name))
    }

    /// Per-transaction member counts of groups that were accepted.
    pub async fn accepted_shapes(&self, app_id: u64) -> Vec<Vec<usize>> {
        self.state.accepted_shapes.lock().await.get(&app_id).cloned().unwrap_or_default()
    }

    fn validate(group: &[SignedAppCall]) -> Result<()> {
        if group.is_empty() {
            bail!("empty transaction group");
        }
        if group.len() > MAX_GROUP_TXNS {
            bail!("group holds {} transactions, limit is {}", group.len(), MAX_GROUP_TXNS);
        }

        let app_id = group[0].txn.app_id;
        let group_id = group[0].txn.group.clone();
        if group_id.is_none() {
            bail!("transactions are missing a group id");
        }

        for (i, signed) in group.iter().enumerate() {
            let txn = &signed.txn;
            if txn.app_id != app_id {
                bail!("transaction {} targets a different application", i);
            }
            if txn.group != group_id {
                bail!("transaction {} carries a mismatched group id", i);
            }

            let members = txn.args.member_count();
            let capacity = if i == 0 { FIRST_TXN_CAPACITY } else { TXN_CAPACITY };
            if members > capacity {
                bail!("transaction {} holds {} members, capacity is {}", i, members, capacity);
            }
            if txn.boxes.len() != members {
                bail!("transaction {} references {} boxes for {} members", i, txn.boxes.len(), members);
            }
            if i == 0 && txn.foreign_apps.len() != 1 {
                bail!("first transaction must reference the registry application");
            }
            if i > 0 && !txn.foreign_apps.is_empty() {
                bail!("transaction {} must not reference foreign applications", i);
            }

            let public = PublicKey::from_bytes(txn.sender.as_bytes())
                .map_err(|e| anyhow::anyhow!("invalid sender key: {}", e))?;
            let sig_bytes = hex::decode(&signed.signature)?;
            let signature = Signature::from_bytes(&sig_bytes)
                .map_err(|e| anyhow::anyhow!("invalid signature encoding: {}", e))?;
            public
                .verify(&signing_bytes(txn)?, &signature)
                .map_err(|e| anyhow::anyhow!("signature check failed on transaction {}: {}", i, e))?;
        }
        Ok(())
    }
}

#[async_trait]
impl LedgerClient for MockLedger {
    fn name(&self) -> &'static str {
        "mock-ledger"
    }

    async fn suggested_params(&self) -> Result<SuggestedParams> {
        Ok(SuggestedParams {
            fee: 1000,
            first_round: 1,
            last_round: 1001,
            genesis_id: "mocknet-v1".to_string(),
        })
    }

    async fn box_names(&self, app_id: u64) -> Result<Vec<Vec<u8>>> {
        Ok(self
            .state
            .boxes
            .lock()
            .await
            .get(&app_id)
            .map(|b| b.iter().cloned().collect())
            .unwrap_or_default())
    }

    async fn submit_group(&self, group: &[SignedAppCall]) -> Result<String> {
        Self::validate(group)?;
        let app_id = group[0].txn.app_id;

        let index = {
            let mut submitted = self.state.submitted.lock().await;
            let counter = submitted.entry(app_id).or_insert(0);
            let index = *counter;
            *counter += 1;
            index
        };

        if self.state.fail_at.lock().await.get(&app_id).is_some_and(|s| s.contains(&index)) {
            bail!("group {} for app {} rejected by pool", index, app_id);
        }

        // Atomic effect: validate every record change, then apply all of them.
        let mut boxes = self.state.boxes.lock().await;
        let app_boxes = boxes.entry(app_id).or_default();
        for signed in group {
            for box_ref in &signed.txn.boxes {
                match &signed.txn.args {
                    CallArgs::Assign(_) if app_boxes.contains(&box_ref.name) => {
                        bail!("voter record already exists on app {}", app_id);
                    }
                    CallArgs::Unassign(_) if !app_boxes.contains(&box_ref.name) => {
                        bail!("voter record missing on app {}", app_id);
                    }
                    _ => {}
                }
            }
        }
        let mut shape = Vec::with_capacity(group.len());
        for signed in group {
            for box_ref in &signed.txn.boxes {
                match &signed.txn.args {
                    CallArgs::Assign(_) => {
                        app_boxes.insert(box_ref.name.clone());
                    }
                    CallArgs::Unassign(_) => {
                        app_boxes.remove(&box_ref.name);
                    }
                }
            }
            shape.push(signed.txn.args.member_count());
        }
        drop(boxes);

        self.state.accepted_shapes.lock().await.entry(app_id).or_default().push(shape);

        let txid = format!("mock-{}-{}", app_id, index);
        self.state.confirmed.lock().await.insert(txid.clone(), index as u64 + 1);
        Ok(txid)
    }

    async fn pending_status(&self, txid: &str) -> Result<PendingStatus> {
        Ok(match self.state.confirmed.lock().await.get(txid) {
            Some(round) => PendingStatus::Confirmed(*round),
            None => PendingStatus::Rejected(format!("unknown transaction {}", txid)),
        })
    }
}
