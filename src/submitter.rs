//! Build, sign and submit one atomic group, then wait for confirmation.

use std::time::Duration;

use anyhow::{bail, Context, Result};
use sha2::{Digest, Sha256};
use tracing::debug;

use crate::ledger::{AppCall, BoxRef, CallArgs, LedgerVariant, PendingStatus, SignedAppCall, SuggestedParams};
use crate::operator::Operator;
use crate::planner::{GroupPlan, TxnPlan};
use crate::prober::voter_box_name;
use crate::traits::LedgerClient;
use crate::types::Mode;

const CONFIRMATION_POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Submits planned groups for one proposal.
pub struct GroupSubmitter<'a> {
    pub ledger: &'a LedgerVariant,
    pub operator: &'a Operator,
    pub registry_app_id: u64,
    pub confirmation_timeout: Duration,
}

/// Canonical bytes the operator signs for one call.
pub fn signing_bytes(txn: &AppCall) -> Result<Vec<u8>> {
    serde_json::to_vec(txn).context("encoding transaction for signing")
}

fn group_id(calls: &[AppCall]) -> Result<String> {
    let mut hasher = Sha256::new();
    for call in calls {
        hasher.update(serde_json::to_vec(call).context("encoding transaction for group id")?);
    }
    Ok(hex::encode(hasher.finalize()))
}

impl<'a> GroupSubmitter<'a> {
    /// Submit one atomic group and block until it confirms.
    /// Returns the number of members processed (= group size).
    pub async fn submit(&self, app_id: u64, mode: Mode, plan: &GroupPlan) -> Result<usize> {
        let params = self.ledger.suggested_params().await?;
        let mut calls: Vec<AppCall> = plan
            .transactions
            .iter()
            .map(|txn| self.build_call(app_id, mode, txn, &params))
            .collect();

        let gid = group_id(&calls)?;
        for call in &mut calls {
            call.group = Some(gid.clone());
        }

        let mut signed = Vec::with_capacity(calls.len());
        for txn in calls {
            let signature = self.operator.sign(&signing_bytes(&txn)?);
            signed.push(SignedAppCall { txn, signature });
        }

        let txid = self.ledger.submit_group(&signed).await?;
        let round = self.wait_for_confirmation(&txid).await?;
        debug!(
            "app {}: {} group of {} txns confirmed in round {} (txid {})",
            app_id,
            mode.as_str(),
            signed.len(),
            round,
            txid
        );
        Ok(plan.item_count())
    }

    fn build_call(&self, app_id: u64, mode: Mode, txn: &TxnPlan, params: &SuggestedParams) -> AppCall {
        let args = match mode {
            Mode::Assign => {
                CallArgs::Assign(txn.items.iter().map(|i| (i.address, i.votes)).collect())
            }
            Mode::Unassign => CallArgs::Unassign(txn.items.iter().map(|i| i.address).collect()),
        };
        AppCall {
            app_id,
            sender: self.operator.address(),
            args,
            boxes: txn
                .items
                .iter()
                .map(|i| BoxRef { app_id, name: voter_box_name(&i.address) })
                .collect(),
            foreign_apps: if txn.carries_registry_ref {
                vec![self.registry_app_id]
            } else {
                Vec::new()
            },
            fee: params.fee,
            first_round: params.first_round,
            last_round: params.last_round,
            genesis_id: params.genesis_id.clone(),
            group: None,
        }
    }

    async fn wait_for_confirmation(&self, txid: &str) -> Result<u64> {
        let deadline = tokio::time::Instant::now() + self.confirmation_timeout;
        loop {
            match self.ledger.pending_status(txid).await? {
                PendingStatus::Confirmed(round) => return Ok(round),
                PendingStatus::Rejected(reason) => bail!("group {} rejected: {}", txid, reason),
                PendingStatus::Pending => {}
            }
            if tokio::time::Instant::now() >= deadline {
                bail!(
                    "group {} not confirmed within {:?}",
                    txid,
                    self.confirmation_timeout
                );
            }
            tokio::time::sleep(CONFIRMATION_POLL_INTERVAL).await;
        }
    }
}
