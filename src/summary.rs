//! Reduce per-proposal outcomes into the run summary.

use serde::{Deserialize, Serialize};

use crate::types::ProposalOutcome;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    pub success: usize,
    pub failed: usize,
    pub details: Vec<ProposalOutcome>,
}

/// Pure reduce; detail order matches the input order.
pub fn summarize(outcomes: Vec<ProposalOutcome>) -> RunSummary {
    let success = outcomes.iter().filter(|o| o.success).count();
    let failed = outcomes.len() - success;
    RunSummary { success, failed, details: outcomes }
}
