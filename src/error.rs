use thiserror::Error;

/// Failure classes for eligibility processing.
///
/// Per-proposal classes are caught at the processor boundary and turned
/// into a `ProposalOutcome`; they never abort sibling proposals.
/// `Precondition` aborts the whole request before scheduling begins.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("committee {snapshot_id} unavailable: {reason}")]
    CommitteeUnavailable { snapshot_id: String, reason: String },

    /// No partial state exists yet for the proposal, so the whole
    /// proposal is recorded as failed.
    #[error("first submission group rejected: {0}")]
    FirstGroupFailed(anyhow::Error),

    /// A non-first group failed. Assignment skips it and keeps earlier
    /// committed groups; unassignment escalates.
    #[error("submission group {index} rejected: {reason}")]
    GroupFailed { index: usize, reason: anyhow::Error },

    #[error("ledger query failed: {0}")]
    Ledger(anyhow::Error),

    #[error("proposal directory query failed: {0}")]
    Directory(anyhow::Error),

    #[error("precondition failed: {0}")]
    Precondition(String),
}
