//! Drive one proposal end-to-end: resolve, probe, filter, plan, submit.

use std::time::Duration;

use tracing::{debug, error, info, warn};

use crate::committee::Resolver;
use crate::eligibility::{assignable, unassignable, WorkSet};
use crate::error::EngineError;
use crate::ledger::LedgerVariant;
use crate::operator::Operator;
use crate::planner::plan_groups;
use crate::prober::probe_voters;
use crate::submitter::GroupSubmitter;
use crate::types::{Mode, ProposalOutcome, ProposalTarget};

/// Read-only collaborators shared by all concurrent proposal processors.
pub struct ProcessorDeps {
    pub resolver: Resolver,
    pub ledger: LedgerVariant,
    pub operator: Operator,
    pub registry_app_id: u64,
    pub confirmation_timeout: Duration,
}

/// Process one proposal. Every failure is caught here and converted into
/// an outcome; nothing propagates to sibling proposals.
pub async fn process_proposal(
    deps: &ProcessorDeps,
    target: &ProposalTarget,
    mode: Mode,
) -> ProposalOutcome {
    let work = match prepare(deps, target, mode).await {
        Ok(work) => work,
        Err(err) => {
            error!("proposal {} ({}): {}", target.id, target.title, err);
            return ProposalOutcome::failed(target, 0, err.to_string());
        }
    };

    if work.items.is_empty() {
        info!(
            "proposal {}: nothing to {} ({} of {} members already processed)",
            target.id,
            mode.as_str(),
            work.skipped,
            work.total
        );
        return ProposalOutcome::succeeded(target, 0, work.skipped, work.total);
    }

    let groups = plan_groups(&work.items);
    debug!(
        "proposal {}: {} members to {} across {} groups",
        target.id,
        work.items.len(),
        mode.as_str(),
        groups.len()
    );

    let submitter = GroupSubmitter {
        ledger: &deps.ledger,
        operator: &deps.operator,
        registry_app_id: deps.registry_app_id,
        confirmation_timeout: deps.confirmation_timeout,
    };

    let mut processed = 0;
    for (index, group) in groups.iter().enumerate() {
        match submitter.submit(target.id, mode, group).await {
            Ok(count) => processed += count,
            Err(source) if index == 0 => {
                // No partial state exists yet; the whole proposal fails.
                let err = EngineError::FirstGroupFailed(source);
                error!("proposal {}: {}", target.id, err);
                return ProposalOutcome::failed(target, 0, err.to_string());
            }
            Err(reason) => match mode {
                Mode::Assign => {
                    // Earlier groups are committed; skip this one and
                    // report partial success.
                    let err = EngineError::GroupFailed { index, reason };
                    warn!("proposal {}: skipping group: {}", target.id, err);
                }
                Mode::Unassign => {
                    let err = EngineError::GroupFailed { index, reason };
                    error!("proposal {}: {}", target.id, err);
                    return ProposalOutcome::failed(target, processed, err.to_string());
                }
            },
        }
    }

    info!(
        "proposal {}: {} {} voters ({} skipped)",
        target.id,
        mode.as_str(),
        processed,
        work.skipped
    );
    ProposalOutcome::succeeded(target, processed, work.skipped, work.total)
}

async fn prepare(
    deps: &ProcessorDeps,
    target: &ProposalTarget,
    mode: Mode,
) -> Result<WorkSet, EngineError> {
    let snapshot = deps.resolver.resolve(&target.snapshot_id).await.map_err(|e| {
        EngineError::CommitteeUnavailable {
            snapshot_id: target.snapshot_id.clone(),
            reason: e.to_string(),
        }
    })?;

    let assigned = probe_voters(&deps.ledger, target.id)
        .await
        .map_err(EngineError::Ledger)?;

    Ok(match mode {
        Mode::Assign => assignable(&snapshot, &assigned),
        Mode::Unassign => unassignable(&snapshot, &assigned),
    })
}
