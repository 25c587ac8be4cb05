//! Assign/unassign run entry points: preconditions, fan-out, aggregation.

use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tracing::info;

use super::core::BallotSmith;
use crate::error::EngineError;
use crate::processor::{process_proposal, ProcessorDeps};
use crate::scheduler::{effective_concurrency, run_chunked};
use crate::summary::{summarize, RunSummary};
use crate::traits::ProposalDirectory;
use crate::types::Mode;

/// Caller request for one run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RunRequest {
    /// Restrict the run to these proposal ids.
    pub proposal_ids: Option<Vec<u64>>,
    /// Concurrency override, clamped to the hard ceiling.
    pub concurrency: Option<usize>,
}

/// Aggregated result of one run.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub mode: Mode,
    pub summary: RunSummary,
    pub concurrency: usize,
    pub elapsed_seconds: f64,
}

impl BallotSmith {
    /// Run eligibility processing over every currently processable
    /// proposal (or the requested subset).
    ///
    /// Per-proposal failures land in the summary; the returned error is
    /// reserved for request-level problems that abort before scheduling.
    pub async fn run(&self, mode: Mode, request: RunRequest) -> Result<RunReport, EngineError> {
        let operator = self
            .operator
            .clone()
            .ok_or_else(|| EngineError::Precondition("operator mnemonic is not configured".into()))?;

        let targets = self
            .directory
            .current(mode, request.proposal_ids.as_deref())
            .await
            .map_err(EngineError::Directory)?;
        if targets.is_empty() {
            return Err(EngineError::Precondition(format!(
                "no proposals to {}",
                mode.as_str()
            )));
        }

        let concurrency = effective_concurrency(request.concurrency, self.config.concurrency);
        info!(
            "starting {} run over {} proposals (concurrency {})",
            mode.as_str(),
            targets.len(),
            concurrency
        );

        let deps = Arc::new(ProcessorDeps {
            resolver: self.resolver.clone(),
            ledger: self.ledger.clone(),
            operator,
            registry_app_id: self.config.registry_app_id,
            confirmation_timeout: Duration::from_secs(self.config.confirmation_timeout_secs),
        });

        let started = Instant::now();
        let outcomes = run_chunked(targets, concurrency, move |target| {
            let deps = Arc::clone(&deps);
            async move { process_proposal(&deps, &target, mode).await }
        })
        .await;
        let elapsed_seconds = started.elapsed().as_secs_f64();

        let summary = summarize(outcomes);
        info!(
            "{} run finished: {} succeeded, {} failed in {:.2}s",
            mode.as_str(),
            summary.success,
            summary.failed,
            elapsed_seconds
        );

        Ok(RunReport { mode, summary, concurrency, elapsed_seconds })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::committee::{CommitteeSourceVariant, MockSource, Resolver};
    use crate::config::BaseConfig;
    use crate::directory::{DirectoryVariant, MockDirectory};
    use crate::ledger::{LedgerVariant, MockLedger};
    use crate::operator::Operator;
    use crate::types::{Address, CommitteeMember, CommitteeSnapshot, ProposalTarget, ADDRESS_LEN};

    fn member(id: u8) -> CommitteeMember {
        let mut bytes = [0u8; ADDRESS_LEN];
        bytes[0] = id;
        CommitteeMember { address: Address::new(bytes), votes: id as u64 }
    }

    fn snapshot() -> CommitteeSnapshot {
        let members: Vec<CommitteeMember> = (1..=5).map(member).collect();
        CommitteeSnapshot { id: "c1".to_string(), members }
    }

    fn target(id: u64) -> ProposalTarget {
        ProposalTarget { id, title: format!("proposal {}", id), snapshot_id: "c1".to_string() }
    }

    fn app(directory: DirectoryVariant, operator: Option<Operator>) -> BallotSmith {
        BallotSmith::new(
            directory,
            Resolver::new(vec![CommitteeSourceVariant::Mock(MockSource::new(vec![snapshot()]))]),
            LedgerVariant::Mock(MockLedger::new()),
            operator,
            BaseConfig::default(),
        )
    }

    fn operator() -> Operator {
        Operator::from_mnemonic("harbor spool antenna").unwrap()
    }

    #[tokio::test]
    async fn missing_operator_aborts_before_scheduling() {
        let app = app(DirectoryVariant::Mock(MockDirectory::new(vec![target(1)])), None);
        let err = app.run(Mode::Assign, RunRequest::default()).await.unwrap_err();
        assert!(matches!(err, EngineError::Precondition(_)));
    }

    #[tokio::test]
    async fn empty_proposal_set_aborts_before_scheduling() {
        let app = app(DirectoryVariant::Mock(MockDirectory::new(vec![])), Some(operator()));
        let err = app.run(Mode::Assign, RunRequest::default()).await.unwrap_err();
        assert!(matches!(err, EngineError::Precondition(_)));
    }

    #[tokio::test]
    async fn directory_failure_aborts_the_request() {
        let app = app(DirectoryVariant::Mock(MockDirectory::failing()), Some(operator()));
        let err = app.run(Mode::Assign, RunRequest::default()).await.unwrap_err();
        assert!(matches!(err, EngineError::Directory(_)));
    }

    #[tokio::test]
    async fn explicit_id_subset_restricts_the_run() {
        let app = app(
            DirectoryVariant::Mock(MockDirectory::new(vec![target(1), target(2), target(3)])),
            Some(operator()),
        );
        let request = RunRequest { proposal_ids: Some(vec![2]), concurrency: None };

        let report = app.run(Mode::Assign, request).await.unwrap();
        assert_eq!(report.summary.details.len(), 1);
        assert_eq!(report.summary.details[0].proposal_id, 2);
        assert_eq!(report.summary.success, 1);
    }

    #[tokio::test]
    async fn concurrency_override_is_clamped_to_the_ceiling() {
        let app = app(
            DirectoryVariant::Mock(MockDirectory::new(vec![target(1)])),
            Some(operator()),
        );
        let request = RunRequest { proposal_ids: None, concurrency: Some(10_000) };

        let report = app.run(Mode::Assign, request).await.unwrap();
        assert_eq!(report.concurrency, crate::scheduler::MAX_CONCURRENCY);
    }
}
