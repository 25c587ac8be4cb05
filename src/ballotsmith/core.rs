//! Core BallotSmith struct and initialization - no business logic.

use anyhow::Result;
use tracing::info;

use crate::committee::{BundleSource, CommitteeSourceVariant, HttpSource, Resolver};
use crate::config::BaseConfig;
use crate::directory::{DirectoryVariant, HttpDirectory};
use crate::ledger::{AlgodClient, LedgerVariant};
use crate::operator::Operator;

/// Main application orchestrator.
pub struct BallotSmith {
    /// Query surface for processable proposals.
    pub directory: DirectoryVariant,

    /// Committee snapshot resolver (bundle first, then remote).
    pub resolver: Resolver,

    /// Ledger node client.
    pub ledger: LedgerVariant,

    /// Operator signing identity; absence fails requests, not startup.
    pub operator: Option<Operator>,

    /// Global/base configuration.
    pub config: BaseConfig,
}

impl BallotSmith {
    pub fn new(
        directory: DirectoryVariant,
        resolver: Resolver,
        ledger: LedgerVariant,
        operator: Option<Operator>,
        config: BaseConfig,
    ) -> Self {
        Self { directory, resolver, ledger, operator, config }
    }

    /// Wire up the production collaborators from configuration.
    pub fn initialize(config: BaseConfig) -> Result<Self> {
        let mut sources = Vec::new();
        if let Some(dir) = &config.committee_bundle_dir {
            sources.push(CommitteeSourceVariant::Bundle(BundleSource::new(dir.clone())));
        }
        if let Some(base) = &config.committee_base_url {
            sources.push(CommitteeSourceVariant::Http(HttpSource::new(base.clone())));
        }
        let resolver = Resolver::new(sources);

        let directory = DirectoryVariant::Http(HttpDirectory::new(config.directory_url.clone()));
        let ledger = LedgerVariant::Algod(AlgodClient::new(
            config.algod_url.clone(),
            config.algod_token.clone(),
        ));

        let operator = match &config.operator_mnemonic {
            Some(mnemonic) => {
                let operator = Operator::from_mnemonic(mnemonic)?;
                info!("operator account {}", operator.address());
                Some(operator)
            }
            None => None,
        };

        Ok(Self::new(directory, resolver, ledger, operator, config))
    }
}
