use clap::Parser;
use serde::{Deserialize, Serialize};

use crate::scheduler::DEFAULT_CONCURRENCY;

/// Base configuration for the engine.
///
/// All knobs are explicit here and passed into constructors; nothing reads
/// the process environment at run time. CLI flags fall back to env vars.
#[derive(Debug, Clone, Parser, Serialize, Deserialize)]
#[command(name = "ballotsmith", about = "Batch committee-eligibility engine")]
pub struct BaseConfig {
    /// Bind address for the HTTP API.
    #[arg(long, env = "BALLOTSMITH_LISTEN", default_value = "127.0.0.1:8787")]
    pub listen_addr: String,

    /// Base URL of the ledger node REST API.
    #[arg(long, env = "ALGOD_URL", default_value = "http://127.0.0.1:4001")]
    pub algod_url: String,

    /// API token for the ledger node; empty for unauthenticated nodes.
    #[arg(long, env = "ALGOD_TOKEN", default_value = "")]
    pub algod_token: String,

    /// Application id of the parent registry contract, cross-referenced by
    /// the first transaction of every submission group.
    #[arg(long, env = "REGISTRY_APP_ID", default_value_t = 0)]
    pub registry_app_id: u64,

    /// Mnemonic for the operator signing account. Absence is a request-time
    /// precondition failure, not a startup error.
    #[arg(long, env = "OPERATOR_MNEMONIC")]
    pub operator_mnemonic: Option<String>,

    /// Directory holding bundled committee files (`<snapshot-id>.json`).
    #[arg(long, env = "COMMITTEE_BUNDLE_DIR")]
    pub committee_bundle_dir: Option<String>,

    /// Base URL for remote committee fetches, tried after the bundle.
    #[arg(long, env = "COMMITTEE_BASE_URL")]
    pub committee_base_url: Option<String>,

    /// Base URL of the proposal directory service.
    #[arg(long, env = "DIRECTORY_URL", default_value = "http://127.0.0.1:8800")]
    pub directory_url: String,

    /// Proposals processed concurrently per chunk.
    #[arg(long, env = "BALLOTSMITH_CONCURRENCY", default_value_t = DEFAULT_CONCURRENCY)]
    pub concurrency: usize,

    /// Seconds to wait for a submitted group to confirm.
    #[arg(long, env = "CONFIRMATION_TIMEOUT_SECS", default_value_t = 30)]
    pub confirmation_timeout_secs: u64,
}

impl Default for BaseConfig {
    fn default() -> Self {
        BaseConfig {
            listen_addr: "127.0.0.1:8787".to_string(),
            algod_url: "http://127.0.0.1:4001".to_string(),
            algod_token: String::new(),
            registry_app_id: 0,
            operator_mnemonic: None,
            committee_bundle_dir: None,
            committee_base_url: None,
            directory_url: "http://127.0.0.1:8800".to_string(),
            concurrency: DEFAULT_CONCURRENCY,
            confirmation_timeout_secs: 30,
        }
    }
}
