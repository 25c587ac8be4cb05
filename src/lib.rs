// Library exports for testing and external use

pub mod ballotsmith;
pub mod committee;
pub mod config;
pub mod directory;
pub mod eligibility;
pub mod error;
pub mod ledger;
pub mod operator;
pub mod planner;
pub mod prober;
pub mod processor;
pub mod scheduler;
pub mod server;
pub mod submitter;
pub mod summary;
pub mod telemetry;
pub mod traits;
pub mod types;

// Re-export commonly used types and traits
pub use ballotsmith::{BallotSmith, RunReport, RunRequest};
pub use config::BaseConfig;
pub use error::EngineError;
pub use traits::{CommitteeSource, LedgerClient, ProposalDirectory};
pub use types::{
    Address, CommitteeMember, CommitteeSnapshot, Mode, ProposalOutcome, ProposalTarget, WorkItem,
};

// Re-export variant enums for convenience
pub use committee::{CommitteeSourceVariant, MockSource, Resolver};
pub use directory::{DirectoryVariant, MockDirectory};
pub use ledger::{LedgerVariant, MockLedger};
