pub mod committee;
pub mod directory;
pub mod ledger;

pub use committee::CommitteeSource;
pub use directory::ProposalDirectory;
pub use ledger::LedgerClient;
