//! Committee snapshot sources and the priority-ordered resolver.

pub mod bundle;
pub mod http;
pub mod mock;
pub mod resolver;
pub mod variant;

pub use bundle::BundleSource;
pub use http::HttpSource;
pub use mock::MockSource;
pub use resolver::Resolver;
pub use variant::CommitteeSourceVariant;

use serde::{Deserialize, Serialize};

use crate::types::CommitteeMember;

/// Wire shape shared by the bundle files and the remote endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommitteePayload {
    pub members: Vec<CommitteeMember>,
}
