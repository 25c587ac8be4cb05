//! Proposal directory: the external "current proposals" query.

pub mod http;
pub mod mock;
pub mod variant;

pub use http::HttpDirectory;
pub use mock::MockDirectory;
pub use variant::DirectoryVariant;
