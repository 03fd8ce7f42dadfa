//! Primary interface for detector collaborators: the query methods on
//! [`DependencyEngine`](super::infrastructure::DependencyEngine).

pub mod queries;

pub use queries::TableSummary;
