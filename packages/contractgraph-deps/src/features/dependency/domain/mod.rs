//! Core dependency-analysis domain: scopes, the typed table record, and
//! canonicalization.

pub mod canonical;
pub mod tables;

use serde::Serialize;

use crate::shared::models::{ContractId, FunctionId};

pub use canonical::{canonical_or_self, canonicalize, canonicalize_table};
pub use tables::{DepMap, DepSet, DependencyTables};

/// A dependency-analysis scope: one function (including modifiers) or one
/// contract aggregating its functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Scope {
    Function(FunctionId),
    Contract(ContractId),
}
