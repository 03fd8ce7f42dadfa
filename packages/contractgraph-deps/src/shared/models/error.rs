//! Error types for the contractgraph-deps crate
//!
//! Fatal conditions are modeling defects in the input representation, never
//! expected from a valid program. Recoverable resolution gaps (unresolvable
//! callees, abstract functions) are not errors; the affected expansion step is
//! skipped by the caller instead.

use thiserror::Error;

use super::program::{ContractId, FunctionId};
use super::value::ValueId;

/// Unified error type for engine construction.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DependencyError {
    /// A versioned value whose canonical back-reference is itself versioned.
    /// Canonicalization must be total; this is a defect in the SSA builder.
    #[error("versioned value {0:?} has a versioned canonical back-reference")]
    NonCanonicalBackRef(ValueId),

    /// Dangling value index into the arena.
    #[error("value {0:?} is not present in the arena")]
    MissingValue(ValueId),

    /// Dangling function index into the program.
    #[error("function {0:?} is not present in the program")]
    MissingFunction(FunctionId),

    /// Dangling contract index into the program.
    #[error("contract {0:?} is not present in the program")]
    MissingContract(ContractId),
}

pub type Result<T> = std::result::Result<T, DependencyError>;
