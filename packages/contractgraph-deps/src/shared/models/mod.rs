//! Common models shared across features.

pub mod error;
pub mod program;
pub mod value;

pub use error::{DependencyError, Result};
pub use program::{
    Contract, ContractId, Function, FunctionId, Operation, OperationKind, Program, Visibility,
};
pub use value::{CallOrigin, EnvSymbol, Value, ValueArena, ValueId, ValueKind};
