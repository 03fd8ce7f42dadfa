/*
 * contractgraph-deps - Data-dependency and taint-propagation engine
 *
 * For every value of an SSA-form smart-contract program this crate answers
 * "which other values can influence this one" and, on top of that, "can this
 * value be influenced by an untrusted input". Higher-level vulnerability
 * detectors consume the query API; parsing, CFG/SSA construction, and
 * access-control classification are upstream collaborators producing the
 * `Program` model this crate reads.
 *
 * Architecture:
 * - shared/   : common models (value arena, SSA program, errors)
 * - features/ : vertical slices (dependency analysis)
 *
 * The computation is a deterministic batch: per-function collection and
 * closure (parallelizable), contract-level aggregation and re-closure, then
 * immutable write-once tables served to any number of readers.
 */

pub mod features;
pub mod shared;

pub use features::dependency::{
    canonical_or_self, canonicalize, canonicalize_table, close, collect_function,
    resolve_recursive, DepMap, DepSet, DependencyEngine, DependencyTables, Scope, TableSummary,
};
pub use shared::models::{
    CallOrigin, Contract, ContractId, DependencyError, EnvSymbol, Function, FunctionId, Operation,
    OperationKind, Program, Result, Value, ValueArena, ValueId, ValueKind, Visibility,
};
