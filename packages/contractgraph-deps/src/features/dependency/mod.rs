// Data-dependency and taint propagation over SSA-form contract programs
//
// Layers:
// - domain: Scope, the typed four-table record, canonicalization
// - infrastructure: collector, closure engine, aggregating engine, resolver
// - application: detector-facing query API

pub mod application;
pub mod domain;
pub mod infrastructure;

pub use application::TableSummary;
pub use domain::{
    canonical_or_self, canonicalize, canonicalize_table, DepMap, DepSet, DependencyTables, Scope,
};
pub use infrastructure::{close, collect_function, resolve_recursive, DependencyEngine};
