//! Technical implementations: edge collection, fixed-point closure, the
//! aggregating engine, and the interprocedural resolver.

pub mod aggregator;
pub mod closure;
pub mod collector;
pub mod interprocedural;

pub use aggregator::DependencyEngine;
pub use closure::close;
pub use collector::collect_function;
pub use interprocedural::resolve_recursive;
