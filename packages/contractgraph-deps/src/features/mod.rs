//! Feature modules.

pub mod dependency;
