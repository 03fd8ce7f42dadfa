//! The per-scope dependency record.
//!
//! Exactly four tables, versioned/canonical crossed with all-paths and
//! unprotected-only. The unprotected-only tables hold edges recorded only
//! when the writing function is not access-gated, so for every key they are a
//! subset of the all-paths entry.

use rustc_hash::{FxHashMap, FxHashSet};

use crate::shared::models::ValueId;

pub type DepSet = FxHashSet<ValueId>;
pub type DepMap = FxHashMap<ValueId, DepSet>;

/// Write-once analysis record of one scope. Built by the engine, immutable
/// afterwards.
#[derive(Debug, Clone, Default)]
pub struct DependencyTables {
    /// Versioned keys, all paths.
    pub ssa: DepMap,
    /// Versioned keys, unprotected-only paths.
    pub ssa_unprotected: DepMap,
    /// Canonical keys, all paths.
    pub canonical: DepMap,
    /// Canonical keys, unprotected-only paths.
    pub canonical_unprotected: DepMap,
}

impl DependencyTables {
    /// Select one of the four tables.
    pub fn map(&self, ssa: bool, unprotected_only: bool) -> &DepMap {
        match (ssa, unprotected_only) {
            (true, false) => &self.ssa,
            (true, true) => &self.ssa_unprotected,
            (false, false) => &self.canonical,
            (false, true) => &self.canonical_unprotected,
        }
    }

    /// Direct dependency set of `value` in the selected table.
    pub fn dependencies(
        &self,
        value: ValueId,
        ssa: bool,
        unprotected_only: bool,
    ) -> Option<&DepSet> {
        self.map(ssa, unprotected_only).get(&value)
    }

    /// Total edge count of the selected table.
    pub fn edge_count(&self, ssa: bool, unprotected_only: bool) -> usize {
        self.map(ssa, unprotected_only)
            .values()
            .map(|deps| deps.len())
            .sum()
    }
}

/// Union `src` into `dst`, per key; new keys are copied verbatim.
pub fn merge_into(dst: &mut DepMap, src: &DepMap) {
    for (key, deps) in src {
        dst.entry(*key).or_default().extend(deps.iter().copied());
    }
}
