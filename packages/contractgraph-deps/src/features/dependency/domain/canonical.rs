//! Canonicalization: collapsing versioned values onto their stable
//! source-level identities.

use super::tables::DepMap;
use crate::shared::models::{DependencyError, Result, ValueArena, ValueId, ValueKind};

/// Canonical identity of a value.
///
/// Versioned kinds return their required back-reference; every other kind is
/// its own identity. A back-reference that is itself versioned violates
/// canonicalization totality and fails fast.
pub fn canonicalize(arena: &ValueArena, id: ValueId) -> Result<ValueId> {
    let value = arena.resolve(id)?;
    match value.kind {
        ValueKind::Versioned { canonical, .. } | ValueKind::Reference { canonical, .. } => {
            if arena.resolve(canonical)?.kind.is_versioned() {
                return Err(DependencyError::NonCanonicalBackRef(id));
            }
            Ok(canonical)
        }
        _ => Ok(id),
    }
}

/// Infallible projection for query paths.
///
/// `compute` has already rejected malformed back-references for every value
/// its tables touched, so a failure here means the arena grew a defective
/// value after analysis. Debug builds assert; release builds answer with the
/// id itself, which can only widen a lookup to a miss.
pub fn canonical_or_self(arena: &ValueArena, id: ValueId) -> ValueId {
    match canonicalize(arena, id) {
        Ok(canonical) => canonical,
        Err(_) => {
            debug_assert!(false, "versioned back-reference must be canonical: {id:?}");
            id
        }
    }
}

/// Rebuild a table with every key and every set member canonicalized.
///
/// Sets whose keys collapse onto the same canonical identity are unioned:
/// multiple versions of one source variable keep all of their recorded
/// dependencies.
pub fn canonicalize_table(arena: &ValueArena, table: &DepMap) -> Result<DepMap> {
    let mut out = DepMap::default();
    for (key, deps) in table {
        let canonical_key = canonicalize(arena, *key)?;
        let entry = out.entry(canonical_key).or_default();
        for dep in deps {
            entry.insert(canonicalize(arena, *dep)?);
        }
    }
    Ok(out)
}
