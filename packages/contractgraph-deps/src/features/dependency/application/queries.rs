/*
 * Detector-facing query API
 *
 * Every query reads finished tables: false/empty answers for scopes or keys
 * the program never produced, never panics. Canonical variants canonicalize
 * their arguments first (`compute` has already rejected defective
 * back-references, so the projection is infallible here); `_ssa` variants are
 * version-precise.
 */

use serde::Serialize;

use super::super::domain::canonical::canonical_or_self;
use super::super::domain::tables::{DepMap, DepSet};
use super::super::domain::Scope;
use super::super::infrastructure::aggregator::DependencyEngine;
use super::super::infrastructure::interprocedural::resolve_recursive;
use crate::shared::models::ValueId;

/// Serializable per-scope snapshot for detector reports.
#[derive(Debug, Clone, Serialize)]
pub struct TableSummary {
    pub scope: Scope,
    pub keys: usize,
    pub edges: usize,
    pub unprotected_edges: usize,
    pub taint_roots: usize,
}

impl<'p> DependencyEngine<'p> {
    /// Can `source` influence `value`? Canonical identities, reflexive,
    /// always false when `value` is a constant.
    pub fn is_dependent(
        &self,
        value: ValueId,
        source: ValueId,
        scope: Scope,
        unprotected_only: bool,
    ) -> bool {
        self.is_dependent_in(value, source, scope, unprotected_only, false)
    }

    /// Version-precise variant of [`Self::is_dependent`].
    pub fn is_dependent_ssa(
        &self,
        value: ValueId,
        source: ValueId,
        scope: Scope,
        unprotected_only: bool,
    ) -> bool {
        self.is_dependent_in(value, source, scope, unprotected_only, true)
    }

    fn is_dependent_in(
        &self,
        value: ValueId,
        source: ValueId,
        scope: Scope,
        unprotected_only: bool,
        ssa: bool,
    ) -> bool {
        let arena = self.program().arena();
        if arena.is_constant(value) {
            return false;
        }
        let (value, source) = if ssa {
            (value, source)
        } else {
            (
                canonical_or_self(arena, value),
                canonical_or_self(arena, source),
            )
        };
        if value == source {
            return true;
        }
        self.tables(scope)
            .and_then(|t| t.dependencies(value, ssa, unprotected_only))
            .map(|deps| deps.contains(&source))
            .unwrap_or(false)
    }

    /// Can an untrusted input influence `value`? Environment pseudo-roots
    /// are included; use [`Self::is_tainted_with`] to restrict the check to
    /// declared-parameter roots.
    pub fn is_tainted(&self, value: ValueId, scope: Scope, unprotected_only: bool) -> bool {
        self.is_tainted_with(value, scope, unprotected_only, true)
    }

    pub fn is_tainted_with(
        &self,
        value: ValueId,
        scope: Scope,
        unprotected_only: bool,
        include_environment_roots: bool,
    ) -> bool {
        self.taint_check(value, scope, unprotected_only, include_environment_roots, false)
    }

    /// Version-precise variant of [`Self::is_tainted`].
    pub fn is_tainted_ssa(&self, value: ValueId, scope: Scope, unprotected_only: bool) -> bool {
        self.taint_check(value, scope, unprotected_only, true, true)
    }

    pub fn is_tainted_ssa_with(
        &self,
        value: ValueId,
        scope: Scope,
        unprotected_only: bool,
        include_environment_roots: bool,
    ) -> bool {
        self.taint_check(value, scope, unprotected_only, include_environment_roots, true)
    }

    fn taint_check(
        &self,
        value: ValueId,
        scope: Scope,
        unprotected_only: bool,
        include_environment_roots: bool,
        ssa: bool,
    ) -> bool {
        let arena = self.program().arena();
        if arena.is_constant(value) {
            return false;
        }
        let parameter_roots = self.taint_roots().iter().copied();
        let environment_roots = include_environment_roots
            .then(|| arena.environment_ids())
            .into_iter()
            .flatten();
        let mut roots = parameter_roots.chain(environment_roots);
        roots.any(|root| self.is_dependent_in(value, root, scope, unprotected_only, ssa))
    }

    /// Direct (closed) canonical dependency set of `value` in `scope`.
    pub fn get_dependencies(
        &self,
        value: ValueId,
        scope: Scope,
        unprotected_only: bool,
    ) -> DepSet {
        let arena = self.program().arena();
        let key = canonical_or_self(arena, value);
        self.tables(scope)
            .and_then(|t| t.dependencies(key, false, unprotected_only))
            .cloned()
            .unwrap_or_default()
    }

    /// Direct (closed) versioned dependency set of `value` in `scope`.
    pub fn get_dependencies_ssa(
        &self,
        value: ValueId,
        scope: Scope,
        unprotected_only: bool,
    ) -> DepSet {
        self.tables(scope)
            .and_then(|t| t.dependencies(value, true, unprotected_only))
            .cloned()
            .unwrap_or_default()
    }

    /// Dependency set extended across call boundaries via callee return
    /// values (breadth-first, cycle-safe, under-approximate on unresolvable
    /// targets).
    pub fn get_dependencies_recursive(
        &self,
        value: ValueId,
        scope: Scope,
        unprotected_only: bool,
    ) -> DepSet {
        resolve_recursive(self, value, scope, unprotected_only)
    }

    /// The whole canonical table of a scope.
    pub fn get_all_dependencies(&self, scope: Scope, unprotected_only: bool) -> Option<&DepMap> {
        self.tables(scope).map(|t| t.map(false, unprotected_only))
    }

    /// The whole versioned table of a scope.
    pub fn get_all_dependencies_ssa(
        &self,
        scope: Scope,
        unprotected_only: bool,
    ) -> Option<&DepMap> {
        self.tables(scope).map(|t| t.map(true, unprotected_only))
    }

    /// Snapshot of a scope's table sizes, for report output.
    pub fn summary(&self, scope: Scope) -> Option<TableSummary> {
        let tables = self.tables(scope)?;
        Some(TableSummary {
            scope,
            keys: tables.ssa.len(),
            edges: tables.edge_count(true, false),
            unprotected_edges: tables.edge_count(true, true),
            taint_roots: self.taint_roots().len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::models::{Function, Operation, Program, Visibility};

    fn single_function_program() -> (Program, crate::shared::models::ContractId, ValueId, ValueId, ValueId)
    {
        // y = x; z = y + 1
        let mut program = Program::new();
        let c = program.add_contract("C");
        let x = program.arena_mut().local("x");
        let x1 = program.arena_mut().version(x, 1);
        let y = program.arena_mut().local("y");
        let y1 = program.arena_mut().version(y, 1);
        let z = program.arena_mut().local("z");
        let z1 = program.arena_mut().version(z, 1);
        let one = program.arena_mut().constant("1");

        let mut f = Function::new("f", Visibility::Public);
        f.operations.push(Operation::assign(y1, vec![x1]));
        f.operations.push(Operation::assign(z1, vec![y1, one]));
        program.add_function(c, f);
        (program, c, x, y, z)
    }

    #[test]
    fn dependency_queries_are_reflexive_for_non_constants() {
        let (program, c, x, _, _) = single_function_program();
        let engine = DependencyEngine::compute(&program).unwrap();
        assert!(engine.is_dependent(x, x, Scope::Contract(c), false));
    }

    #[test]
    fn constants_are_never_dependent_or_tainted() {
        let (mut program, c, x, _, _) = single_function_program();
        let k = program.arena_mut().constant("42");
        let engine = DependencyEngine::compute(&program).unwrap();
        let scope = Scope::Contract(c);
        assert!(!engine.is_dependent(k, x, scope, false));
        assert!(!engine.is_dependent(k, k, scope, false));
        assert!(!engine.is_dependent(x, k, scope, false));
        assert!(!engine.is_tainted(k, scope, false));
    }

    #[test]
    fn closed_chain_is_visible_through_get_dependencies() {
        let (program, c, x, y, z) = single_function_program();
        let engine = DependencyEngine::compute(&program).unwrap();
        let scope = Scope::Contract(c);

        let z_deps = engine.get_dependencies(z, scope, false);
        assert!(z_deps.contains(&y) && z_deps.contains(&x));
        let y_deps = engine.get_dependencies(y, scope, false);
        assert!(y_deps.contains(&x) && !y_deps.contains(&z));
    }

    #[test]
    fn unknown_scope_yields_empty_answers() {
        let (program, _, x, y, _) = single_function_program();
        let engine = DependencyEngine::compute(&program).unwrap();
        let ghost = Scope::Function(crate::shared::models::FunctionId(77));
        assert!(engine.get_dependencies(y, ghost, false).is_empty());
        assert!(engine.get_all_dependencies(ghost, false).is_none());
        // Reflexivity still holds: equality does not consult a table.
        assert!(engine.is_dependent(x, x, ghost, false));
    }

    #[test]
    fn summary_serializes_for_reports() {
        let (program, c, _, _, _) = single_function_program();
        let engine = DependencyEngine::compute(&program).unwrap();
        let summary = engine.summary(Scope::Contract(c)).unwrap();
        assert!(summary.edges >= summary.unprotected_edges);
        assert!(summary.keys > 0);
    }
}
