/*
 * Interprocedural call-return resolver
 *
 * Lazily invoked, non-memoized breadth-first extension of a value's closed
 * dependency set across call boundaries. A dequeued value whose origin is a
 * call expression pulls in the callee's return values and everything those
 * returns already depend on in the callee's own closed table. Unresolvable
 * targets (abstract functions, interfaces without an implementer) are dead
 * ends, never failures. The explored-set check keeps mutually recursive call
 * chains from reprocessing.
 */

use std::collections::VecDeque;

use tracing::trace;

use super::super::domain::canonical::{canonical_or_self, canonicalize};
use super::super::domain::tables::DepSet;
use super::super::domain::Scope;
use super::aggregator::DependencyEngine;
use crate::shared::models::{CallOrigin, FunctionId, Program, ValueId};

/// Full transitive closure of `value`'s dependencies in `scope`, extended
/// across function and contract boundaries via callee return values.
pub fn resolve_recursive(
    engine: &DependencyEngine<'_>,
    value: ValueId,
    scope: Scope,
    unprotected_only: bool,
) -> DepSet {
    let program = engine.program();
    let arena = program.arena();

    let mut explored = DepSet::default();
    let mut worklist: VecDeque<ValueId> = direct_canonical_deps(engine, value, scope, unprotected_only)
        .into_iter()
        .collect();

    while let Some(current) = worklist.pop_front() {
        if !explored.insert(current) {
            continue;
        }
        // Environment pseudo-values are opaque: part of the result, never
        // expanded.
        if arena.is_environment(current) {
            continue;
        }
        let Some(origin) = arena.get(current).and_then(|v| v.origin.as_ref()) else {
            continue;
        };
        let Some(callee_id) = resolve_call_target(program, origin) else {
            trace!(value = ?current, "call target unresolved, stopping expansion");
            continue;
        };
        let Some(callee) = program.get_function(callee_id) else {
            continue;
        };
        if !callee.has_body || callee.returns.is_empty() {
            continue;
        }

        // Read the callee's own closed table: contract-wide when the query
        // scope was a contract, else the callee's function-level table.
        let callee_scope = match scope {
            Scope::Contract(_) => Scope::Contract(callee.contract),
            Scope::Function(_) => Scope::Function(callee_id),
        };
        for &ret in &callee.returns {
            let Ok(ret_canonical) = canonicalize(arena, ret) else {
                continue;
            };
            if !explored.contains(&ret_canonical) {
                worklist.push_back(ret_canonical);
            }
            for dep in direct_canonical_deps(engine, ret_canonical, callee_scope, unprotected_only)
            {
                if !explored.contains(&dep) {
                    worklist.push_back(dep);
                }
            }
        }
    }

    explored
}

/// A value's direct entry in the scope's closed canonical table.
fn direct_canonical_deps(
    engine: &DependencyEngine<'_>,
    value: ValueId,
    scope: Scope,
    unprotected_only: bool,
) -> Vec<ValueId> {
    let arena = engine.program().arena();
    let key = canonical_or_self(arena, value);
    engine
        .tables(scope)
        .and_then(|t| t.dependencies(key, false, unprotected_only))
        .map(|deps| deps.iter().copied().collect())
        .unwrap_or_default()
}

fn resolve_call_target(program: &Program, origin: &CallOrigin) -> Option<FunctionId> {
    match origin {
        CallOrigin::Internal(fid) => Some(*fid),
        CallOrigin::External {
            receiver_type,
            member,
        } => {
            let cid = program.contract_by_name(receiver_type)?;
            if program.get_contract(cid)?.is_interface {
                program.resolve_interface_member(cid, member)
            } else {
                program.contract_member(cid, member)
            }
        }
    }
}
