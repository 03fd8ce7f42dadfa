/*
 * Local dependency collector
 *
 * Scans one function's versioned operations in program order and records
 * one-hop depends-on edges:
 * - generic writes depend on their declared reads;
 * - indexed-access writes depend only on the aliased base, never the index;
 * - internal-call results depend on the callee's own versioned returns;
 * - writes through an alias are additionally attributed to the aliased
 *   target, and storage-bound local aliases are never recorded directly.
 *
 * Constants never appear as dependency sources. Edges go into the all-paths
 * table always, and into the unprotected-only table iff the function is not
 * access-gated.
 */

use tracing::trace;

use super::super::domain::tables::DepMap;
use crate::shared::models::{FunctionId, OperationKind, Program, Result, ValueId, ValueKind};

/// Collect the raw (one-hop) versioned tables of one function:
/// `(all_paths, unprotected_only)`.
pub fn collect_function(program: &Program, id: FunctionId) -> Result<(DepMap, DepMap)> {
    let function = program.function(id)?;
    let arena = program.arena();
    let gated = function.protected;

    let mut all_paths = DepMap::default();
    let mut unprotected = DepMap::default();

    for op in &function.operations {
        let Some(dest) = op.dest else { continue };

        let sources: Vec<ValueId> = match &op.kind {
            OperationKind::Assign { reads } => reads.clone(),
            OperationKind::IndexAccess { base, .. } => vec![*base],
            OperationKind::InternalCall { callee, .. } => {
                program.function(*callee)?.returns.clone()
            }
        };
        let sources: Vec<ValueId> = sources
            .into_iter()
            .filter(|&s| !arena.is_constant(s))
            .collect();
        if sources.is_empty() {
            continue;
        }

        let mut record_dest = true;
        if let ValueKind::Reference {
            points_to,
            storage_bound,
            ..
        } = arena.resolve(dest)?.kind
        {
            // A write through an alias is attributed to the aliased target.
            // An indexed access whose source set is the target itself would
            // record a useless self-edge, so the target is filtered out.
            if let Some(target) = points_to {
                let attributed: Vec<ValueId> =
                    sources.iter().copied().filter(|&s| s != target).collect();
                if !attributed.is_empty() {
                    record(&mut all_paths, target, &attributed);
                    if !gated {
                        record(&mut unprotected, target, &attributed);
                    }
                }
            }
            // A local alias bound to persistent state has no independent
            // existence; its effect is the points-to edge alone.
            if storage_bound {
                record_dest = false;
            }
        }

        if record_dest {
            record(&mut all_paths, dest, &sources);
            if !gated {
                record(&mut unprotected, dest, &sources);
            }
        }
    }

    trace!(
        function = %function.name,
        keys = all_paths.len(),
        gated,
        "collected one-hop dependency edges"
    );
    Ok((all_paths, unprotected))
}

fn record(table: &mut DepMap, dest: ValueId, sources: &[ValueId]) {
    table
        .entry(dest)
        .or_default()
        .extend(sources.iter().copied());
}
