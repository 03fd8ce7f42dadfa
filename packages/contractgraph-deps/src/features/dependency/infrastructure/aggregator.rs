/*
 * Dependency engine: per-function memoization and contract-level aggregation
 *
 * A function's record is built once: collect one-hop edges, close both policy
 * variants, project canonically. A contract's record is the union of its
 * functions' closed versioned tables, re-closed. The second closure is not
 * redundant: internal-call return linkage only resolves fully once every
 * function's chain sits in one shared table.
 *
 * While visiting functions, entry-point parameters (versioned and canonical)
 * seed the program-wide taint-root set.
 *
 * All records are write-once: populated during `compute`, immutable and
 * freely shareable afterwards.
 */

use rayon::prelude::*;
use rustc_hash::FxHashMap;
use tracing::debug;

use super::super::domain::canonical::{canonicalize, canonicalize_table};
use super::super::domain::tables::{merge_into, DepMap, DepSet, DependencyTables};
use super::super::domain::Scope;
use super::closure::close;
use super::collector::collect_function;
use crate::shared::models::{ContractId, FunctionId, Program, Result};

/// Computed dependency state of a whole program.
///
/// Created by [`DependencyEngine::compute`]; every query reads finished,
/// immutable tables.
#[derive(Debug)]
pub struct DependencyEngine<'p> {
    program: &'p Program,
    functions: FxHashMap<FunctionId, DependencyTables>,
    contracts: FxHashMap<ContractId, DependencyTables>,
    /// Declared-parameter taint roots of all entry points, in both versioned
    /// and canonical form. Environment pseudo-roots are folded in per query.
    taint_roots: DepSet,
}

impl<'p> DependencyEngine<'p> {
    /// Batch entry point: compute every contract of the program.
    pub fn compute(program: &'p Program) -> Result<Self> {
        let mut engine = Self {
            program,
            functions: FxHashMap::default(),
            contracts: FxHashMap::default(),
            taint_roots: DepSet::default(),
        };
        for cid in program.contract_ids().collect::<Vec<_>>() {
            engine.compute_contract(cid)?;
        }
        debug!(
            contracts = engine.contracts.len(),
            functions = engine.functions.len(),
            taint_roots = engine.taint_roots.len(),
            "dependency computation finished"
        );
        Ok(engine)
    }

    pub fn program(&self) -> &'p Program {
        self.program
    }

    /// Finished record of a scope, if that scope was part of the program.
    pub fn tables(&self, scope: Scope) -> Option<&DependencyTables> {
        match scope {
            Scope::Function(id) => self.functions.get(&id),
            Scope::Contract(id) => self.contracts.get(&id),
        }
    }

    /// Declared-parameter taint roots (versioned and canonical forms).
    pub fn taint_roots(&self) -> &DepSet {
        &self.taint_roots
    }

    /// Aggregate one contract. Idempotent: contracts reached through several
    /// dependents are computed exactly once.
    fn compute_contract(&mut self, cid: ContractId) -> Result<()> {
        if self.contracts.contains_key(&cid) {
            return Ok(());
        }
        let program = self.program;
        let function_ids = program.functions_of(cid)?;

        // First pass: per-function records. Functions are independent here,
        // so the batch runs in parallel; results land in the memo map before
        // anything reads them.
        let missing: Vec<FunctionId> = function_ids
            .iter()
            .copied()
            .filter(|fid| !self.functions.contains_key(fid))
            .collect();
        let built: Vec<(FunctionId, DependencyTables)> = missing
            .par_iter()
            .map(|&fid| build_function_tables(program, fid).map(|t| (fid, t)))
            .collect::<Result<_>>()?;
        self.functions.extend(built);

        // Merge the closed versioned tables contract-wide, seeding taint
        // roots from entry-point parameters along the way.
        let mut ssa = DepMap::default();
        let mut ssa_unprotected = DepMap::default();
        for fid in &function_ids {
            let record = &self.functions[fid];
            merge_into(&mut ssa, &record.ssa);
            merge_into(&mut ssa_unprotected, &record.ssa_unprotected);

            let function = program.function(*fid)?;
            if function.visibility.is_entry_point() {
                for &param in &function.parameters {
                    self.taint_roots.insert(param);
                    self.taint_roots
                        .insert(canonicalize(program.arena(), param)?);
                }
            }
        }

        // Second closure across function boundaries.
        close(&mut ssa);
        close(&mut ssa_unprotected);
        let canonical = canonicalize_table(program.arena(), &ssa)?;
        let canonical_unprotected = canonicalize_table(program.arena(), &ssa_unprotected)?;

        debug!(
            contract = %program.contract(cid)?.name,
            functions = function_ids.len(),
            keys = ssa.len(),
            "aggregated contract dependency tables"
        );
        self.contracts.insert(
            cid,
            DependencyTables {
                ssa,
                ssa_unprotected,
                canonical,
                canonical_unprotected,
            },
        );
        Ok(())
    }
}

/// Build one function's complete record: collect, close both policies,
/// project canonically.
fn build_function_tables(program: &Program, fid: FunctionId) -> Result<DependencyTables> {
    let (mut ssa, mut ssa_unprotected) = collect_function(program, fid)?;
    close(&mut ssa);
    close(&mut ssa_unprotected);
    let canonical = canonicalize_table(program.arena(), &ssa)?;
    let canonical_unprotected = canonicalize_table(program.arena(), &ssa_unprotected)?;
    Ok(DependencyTables {
        ssa,
        ssa_unprotected,
        canonical,
        canonical_unprotected,
    })
}
