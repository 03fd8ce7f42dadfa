/*
 * SSA program representation consumed by the dependency engine
 *
 * The engine does not build this model; an external frontend (parser, CFG and
 * SSA builders, access-control classifier) produces it. Operations expose a
 * destination and a read-operand set, with two shapes the collector must
 * distinguish: indexed-access writes (base and index exposed separately) and
 * internal calls (resolved callee exposed, returns looked up on it).
 *
 * Modifiers are modeled as ordinary functions of their contract; their
 * operations participate in collection like any other body.
 */

use rustc_hash::FxHashSet;
use serde::Serialize;

use super::error::{DependencyError, Result};
use super::value::{ValueArena, ValueId};

/// Stable integer identifier of a function (or modifier).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct FunctionId(pub u32);

/// Stable integer identifier of a contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct ContractId(pub u32);

/// One versioned operation of a function body, in program order.
#[derive(Debug, Clone)]
pub struct Operation {
    /// Destination value written by this operation, if any.
    pub dest: Option<ValueId>,
    pub kind: OperationKind,
}

#[derive(Debug, Clone)]
pub enum OperationKind {
    /// Generic write with a declared read-operand set. Covers assignments,
    /// arithmetic, and merge (phi) values.
    Assign { reads: Vec<ValueId> },

    /// Indexed-access write shape: `dest` is a reference into `base[index]`.
    /// Only the base contributes a dependency edge; the index does not.
    IndexAccess { base: ValueId, index: ValueId },

    /// Internal call. The call result depends on the callee's own versioned
    /// return values, not on a call-site-specific copy: every call site to
    /// the same callee shares one dependency chain.
    InternalCall {
        callee: FunctionId,
        arguments: Vec<ValueId>,
    },
}

impl Operation {
    pub fn assign(dest: ValueId, reads: Vec<ValueId>) -> Self {
        Self {
            dest: Some(dest),
            kind: OperationKind::Assign { reads },
        }
    }

    pub fn index_access(dest: ValueId, base: ValueId, index: ValueId) -> Self {
        Self {
            dest: Some(dest),
            kind: OperationKind::IndexAccess { base, index },
        }
    }

    pub fn internal_call(dest: Option<ValueId>, callee: FunctionId, arguments: Vec<ValueId>) -> Self {
        Self {
            dest,
            kind: OperationKind::InternalCall { callee, arguments },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Visibility {
    Public,
    External,
    Internal,
    Private,
}

impl Visibility {
    /// Whether a function with this visibility is a program entry point.
    pub fn is_entry_point(&self) -> bool {
        matches!(self, Visibility::Public | Visibility::External)
    }
}

/// A function or modifier in SSA form.
#[derive(Debug, Clone)]
pub struct Function {
    pub name: String,
    pub contract: ContractId,
    pub visibility: Visibility,
    /// Externally supplied access-control classification: true when the
    /// function is reachable only through an access-control gate.
    pub protected: bool,
    /// Versioned parameter values (initial versions).
    pub parameters: Vec<ValueId>,
    /// Versioned return values.
    pub returns: Vec<ValueId>,
    pub operations: Vec<Operation>,
    /// False for abstract functions; bodiless callees stop interprocedural
    /// expansion instead of failing it.
    pub has_body: bool,
}

impl Function {
    pub fn new(name: impl Into<String>, visibility: Visibility) -> Self {
        Self {
            name: name.into(),
            contract: ContractId(0),
            visibility,
            protected: false,
            parameters: Vec::new(),
            returns: Vec::new(),
            operations: Vec::new(),
            has_body: true,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Contract {
    pub name: String,
    /// Declared functions and modifiers, in declaration order.
    pub functions: Vec<FunctionId>,
    /// Direct bases.
    pub inherits: Vec<ContractId>,
    pub is_interface: bool,
}

/// A whole analyzed program: value arena plus contracts and functions.
///
/// Also provides the type/inheritance resolution capability the
/// interprocedural resolver consumes: member lookup through the inheritance
/// chain and interface-to-implementer search.
#[derive(Debug, Clone, Default)]
pub struct Program {
    arena: ValueArena,
    functions: Vec<Function>,
    contracts: Vec<Contract>,
}

impl Program {
    pub fn new() -> Self {
        Self {
            arena: ValueArena::new(),
            functions: Vec::new(),
            contracts: Vec::new(),
        }
    }

    pub fn arena(&self) -> &ValueArena {
        &self.arena
    }

    pub fn arena_mut(&mut self) -> &mut ValueArena {
        &mut self.arena
    }

    pub fn add_contract(&mut self, name: impl Into<String>) -> ContractId {
        let id = ContractId(self.contracts.len() as u32);
        self.contracts.push(Contract {
            name: name.into(),
            functions: Vec::new(),
            inherits: Vec::new(),
            is_interface: false,
        });
        id
    }

    pub fn add_interface(&mut self, name: impl Into<String>) -> ContractId {
        let id = self.add_contract(name);
        self.contracts[id.0 as usize].is_interface = true;
        id
    }

    pub fn add_inherit(&mut self, derived: ContractId, base: ContractId) {
        if let Some(contract) = self.contracts.get_mut(derived.0 as usize) {
            contract.inherits.push(base);
        }
    }

    /// Register a function under `contract`, fixing up its back-reference.
    pub fn add_function(&mut self, contract: ContractId, mut function: Function) -> FunctionId {
        let id = FunctionId(self.functions.len() as u32);
        function.contract = contract;
        self.functions.push(function);
        if let Some(owner) = self.contracts.get_mut(contract.0 as usize) {
            owner.functions.push(id);
        }
        id
    }

    pub fn get_function(&self, id: FunctionId) -> Option<&Function> {
        self.functions.get(id.0 as usize)
    }

    pub fn function(&self, id: FunctionId) -> Result<&Function> {
        self.get_function(id)
            .ok_or(DependencyError::MissingFunction(id))
    }

    pub fn get_contract(&self, id: ContractId) -> Option<&Contract> {
        self.contracts.get(id.0 as usize)
    }

    pub fn contract(&self, id: ContractId) -> Result<&Contract> {
        self.get_contract(id)
            .ok_or(DependencyError::MissingContract(id))
    }

    pub fn contract_ids(&self) -> impl Iterator<Item = ContractId> + '_ {
        (0..self.contracts.len() as u32).map(ContractId)
    }

    pub fn contract_by_name(&self, name: &str) -> Option<ContractId> {
        self.contracts
            .iter()
            .position(|c| c.name == name)
            .map(|i| ContractId(i as u32))
    }

    /// Functions and modifiers visible on a contract: declared ones first,
    /// then inherited ones not shadowed by name.
    pub fn functions_of(&self, id: ContractId) -> Result<Vec<FunctionId>> {
        let mut out = Vec::new();
        let mut seen_names: FxHashSet<String> = FxHashSet::default();
        let mut visited: FxHashSet<ContractId> = FxHashSet::default();
        let mut stack = vec![id];
        while let Some(cid) = stack.pop() {
            if !visited.insert(cid) {
                continue;
            }
            let contract = self.contract(cid)?;
            for &fid in &contract.functions {
                let function = self.function(fid)?;
                if seen_names.insert(function.name.clone()) {
                    out.push(fid);
                }
            }
            stack.extend(contract.inherits.iter().copied());
        }
        Ok(out)
    }

    /// Member lookup through the inheritance chain.
    pub fn contract_member(&self, id: ContractId, name: &str) -> Option<FunctionId> {
        self.functions_of(id)
            .ok()?
            .into_iter()
            .find(|&fid| self.get_function(fid).map(|f| f.name == name).unwrap_or(false))
    }

    /// Whether `derived` transitively inherits `base`.
    pub fn inherits_from(&self, derived: ContractId, base: ContractId) -> bool {
        let mut visited: FxHashSet<ContractId> = FxHashSet::default();
        let mut stack = vec![derived];
        while let Some(cid) = stack.pop() {
            if !visited.insert(cid) {
                continue;
            }
            if cid == base && cid != derived {
                return true;
            }
            if let Some(contract) = self.get_contract(cid) {
                stack.extend(contract.inherits.iter().copied());
            }
        }
        false
    }

    /// Resolve a member call on an interface type: scan for a concrete
    /// contract that inherits the interface and provides the member. An
    /// ambiguous or missing implementer yields `None` (dead end, not an
    /// error).
    pub fn resolve_interface_member(
        &self,
        interface: ContractId,
        member: &str,
    ) -> Option<FunctionId> {
        self.contract_ids()
            .filter(|&cid| {
                self.get_contract(cid)
                    .map(|c| !c.is_interface)
                    .unwrap_or(false)
                    && self.inherits_from(cid, interface)
            })
            .find_map(|cid| self.contract_member(cid, member))
    }
}
