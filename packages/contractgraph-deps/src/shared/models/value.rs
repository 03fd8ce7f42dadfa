/*
 * Value identity model
 *
 * Every value the engine touches lives in a `ValueArena` and is addressed by a
 * stable integer id. Worklists, dependency tables, and explored sets operate
 * on `ValueId`, never on object identity.
 *
 * Two families of kinds:
 * - Versioned kinds (single-assignment occurrences, alias references) carry a
 *   required back-reference to their canonical identity.
 * - Canonical kinds (source-level variables, constants, environment symbols,
 *   declared types, user-defined entities) are their own identity.
 */

use serde::Serialize;

use super::error::{DependencyError, Result};
use super::program::FunctionId;

/// Stable integer identifier of a value: an index into the [`ValueArena`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct ValueId(pub u32);

/// The fixed environment pseudo-values treated as externally controlled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum EnvSymbol {
    /// Caller address (`msg.sender`)
    Sender,
    /// Attached call value (`msg.value`)
    Value,
    /// Raw call data (`msg.data`)
    Data,
    /// Transaction origin (`tx.origin`)
    Origin,
}

impl EnvSymbol {
    pub const ALL: [EnvSymbol; 4] = [
        EnvSymbol::Sender,
        EnvSymbol::Value,
        EnvSymbol::Data,
        EnvSymbol::Origin,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            EnvSymbol::Sender => "msg.sender",
            EnvSymbol::Value => "msg.value",
            EnvSymbol::Data => "msg.data",
            EnvSymbol::Origin => "tx.origin",
        }
    }
}

/// Expression-companion link for values produced by call expressions.
///
/// Lets the interprocedural resolver recover "this value's source was a call
/// to X" without walking the operation stream again. The resolver walks
/// canonical ids only, so frontends attach the link to the canonical identity
/// of a call result; a link left on a versioned occurrence is never consulted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallOrigin {
    /// Direct reference to a function in the same program.
    Internal(FunctionId),
    /// Member access on a typed contract-reference expression. The receiver
    /// type may be an interface, resolved to an implementer at query time.
    External {
        receiver_type: String,
        member: String,
    },
}

/// Kind of a value. The set is closed: every value the SSA builder can emit
/// maps onto exactly one variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValueKind {
    /// One single-assignment occurrence of a source-level variable, including
    /// parameter versions, return versions, merge (phi) values, and
    /// temporaries. The back-reference is required and must point at a
    /// non-versioned kind.
    Versioned { canonical: ValueId, version: u32 },

    /// A reference-like value aliasing a storage slot. `points_to` is the
    /// underlying aliased target; `storage_bound` marks a local alias
    /// permanently bound to persistent state, which has no independent
    /// existence in the dependency tables.
    Reference {
        canonical: ValueId,
        points_to: Option<ValueId>,
        storage_bound: bool,
    },

    /// Canonical local variable (includes declared parameters).
    Local,
    /// Canonical persistent-state variable.
    State,
    /// Literal constant. Never a dependency source.
    Constant,
    /// Environment pseudo-value.
    Environment(EnvSymbol),
    /// Declared type name.
    TypeName,
    /// Reference to a function entity.
    FunctionRef(FunctionId),
    /// User-defined enum entity.
    EnumRef,
    /// User-defined structure entity.
    StructRef,
}

impl ValueKind {
    /// Whether this kind carries a version (and therefore a back-reference).
    pub fn is_versioned(&self) -> bool {
        matches!(
            self,
            ValueKind::Versioned { .. } | ValueKind::Reference { .. }
        )
    }
}

/// A value in the analyzed program.
#[derive(Debug, Clone)]
pub struct Value {
    pub name: String,
    pub kind: ValueKind,
    /// Set when this value is the result of a call expression. Meaningful on
    /// canonical identities; see [`CallOrigin`].
    pub origin: Option<CallOrigin>,
}

impl Value {
    pub fn new(name: impl Into<String>, kind: ValueKind) -> Self {
        Self {
            name: name.into(),
            kind,
            origin: None,
        }
    }
}

/// Append-only store of values. The four environment pseudo-values are
/// interned at construction so every program shares one id per symbol.
#[derive(Debug, Clone)]
pub struct ValueArena {
    values: Vec<Value>,
    env: [ValueId; 4],
}

impl ValueArena {
    pub fn new() -> Self {
        let mut arena = Self {
            values: Vec::new(),
            env: [ValueId(0); 4],
        };
        for (slot, sym) in EnvSymbol::ALL.into_iter().enumerate() {
            let id = arena.push(Value::new(sym.name(), ValueKind::Environment(sym)));
            arena.env[slot] = id;
        }
        arena
    }

    pub fn push(&mut self, value: Value) -> ValueId {
        let id = ValueId(self.values.len() as u32);
        self.values.push(value);
        id
    }

    pub fn get(&self, id: ValueId) -> Option<&Value> {
        self.values.get(id.0 as usize)
    }

    /// Fallible lookup; a dangling id is a modeling defect.
    pub fn resolve(&self, id: ValueId) -> Result<&Value> {
        self.get(id).ok_or(DependencyError::MissingValue(id))
    }

    /// Interned id of an environment pseudo-value.
    pub fn environment(&self, sym: EnvSymbol) -> ValueId {
        self.env[sym as usize]
    }

    /// Interned ids of all four environment pseudo-values.
    pub fn environment_ids(&self) -> [ValueId; 4] {
        self.env
    }

    pub fn is_constant(&self, id: ValueId) -> bool {
        matches!(self.get(id).map(|v| &v.kind), Some(ValueKind::Constant))
    }

    pub fn is_environment(&self, id: ValueId) -> bool {
        matches!(
            self.get(id).map(|v| &v.kind),
            Some(ValueKind::Environment(_))
        )
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Attach a call-origin link to an existing value. Pass the canonical
    /// identity of the call result: only canonical origins drive
    /// interprocedural expansion.
    pub fn set_origin(&mut self, id: ValueId, origin: CallOrigin) {
        if let Some(value) = self.values.get_mut(id.0 as usize) {
            value.origin = Some(origin);
        }
    }

    // Convenience constructors used by frontends and tests.

    pub fn local(&mut self, name: impl Into<String>) -> ValueId {
        self.push(Value::new(name, ValueKind::Local))
    }

    pub fn state(&mut self, name: impl Into<String>) -> ValueId {
        self.push(Value::new(name, ValueKind::State))
    }

    pub fn constant(&mut self, literal: impl Into<String>) -> ValueId {
        self.push(Value::new(literal, ValueKind::Constant))
    }

    /// New SSA occurrence of `canonical`, named after it.
    pub fn version(&mut self, canonical: ValueId, version: u32) -> ValueId {
        let base = self
            .get(canonical)
            .map(|v| v.name.clone())
            .unwrap_or_default();
        self.push(Value::new(
            format!("{base}_{version}"),
            ValueKind::Versioned { canonical, version },
        ))
    }

    pub fn reference(
        &mut self,
        name: impl Into<String>,
        canonical: ValueId,
        points_to: Option<ValueId>,
        storage_bound: bool,
    ) -> ValueId {
        self.push(Value::new(
            name,
            ValueKind::Reference {
                canonical,
                points_to,
                storage_bound,
            },
        ))
    }
}

impl Default for ValueArena {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn environment_values_are_interned_once() {
        let arena = ValueArena::new();
        assert_eq!(arena.len(), 4);
        let sender = arena.environment(EnvSymbol::Sender);
        assert_eq!(sender, arena.environment(EnvSymbol::Sender));
        assert!(arena.is_environment(sender));
        assert_eq!(arena.resolve(sender).unwrap().name, "msg.sender");
    }

    #[test]
    fn version_derives_name_from_canonical() {
        let mut arena = ValueArena::new();
        let balance = arena.state("balance");
        let v1 = arena.version(balance, 1);
        assert_eq!(arena.resolve(v1).unwrap().name, "balance_1");
        assert!(arena.resolve(v1).unwrap().kind.is_versioned());
        assert!(!arena.resolve(balance).unwrap().kind.is_versioned());
    }

    #[test]
    fn constants_are_recognized() {
        let mut arena = ValueArena::new();
        let one = arena.constant("1");
        let x = arena.local("x");
        assert!(arena.is_constant(one));
        assert!(!arena.is_constant(x));
    }

    #[test]
    fn dangling_id_is_a_modeling_defect() {
        let arena = ValueArena::new();
        let err = arena.resolve(ValueId(999)).unwrap_err();
        assert_eq!(err, DependencyError::MissingValue(ValueId(999)));
    }
}
