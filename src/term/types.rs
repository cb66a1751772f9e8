//! Subtype lattice for optionally typed terms
//!
//! A term may carry a type drawn from a finite lattice with a top type
//! `universal` (supertype of everything) and a bottom type `absurd` (subtype
//! of everything). Terms without a type opt out of all type checking.
//!
//! The lattice is an ordinary value passed into unification and type-safe
//! substitution construction; there is no process-wide type registry.

use indexmap::IndexSet;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// ID for a type in a [`TypeLattice`]
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeId(u32);

impl TypeId {
    /// Get the raw ID value
    pub fn as_u32(self) -> u32 {
        self.0
    }
}

impl fmt::Display for TypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T{}", self.0)
    }
}

impl Serialize for TypeId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.0.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for TypeId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        u32::deserialize(deserializer).map(TypeId)
    }
}

/// A finite subtype lattice
///
/// Built once by registering named types and direct subtype edges, then
/// queried immutably. `universal` and `absurd` exist in every lattice and
/// need no explicit edges.
#[derive(Debug, Clone)]
pub struct TypeLattice {
    names: IndexSet<String>,
    /// Direct supertypes per type, indexed by TypeId
    supers: Vec<Vec<TypeId>>,
}

impl TypeLattice {
    /// Create a lattice containing only `universal` and `absurd`
    pub fn new() -> Self {
        let mut names = IndexSet::new();
        names.insert("universal".to_string());
        names.insert("absurd".to_string());
        TypeLattice {
            names,
            supers: vec![Vec::new(), Vec::new()],
        }
    }

    /// The top type: every type is a subtype of it
    pub fn universal(&self) -> TypeId {
        TypeId(0)
    }

    /// The bottom type: subtype of every type
    pub fn absurd(&self) -> TypeId {
        TypeId(1)
    }

    /// Register a named type (get-or-create)
    pub fn add_type(&mut self, name: &str) -> TypeId {
        if let Some(idx) = self.names.get_index_of(name) {
            return TypeId(idx as u32);
        }
        let (idx, _) = self.names.insert_full(name.to_string());
        self.supers.push(Vec::new());
        TypeId(idx as u32)
    }

    /// Declare `sub` a direct subtype of `sup`
    pub fn add_subtype(&mut self, sub: TypeId, sup: TypeId) {
        let edges = &mut self.supers[sub.0 as usize];
        if !edges.contains(&sup) {
            edges.push(sup);
        }
    }

    /// Resolve a type ID to its name
    pub fn resolve(&self, id: TypeId) -> &str {
        self.names
            .get_index(id.0 as usize)
            .map(String::as_str)
            .expect("type id minted by a different lattice")
    }

    /// Get the ID of an already-registered type
    pub fn get(&self, name: &str) -> Option<TypeId> {
        self.names.get_index_of(name).map(|idx| TypeId(idx as u32))
    }

    /// Number of registered types, including `universal` and `absurd`
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// True if only `universal` and `absurd` are registered
    pub fn is_empty(&self) -> bool {
        self.names.len() == 2
    }

    /// Reflexive-transitive subtype test: is `sub` a subtype of `sup`?
    pub fn is_subtype(&self, sub: TypeId, sup: TypeId) -> bool {
        if sub == sup || sub == self.absurd() || sup == self.universal() {
            return true;
        }
        // DFS over declared supertype edges
        let mut visited = vec![false; self.supers.len()];
        let mut stack = vec![sub];
        while let Some(t) = stack.pop() {
            if t == sup {
                return true;
            }
            let idx = t.0 as usize;
            if visited[idx] {
                continue;
            }
            visited[idx] = true;
            stack.extend(self.supers[idx].iter().copied());
        }
        false
    }

    /// Greatest common subtype of `a` and `b`
    ///
    /// Falls back to `absurd` when the declared edges admit no larger common
    /// subtype, so the result is total.
    pub fn infimum(&self, a: TypeId, b: TypeId) -> TypeId {
        if self.is_subtype(a, b) {
            return a;
        }
        if self.is_subtype(b, a) {
            return b;
        }
        let candidates: Vec<TypeId> = (0..self.supers.len() as u32)
            .map(TypeId)
            .filter(|&t| self.is_subtype(t, a) && self.is_subtype(t, b))
            .collect();
        // The greatest candidate is the one every other candidate sits below.
        for &c in &candidates {
            if candidates.iter().all(|&d| self.is_subtype(d, c)) {
                return c;
            }
        }
        self.absurd()
    }
}

impl Default for TypeLattice {
    fn default() -> Self {
        TypeLattice::new()
    }
}
