//! Symbol interning for efficient comparison of term symbols
//!
//! Atomic terms and variables carry interned IDs instead of owned strings:
//! comparison and hashing are O(1) on a `u32`, and cloning a term never
//! touches the heap for its symbols. Each symbol kind has its own ID type so
//! a variable ID can never be confused with an atom ID.
//!
//! The interner is passed through explicitly wherever names are needed; there
//! is no global symbol table.

use indexmap::IndexSet;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// ID for an interned variable name
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VariableId(pub(crate) u32);

/// ID for an interned atom name (non-variable atomic symbols, including
/// compositor symbols such as `+` or `f`)
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AtomId(pub(crate) u32);

impl VariableId {
    /// Get the raw ID value
    pub fn as_u32(self) -> u32 {
        self.0
    }

    /// Create a VariableId from a raw u32 (for tests and external builders)
    pub fn from_raw(id: u32) -> Self {
        VariableId(id)
    }
}

impl AtomId {
    /// Get the raw ID value
    pub fn as_u32(self) -> u32 {
        self.0
    }

    /// Create an AtomId from a raw u32 (for tests and external builders)
    pub fn from_raw(id: u32) -> Self {
        AtomId(id)
    }
}

/// Insertion-ordered string arena for one symbol kind
#[derive(Debug, Clone, Default)]
struct StringArena {
    names: IndexSet<String>,
}

impl StringArena {
    fn intern(&mut self, name: &str) -> u32 {
        if let Some(idx) = self.names.get_index_of(name) {
            return idx as u32;
        }
        let (idx, _) = self.names.insert_full(name.to_string());
        idx as u32
    }

    fn resolve(&self, id: u32) -> &str {
        self.names
            .get_index(id as usize)
            .map(String::as_str)
            .expect("symbol id minted by a different interner")
    }

    fn get(&self, name: &str) -> Option<u32> {
        self.names.get_index_of(name).map(|idx| idx as u32)
    }

    fn len(&self) -> usize {
        self.names.len()
    }
}

/// Symbol interner for the term model
///
/// Variables and atoms live in separate namespaces: `x` the variable and
/// `x` the atom intern to unrelated IDs.
#[derive(Debug, Clone, Default)]
pub struct Interner {
    variables: StringArena,
    atoms: StringArena,
}

impl Interner {
    /// Create a new empty interner
    pub fn new() -> Self {
        Interner::default()
    }

    /// Intern a variable name, returning its ID (get-or-create)
    pub fn intern_variable(&mut self, name: &str) -> VariableId {
        VariableId(self.variables.intern(name))
    }

    /// Resolve a variable ID to its name
    pub fn resolve_variable(&self, id: VariableId) -> &str {
        self.variables.resolve(id.0)
    }

    /// Get the ID of an already-interned variable
    pub fn get_variable(&self, name: &str) -> Option<VariableId> {
        self.variables.get(name).map(VariableId)
    }

    /// Number of interned variables
    pub fn variable_count(&self) -> usize {
        self.variables.len()
    }

    /// Intern an atom name, returning its ID (get-or-create)
    pub fn intern_atom(&mut self, name: &str) -> AtomId {
        AtomId(self.atoms.intern(name))
    }

    /// Resolve an atom ID to its name
    pub fn resolve_atom(&self, id: AtomId) -> &str {
        self.atoms.resolve(id.0)
    }

    /// Get the ID of an already-interned atom
    pub fn get_atom(&self, name: &str) -> Option<AtomId> {
        self.atoms.get(name).map(AtomId)
    }

    /// Number of interned atoms
    pub fn atom_count(&self) -> usize {
        self.atoms.len()
    }

    /// Total number of interned symbols
    pub fn total_symbols(&self) -> usize {
        self.variable_count() + self.atom_count()
    }
}

// === Display implementations for debugging ===

impl fmt::Display for VariableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "V{}", self.0)
    }
}

impl fmt::Display for AtomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "A{}", self.0)
    }
}

// === Serde implementations ===
// IDs serialize as bare u32; name resolution is the owning interner's job.

impl Serialize for VariableId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.0.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for VariableId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        u32::deserialize(deserializer).map(VariableId)
    }
}

impl Serialize for AtomId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.0.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for AtomId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        u32::deserialize(deserializer).map(AtomId)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variable_interning() {
        let mut interner = Interner::new();

        let x1 = interner.intern_variable("X");
        let x2 = interner.intern_variable("X");
        let y = interner.intern_variable("Y");

        assert_eq!(x1, x2);
        assert_ne!(x1, y);
        assert_eq!(interner.resolve_variable(x1), "X");
        assert_eq!(interner.resolve_variable(y), "Y");
        assert_eq!(interner.variable_count(), 2);
    }

    #[test]
    fn test_atom_interning() {
        let mut interner = Interner::new();

        let a = interner.intern_atom("a");
        let b = interner.intern_atom("b");
        let a2 = interner.intern_atom("a");

        assert_eq!(a, a2);
        assert_ne!(a, b);
        assert_eq!(interner.resolve_atom(a), "a");
        assert_eq!(interner.atom_count(), 2);
    }

    #[test]
    fn test_separate_namespaces() {
        let mut interner = Interner::new();

        let v = interner.intern_variable("x");
        let a = interner.intern_atom("x");

        assert_eq!(interner.resolve_variable(v), "x");
        assert_eq!(interner.resolve_atom(a), "x");
        assert_eq!(interner.total_symbols(), 2);
    }

    #[test]
    fn test_get_without_interning() {
        let mut interner = Interner::new();

        assert!(interner.get_variable("X").is_none());
        let x = interner.intern_variable("X");
        assert_eq!(interner.get_variable("X"), Some(x));
        assert!(interner.get_variable("Y").is_none());
    }

    #[test]
    fn test_id_ordering_follows_insertion() {
        let mut interner = Interner::new();
        let x = interner.intern_variable("X");
        let y = interner.intern_variable("Y");

        assert!(x < y);
    }
}
