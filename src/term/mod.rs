//! Term model: atoms, variables, composites, symbol interning, and the
//! optional subtype lattice.

pub mod interner;
pub mod term;
pub mod types;

// Re-export commonly used types
pub use interner::{AtomId, Interner, VariableId};
pub use term::{Atom, Composite, Term, TermDisplay, Variable};
pub use types::{TypeId, TypeLattice};
