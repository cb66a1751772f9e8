//! termunify: a representation-generic term substitution and unification
//! engine
//!
//! The crate implements Robinson unification with occurs check and an
//! optional subtype-compatibility check, substitutions as ordered sequences
//! of pattern-test-and-replace matchers, composition of substitutions
//! without a double term traversal, and a fixed-point rewrite driver.
//!
//! Terms are immutable values; substitutions and unifiers are cheap values
//! built fresh per call. There is no global state: symbol interners and type
//! lattices are passed through explicitly.

pub mod error;
pub mod rewrite;
pub mod substitution;
pub mod term;
pub mod unification;

// Re-export commonly used types from term
pub use term::{Atom, AtomId, Composite, Interner, Term, TermDisplay, TypeId, TypeLattice, Variable, VariableId};

// Re-export substitution types
pub use substitution::{Matcher, Substitution};

// Re-export unification entry points
pub use unification::{unify, unify_pair, NonUnifiable, Unification};

pub use error::{EngineError, Result};

pub use rewrite::{rewrite_once, rewrite_to_fixed_point};
