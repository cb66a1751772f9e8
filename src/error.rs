//! Error types for the substitution engine
//!
//! Only programmer-error conditions live here: an unsatisfiable unification
//! problem is not an error, it is a [`crate::unification::Unification::NonUnifiable`]
//! outcome that callers branch on.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// A substitution was constructed with two matchers describing the same
    /// pattern. Within one substitution all patterns must be pairwise
    /// distinct; this is checked at construction, never deferred to apply.
    #[error("duplicate matcher pattern in substitution: {0}")]
    DuplicatePattern(String),

    /// A type-safe substitution was constructed with an exact matcher whose
    /// substitute type is not a subtype of its pattern type.
    #[error("substitute type {substitute_type} is not a subtype of pattern type {pattern_type}")]
    TypeIncompatible {
        pattern_type: String,
        substitute_type: String,
    },

    /// Composition was requested while a unifying matcher is present in one
    /// of the operands. The rewrite-based fast path is only defined for
    /// exact matchers; reporting the limitation beats silently producing a
    /// wrong composite.
    #[error("composition of substitutions containing unifying matchers is not supported")]
    UnsupportedComposition,
}

pub type Result<T> = std::result::Result<T, EngineError>;
