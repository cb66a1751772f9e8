//! Unification of terms up to a most general unifier

pub mod mgu;

pub use mgu::{unify, unify_pair, NonUnifiable, Unification};
