//! Fixed-point driver for term rewriting
//!
//! A substitution is one rewrite pass; running a rewrite system means
//! applying it repeatedly until nothing changes. Termination is a property of
//! the rules, not of this driver, so an unbounded loop is the default and a
//! caller-chosen iteration bound is optional.

use crate::substitution::Substitution;
use crate::term::{Term, TypeLattice};
use tracing::debug;

/// Apply the substitution once
pub fn rewrite_once(subst: &Substitution, term: &Term, lattice: &TypeLattice) -> Term {
    subst.apply(term, lattice)
}

/// Apply the substitution until a fixed point is reached, or until `limit`
/// applications have been performed
///
/// Returns the final term together with the number of applications made.
/// With `limit: None` a non-terminating rule set loops forever.
pub fn rewrite_to_fixed_point(
    subst: &Substitution,
    term: &Term,
    lattice: &TypeLattice,
    limit: Option<usize>,
) -> (Term, usize) {
    let mut current = term.clone();
    let mut steps = 0;
    loop {
        if let Some(max) = limit {
            if steps >= max {
                debug!(steps, "rewrite stopped at iteration bound");
                return (current, steps);
            }
        }
        let next = subst.apply(&current, lattice);
        steps += 1;
        if next == current {
            debug!(steps, "rewrite reached fixed point");
            return (current, steps);
        }
        current = next;
    }
}
