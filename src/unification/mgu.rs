//! Most general unifier computation
//!
//! Robinson's algorithm with occurs check, extended with the optional
//! subtype-compatibility check for typed terms. Bindings are threaded through
//! component lists by substitution composition, so the result is idempotent:
//! applying a returned unifier twice equals applying it once.

use crate::substitution::Substitution;
use crate::term::{Term, TypeLattice, Variable, VariableId};
use std::collections::HashMap;
use tracing::{debug, trace};

/// Outcome of a unification attempt
///
/// "No unifier exists" is an ordinary, expected outcome and therefore a
/// variant, not an error; callers branch on it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Unification {
    /// The most general unifier of the given terms
    Unifier(Substitution),
    /// No unifier exists, with the first disagreement found
    NonUnifiable(NonUnifiable),
}

impl Unification {
    /// True if a unifier was found
    pub fn is_unifiable(&self) -> bool {
        matches!(self, Unification::Unifier(_))
    }

    /// The unifier, if one was found
    pub fn unifier(&self) -> Option<&Substitution> {
        match self {
            Unification::Unifier(mu) => Some(mu),
            Unification::NonUnifiable(_) => None,
        }
    }

    /// Consume the outcome, yielding the unifier if one was found
    pub fn into_unifier(self) -> Option<Substitution> {
        match self {
            Unification::Unifier(mu) => Some(mu),
            Unification::NonUnifiable(_) => None,
        }
    }
}

/// Reasons why a set of terms has no unifier
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NonUnifiable {
    /// The variable occurs inside the term it would be bound to; a cyclic
    /// binding is forbidden
    OccursCheck { var: Variable, term: Term },
    /// Two distinct atomic non-variables
    AtomClash { left: Term, right: Term },
    /// Composites with unequal compositors
    CompositorClash { left: Term, right: Term },
    /// Composites with equal compositors but unequal component counts
    ArityMismatch { left: usize, right: usize },
    /// Atomic against composite
    ShapeClash { left: Term, right: Term },
    /// The term's type is not a subtype of the variable's declared type
    TypeClash { variable: Variable, term: Term },
}

/// Memoizes "does `x` occur in `t`" per (variable, subterm) pair within one
/// unification call, so shared subterms are not re-scanned repeatedly.
type OccursMemo = HashMap<(VariableId, Term), bool>;

/// Compute the most general unifier of a set of terms
///
/// Sets of size 0 and 1 trivially unify with the identity. Larger sets fold
/// left: the first element is unified against each subsequent one, with the
/// accumulated substitution applied to both sides before each step and
/// updated by composition after it. The first disagreement aborts.
///
/// On success the returned substitution is idempotent and maps every term in
/// the set to one common instance.
pub fn unify(terms: &[Term], lattice: &TypeLattice) -> Unification {
    let (first, rest) = match terms {
        [] | [_] => return Unification::Unifier(Substitution::identity()),
        [first, rest @ ..] => (first, rest),
    };

    let mut memo = OccursMemo::new();
    let mut acc = Substitution::identity();
    for term in rest {
        let left = acc.apply(first, lattice);
        let right = acc.apply(term, lattice);
        match unify_step(&left, &right, lattice, &mut memo) {
            Unification::Unifier(step) => acc = step.compose_exact(&acc, lattice),
            failure => return failure,
        }
    }
    debug!(bindings = acc.len(), "unification succeeded");
    Unification::Unifier(acc)
}

/// Compute the most general unifier of two terms
pub fn unify_pair(t1: &Term, t2: &Term, lattice: &TypeLattice) -> Unification {
    let mut memo = OccursMemo::new();
    unify_step(t1, t2, lattice, &mut memo)
}

fn unify_step(
    t1: &Term,
    t2: &Term,
    lattice: &TypeLattice,
    memo: &mut OccursMemo,
) -> Unification {
    match (t1, t2) {
        (Term::Variable(x), _) => bind_variable(x, t2, lattice, memo),
        (_, Term::Variable(y)) => bind_variable(y, t1, lattice, memo),

        (Term::Atom(_), Term::Atom(_)) => {
            if t1 == t2 {
                Unification::Unifier(Substitution::identity())
            } else {
                trace!(left = %t1, right = %t2, "atom clash");
                Unification::NonUnifiable(NonUnifiable::AtomClash {
                    left: t1.clone(),
                    right: t2.clone(),
                })
            }
        }

        (Term::Composite(c1), Term::Composite(c2)) => {
            if c1.compositor != c2.compositor {
                trace!(left = %t1, right = %t2, "compositor clash");
                return Unification::NonUnifiable(NonUnifiable::CompositorClash {
                    left: t1.clone(),
                    right: t2.clone(),
                });
            }
            if c1.arity() != c2.arity() {
                return Unification::NonUnifiable(NonUnifiable::ArityMismatch {
                    left: c1.arity(),
                    right: c2.arity(),
                });
            }

            // Unify components left to right, threading the accumulated
            // substitution: each pair sees the bindings of all previous ones.
            let mut acc = Substitution::identity();
            for (left, right) in c1.components.iter().zip(c2.components.iter()) {
                let left = acc.apply(left, lattice);
                let right = acc.apply(right, lattice);
                match unify_step(&left, &right, lattice, memo) {
                    Unification::Unifier(step) => acc = step.compose_exact(&acc, lattice),
                    failure => return failure,
                }
            }
            Unification::Unifier(acc)
        }

        (Term::Atom(_), Term::Composite(_)) | (Term::Composite(_), Term::Atom(_)) => {
            trace!(left = %t1, right = %t2, "shape clash");
            Unification::NonUnifiable(NonUnifiable::ShapeClash {
                left: t1.clone(),
                right: t2.clone(),
            })
        }
    }
}

/// Bind variable `x` to term `t`, subject to the occurs check and, when both
/// sides are typed, the subtype-compatibility check
fn bind_variable(
    x: &Variable,
    t: &Term,
    lattice: &TypeLattice,
    memo: &mut OccursMemo,
) -> Unification {
    // Binding a variable to itself is the identity, not a cycle.
    if let Term::Variable(y) = t {
        if y.id == x.id {
            return Unification::Unifier(Substitution::identity());
        }
    }

    if occurs(x.id, t, memo) {
        trace!(var = %x, term = %t, "occurs check failed");
        return Unification::NonUnifiable(NonUnifiable::OccursCheck {
            var: x.clone(),
            term: t.clone(),
        });
    }

    if let (Some(var_ty), Some(term_ty)) = (x.ty, t.ty()) {
        if !lattice.is_subtype(term_ty, var_ty) {
            // When the other side is a variable of a wider type, bind it the
            // other way round; that stays most general. Rebinding a typed
            // variable to the infimum of two incomparable types is not
            // supported and counts as non-unifiable.
            if let Term::Variable(y) = t {
                if lattice.is_subtype(var_ty, term_ty) {
                    trace!(var = %y, term = %x, "binding reversed for narrower type");
                    return Unification::Unifier(Substitution::binding(
                        t.clone(),
                        Term::Variable(x.clone()),
                    ));
                }
            }
            trace!(var = %x, term = %t, "type clash");
            return Unification::NonUnifiable(NonUnifiable::TypeClash {
                variable: x.clone(),
                term: t.clone(),
            });
        }
    }

    trace!(var = %x, term = %t, "binding variable");
    Unification::Unifier(Substitution::binding(
        Term::Variable(x.clone()),
        t.clone(),
    ))
}

/// Does variable `x` occur anywhere in `t`?
///
/// Composite nodes are memoized per (variable, subterm) pair; without the
/// memo, terms with heavily shared subtrees degrade exponentially.
fn occurs(x: VariableId, t: &Term, memo: &mut OccursMemo) -> bool {
    match t {
        Term::Variable(y) => y.id == x,
        Term::Atom(_) => false,
        Term::Composite(c) => {
            let key = (x, t.clone());
            if let Some(&hit) = memo.get(&key) {
                return hit;
            }
            let hit = occurs(x, &c.compositor, memo)
                || c.components.iter().any(|component| occurs(x, component, memo));
            memo.insert(key, hit);
            hit
        }
    }
}
