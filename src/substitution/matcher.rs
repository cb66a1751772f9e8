//! Matchers: the elementary pattern-test-and-replace units of a substitution

use crate::term::{Term, TypeLattice};
use crate::unification::{unify_pair, Unification};
use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};

/// A single pattern -> replacement rule
///
/// Both variants match the whole term they are handed, never a subterm;
/// descending into composites is [`crate::substitution::Substitution`]'s job.
///
/// `Unifying` matchers test equality up to unification and push the resulting
/// unifier through the substitute. Their pattern variables must be drawn from
/// a namespace disjoint from the variables occurring in ordinary client
/// terms; otherwise matching captures and corrupts those variables. The
/// engine does not enforce this.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Matcher {
    Exact {
        pattern: Term,
        substitute: Option<Term>,
    },
    Unifying {
        pattern: Term,
        substitute: Option<Term>,
    },
}

impl Matcher {
    /// Exact matcher: matches on structural equality
    pub fn exact(pattern: Term, substitute: Option<Term>) -> Matcher {
        Matcher::Exact {
            pattern,
            substitute,
        }
    }

    /// Unifying matcher: matches when the pattern unifies with the term
    pub fn unifying(pattern: Term, substitute: Option<Term>) -> Matcher {
        Matcher::Unifying {
            pattern,
            substitute,
        }
    }

    /// The pattern this matcher tests against
    pub fn pattern(&self) -> &Term {
        match self {
            Matcher::Exact { pattern, .. } | Matcher::Unifying { pattern, .. } => pattern,
        }
    }

    /// The substitute, if one was given
    pub fn substitute(&self) -> Option<&Term> {
        match self {
            Matcher::Exact { substitute, .. } | Matcher::Unifying { substitute, .. } => {
                substitute.as_ref()
            }
        }
    }

    /// True for the `Unifying` variant
    pub fn is_unifying(&self) -> bool {
        matches!(self, Matcher::Unifying { .. })
    }

    /// Does this matcher accept `term`?
    pub fn matches(&self, term: &Term, lattice: &TypeLattice) -> bool {
        match self {
            Matcher::Exact { pattern, .. } => pattern == term,
            Matcher::Unifying { pattern, .. } => {
                unify_pair(pattern, term, lattice).is_unifiable()
            }
        }
    }

    /// Combined test-and-replace: `Some(replacement)` if this matcher accepts
    /// `term`, `None` otherwise
    ///
    /// A matcher without a substitute still reports a match and returns the
    /// term unchanged; the match consumes the term and stops any further
    /// rewriting at that position.
    pub fn try_replace(&self, term: &Term, lattice: &TypeLattice) -> Option<Term> {
        match self {
            Matcher::Exact {
                pattern,
                substitute,
            } => {
                if pattern == term {
                    Some(substitute.clone().unwrap_or_else(|| term.clone()))
                } else {
                    None
                }
            }
            Matcher::Unifying {
                pattern,
                substitute,
            } => match unify_pair(pattern, term, lattice) {
                Unification::Unifier(mu) => Some(match substitute {
                    Some(s) => mu.apply(s, lattice),
                    None => term.clone(),
                }),
                Unification::NonUnifiable(_) => None,
            },
        }
    }
}

// Two matchers are equal iff they describe the same pattern; neither the
// substitute nor the matching strategy participates in equality. This is
// what makes pattern distinctness within a substitution a plain equality
// check over its matchers.

impl PartialEq for Matcher {
    fn eq(&self, other: &Self) -> bool {
        self.pattern() == other.pattern()
    }
}

impl Eq for Matcher {}

impl Hash for Matcher {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.pattern().hash(state);
    }
}
