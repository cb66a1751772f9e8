//! Substitutions: ordered matcher sequences acting as term endomorphisms

use super::matcher::Matcher;
use crate::error::{EngineError, Result};
use crate::term::{Term, TypeLattice};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A substitution: an ordered sequence of matchers forming one endomorphism
/// over terms
///
/// The matcher sequence is the support of the substitution, the finite set of
/// positions it actually changes. Within one substitution all matcher
/// patterns are pairwise distinct; construction enforces this.
///
/// Application is first-match: at every node the first matcher that accepts
/// the term wins, and matchers later in the sequence are not consulted.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "Vec<Matcher>", into = "Vec<Matcher>")]
pub struct Substitution {
    matchers: Vec<Matcher>,
}

// Deserialization routes through the validating constructor, so a decoded
// substitution upholds the same pattern-distinctness invariant as a built
// one.

impl TryFrom<Vec<Matcher>> for Substitution {
    type Error = EngineError;

    fn try_from(matchers: Vec<Matcher>) -> Result<Self> {
        Substitution::new(matchers)
    }
}

impl From<Substitution> for Vec<Matcher> {
    fn from(subst: Substitution) -> Vec<Matcher> {
        subst.matchers
    }
}

impl Substitution {
    /// The identity substitution: empty support, fixed point of composition
    /// on both sides
    pub fn identity() -> Self {
        Substitution::default()
    }

    /// Build a substitution from matchers, checking that all patterns are
    /// pairwise distinct
    pub fn new(matchers: Vec<Matcher>) -> Result<Self> {
        let mut seen: HashSet<&Term> = HashSet::new();
        for matcher in &matchers {
            if !seen.insert(matcher.pattern()) {
                return Err(EngineError::DuplicatePattern(matcher.pattern().to_string()));
            }
        }
        Ok(Substitution { matchers })
    }

    /// Build a substitution with the additional type-safety check: every
    /// exact matcher whose pattern and substitute both carry types must
    /// replace with a subtype
    ///
    /// An incompatible replacement fails here, at construction, rather than
    /// producing ill-typed terms at apply time.
    pub fn new_type_safe(matchers: Vec<Matcher>, lattice: &TypeLattice) -> Result<Self> {
        for matcher in &matchers {
            if let Matcher::Exact {
                pattern,
                substitute: Some(substitute),
            } = matcher
            {
                if let (Some(pattern_ty), Some(substitute_ty)) = (pattern.ty(), substitute.ty()) {
                    if !lattice.is_subtype(substitute_ty, pattern_ty) {
                        return Err(EngineError::TypeIncompatible {
                            pattern_type: lattice.resolve(pattern_ty).to_string(),
                            substitute_type: lattice.resolve(substitute_ty).to_string(),
                        });
                    }
                }
            }
        }
        Substitution::new(matchers)
    }

    /// Single-binding substitution `[pattern -> substitute]`
    pub(crate) fn binding(pattern: Term, substitute: Term) -> Self {
        Substitution {
            matchers: vec![Matcher::exact(pattern, Some(substitute))],
        }
    }

    /// The ordered matcher sequence
    pub fn replacements(&self) -> &[Matcher] {
        &self.matchers
    }

    /// Number of matchers in the support
    pub fn len(&self) -> usize {
        self.matchers.len()
    }

    /// True for the identity substitution
    pub fn is_identity(&self) -> bool {
        self.matchers.is_empty()
    }

    /// Alias for [`Substitution::is_identity`]
    pub fn is_empty(&self) -> bool {
        self.matchers.is_empty()
    }

    /// True if any matcher is a unifying matcher
    pub fn has_unifying(&self) -> bool {
        self.matchers.iter().any(Matcher::is_unifying)
    }

    /// Apply this substitution to a term, homomorphically through composite
    /// structure
    ///
    /// At each node: the first matcher accepting the node wins; otherwise a
    /// composite recurses into its compositor and components in order and is
    /// rebuilt; an unmatched atomic node is returned unchanged. Total and
    /// side-effect free.
    pub fn apply(&self, term: &Term, lattice: &TypeLattice) -> Term {
        for matcher in &self.matchers {
            if let Some(replaced) = matcher.try_replace(term, lattice) {
                return replaced;
            }
        }
        match term {
            Term::Composite(c) => {
                let compositor = self.apply(&c.compositor, lattice);
                let components = c
                    .components
                    .iter()
                    .map(|component| self.apply(component, lattice))
                    .collect();
                Term::composite(compositor, components)
            }
            _ => term.clone(),
        }
    }

    /// Compose two substitutions: `self.compose(inner)` is `self ∘ inner`
    ///
    /// Built without re-running both substitutions per apply: inner's
    /// substitutes are rewritten through `self` once, then `self`'s matchers
    /// whose patterns inner does not already cover are appended. This fast
    /// path is defined for exact matchers only; a unifying matcher in either
    /// operand reports [`EngineError::UnsupportedComposition`].
    ///
    /// The extensional law `(self ∘ inner).apply(t) == self.apply(inner.apply(t))`
    /// holds whenever `self`'s patterns are variables (the shape unification
    /// produces). With non-variable patterns in `self`, rewriting by `inner`
    /// can manufacture one of `self`'s patterns at a composite position that
    /// the composed substitution no longer revisits, and the two sides may
    /// differ; callers needing the law for such rule sets must apply the two
    /// substitutions in sequence instead.
    pub fn compose(&self, inner: &Substitution, lattice: &TypeLattice) -> Result<Substitution> {
        if self.has_unifying() || inner.has_unifying() {
            return Err(EngineError::UnsupportedComposition);
        }
        Ok(self.compose_exact(inner, lattice))
    }

    /// Exact-matcher composition; callers guarantee both operands are free
    /// of unifying matchers
    pub(crate) fn compose_exact(&self, inner: &Substitution, lattice: &TypeLattice) -> Substitution {
        let mut matchers = Vec::with_capacity(self.matchers.len() + inner.matchers.len());
        let mut covered: HashSet<&Term> = HashSet::with_capacity(inner.matchers.len());

        for matcher in &inner.matchers {
            let pattern = matcher.pattern();
            // An exact matcher only ever fires on its own pattern, so an
            // absent substitute behaves as the pattern itself.
            let substitute = matcher.substitute().unwrap_or(pattern);
            matchers.push(Matcher::exact(
                pattern.clone(),
                Some(self.apply(substitute, lattice)),
            ));
            covered.insert(pattern);
        }

        for matcher in &self.matchers {
            if !covered.contains(matcher.pattern()) {
                matchers.push(matcher.clone());
            }
        }

        // Patterns stay pairwise distinct: inner's were distinct, and the
        // appended ones are filtered against them.
        Substitution { matchers }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::term::Interner;

    struct TestContext {
        interner: Interner,
        lattice: TypeLattice,
    }

    impl TestContext {
        fn new() -> Self {
            TestContext {
                interner: Interner::new(),
                lattice: TypeLattice::new(),
            }
        }

        fn var(&mut self, name: &str) -> Term {
            Term::variable(self.interner.intern_variable(name))
        }

        fn atom(&mut self, name: &str) -> Term {
            Term::atom(self.interner.intern_atom(name))
        }

        fn func(&mut self, name: &str, args: Vec<Term>) -> Term {
            let compositor = self.atom(name);
            Term::composite(compositor, args)
        }

        fn subst(&mut self, bindings: Vec<(Term, Term)>) -> Substitution {
            Substitution::new(
                bindings
                    .into_iter()
                    .map(|(p, s)| Matcher::exact(p, Some(s)))
                    .collect(),
            )
            .unwrap()
        }
    }

    #[test]
    fn test_identity_application() {
        let mut ctx = TestContext::new();
        let x = ctx.var("X");
        let term = ctx.func("f", vec![x.clone(), x]);

        let identity = Substitution::identity();
        assert!(identity.is_identity());
        assert_eq!(identity.apply(&term, &ctx.lattice), term);
    }

    #[test]
    fn test_apply_rebuilds_composites() {
        let mut ctx = TestContext::new();
        let a = ctx.atom("a");
        let b = ctx.atom("b");
        let c = ctx.atom("c");
        let term = ctx.func("f", vec![a.clone(), b.clone()]);

        let sigma = ctx.subst(vec![(a, c.clone())]);
        let expected = ctx.func("f", vec![c, b]);
        assert_eq!(sigma.apply(&term, &ctx.lattice), expected);
    }

    #[test]
    fn test_apply_substitutes_compositor() {
        let mut ctx = TestContext::new();
        let f = ctx.atom("f");
        let g = ctx.atom("g");
        let a = ctx.atom("a");
        let term = Term::composite(f.clone(), vec![a.clone()]);

        let sigma = ctx.subst(vec![(f, g.clone())]);
        let expected = Term::composite(g, vec![a]);
        assert_eq!(sigma.apply(&term, &ctx.lattice), expected);
    }

    #[test]
    fn test_first_match_wins() {
        let mut ctx = TestContext::new();
        let a = ctx.atom("a");
        let b = ctx.atom("b");
        let c = ctx.atom("c");
        let p = ctx.var("P");

        // Both matchers accept `a`; only the first may fire.
        let sigma = Substitution::new(vec![
            Matcher::exact(a.clone(), Some(b.clone())),
            Matcher::unifying(p, Some(c)),
        ])
        .unwrap();

        assert_eq!(sigma.apply(&a, &ctx.lattice), b);
    }

    #[test]
    fn test_match_without_substitute_stops_rewriting() {
        let mut ctx = TestContext::new();
        let a = ctx.atom("a");
        let b = ctx.atom("b");
        let term = ctx.func("f", vec![a.clone()]);

        // f(a) is matched as a whole with no substitute, so the inner a->b
        // binding must not fire underneath it.
        let sigma = Substitution::new(vec![
            Matcher::exact(term.clone(), None),
            Matcher::exact(a, Some(b)),
        ])
        .unwrap();

        assert_eq!(sigma.apply(&term, &ctx.lattice), term);
    }

    #[test]
    fn test_duplicate_pattern_rejected() {
        let mut ctx = TestContext::new();
        let a = ctx.atom("a");
        let b = ctx.atom("b");
        let c = ctx.atom("c");

        let result = Substitution::new(vec![
            Matcher::exact(a.clone(), Some(b)),
            Matcher::exact(a, Some(c)),
        ]);
        assert!(matches!(result, Err(EngineError::DuplicatePattern(_))));
    }

    #[test]
    fn test_compose_sees_through_inner() {
        let mut ctx = TestContext::new();
        let x = ctx.var("X");
        let y = ctx.var("Y");
        let one = ctx.atom("1");

        // sigma = [X -> 1], tau = [Y -> X]; (sigma ∘ tau)(Y) = 1
        let sigma = ctx.subst(vec![(x.clone(), one.clone())]);
        let tau = ctx.subst(vec![(y.clone(), x)]);

        let composed = sigma.compose(&tau, &ctx.lattice).unwrap();
        assert_eq!(composed.apply(&y, &ctx.lattice), one);
    }

    #[test]
    fn test_compose_keeps_outer_bindings() {
        let mut ctx = TestContext::new();
        let x = ctx.var("X");
        let y = ctx.var("Y");
        let a = ctx.atom("a");
        let b = ctx.atom("b");

        let sigma = ctx.subst(vec![(x.clone(), a.clone())]);
        let tau = ctx.subst(vec![(y.clone(), b.clone())]);

        let composed = sigma.compose(&tau, &ctx.lattice).unwrap();
        assert_eq!(composed.apply(&x, &ctx.lattice), a);
        assert_eq!(composed.apply(&y, &ctx.lattice), b);
        assert_eq!(composed.len(), 2);
    }

    #[test]
    fn test_compose_identity_both_sides() {
        let mut ctx = TestContext::new();
        let x = ctx.var("X");
        let a = ctx.atom("a");
        let sigma = ctx.subst(vec![(x.clone(), a)]);
        let term = ctx.func("f", vec![x]);

        let left = Substitution::identity()
            .compose(&sigma, &ctx.lattice)
            .unwrap();
        let right = sigma.compose(&Substitution::identity(), &ctx.lattice).unwrap();

        assert_eq!(left.apply(&term, &ctx.lattice), sigma.apply(&term, &ctx.lattice));
        assert_eq!(right.apply(&term, &ctx.lattice), sigma.apply(&term, &ctx.lattice));
    }

    #[test]
    fn test_compose_with_unifying_matcher_unsupported() {
        let mut ctx = TestContext::new();
        let p = ctx.var("P");
        let a = ctx.atom("a");
        let unifying = Substitution::new(vec![Matcher::unifying(p, Some(a))]).unwrap();

        let result = Substitution::identity().compose(&unifying, &ctx.lattice);
        assert_eq!(result, Err(EngineError::UnsupportedComposition));
    }

    #[test]
    fn test_deserialization_rejects_duplicate_patterns() {
        let mut ctx = TestContext::new();
        let a = ctx.atom("a");
        let b = ctx.atom("b");
        let c = ctx.atom("c");

        // Two well-formed singletons over the same pattern, spliced into one
        // matcher array: decoding must apply the same distinctness check as
        // construction.
        let spliced = serde_json::to_string(&vec![
            Matcher::exact(a.clone(), Some(b.clone())),
            Matcher::exact(a.clone(), Some(c)),
        ])
        .unwrap();
        assert!(serde_json::from_str::<Substitution>(&spliced).is_err());

        // A valid substitution round-trips.
        let valid = ctx.subst(vec![(a, b)]);
        let encoded = serde_json::to_string(&valid).unwrap();
        let decoded: Substitution = serde_json::from_str(&encoded).unwrap();
        assert_eq!(decoded, valid);
        assert_eq!(decoded.len(), 1);
    }

    #[test]
    fn test_compose_law_boundary_with_nonvariable_patterns() {
        let mut ctx = TestContext::new();
        let x = ctx.var("X");
        let a = ctx.atom("a");
        let b = ctx.atom("b");
        let fa = ctx.func("f", vec![a.clone()]);
        let fx = ctx.func("f", vec![x.clone()]);

        // sigma's pattern f(a) only comes into existence after tau rewrites
        // X to a inside f(X); the composed substitution cannot see it.
        let sigma = ctx.subst(vec![(fa.clone(), b.clone())]);
        let tau = ctx.subst(vec![(x, a)]);

        let sequenced = sigma.apply(&tau.apply(&fx, &ctx.lattice), &ctx.lattice);
        assert_eq!(sequenced, b);

        let composed = sigma.compose(&tau, &ctx.lattice).unwrap();
        assert_eq!(composed.apply(&fx, &ctx.lattice), fa);
    }

    #[test]
    fn test_type_safe_construction() {
        let mut ctx = TestContext::new();
        let real = ctx.lattice.add_type("Real");
        let integer = ctx.lattice.add_type("Integer");
        ctx.lattice.add_subtype(integer, real);

        let x_real = Term::typed_variable(ctx.interner.intern_variable("X"), real);
        let three = Term::typed_atom(ctx.interner.intern_atom("3"), integer);
        let pi = Term::typed_atom(ctx.interner.intern_atom("3.14"), real);
        let y_int = Term::typed_variable(ctx.interner.intern_variable("Y"), integer);

        // Integer substitute for a Real pattern narrows: fine.
        assert!(Substitution::new_type_safe(
            vec![Matcher::exact(x_real, Some(three))],
            &ctx.lattice
        )
        .is_ok());

        // Real substitute for an Integer pattern widens: rejected.
        let result =
            Substitution::new_type_safe(vec![Matcher::exact(y_int, Some(pi))], &ctx.lattice);
        assert_eq!(
            result,
            Err(EngineError::TypeIncompatible {
                pattern_type: "Integer".to_string(),
                substitute_type: "Real".to_string(),
            })
        );
    }
}
