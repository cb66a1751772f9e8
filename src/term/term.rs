//! The term model: atoms, variables, and composites
//!
//! A term is either atomic (an [`Atom`] or a [`Variable`]) or a [`Composite`]
//! built from a compositor and an ordered sequence of component terms. The
//! compositor is itself a term, so parametrized operators (a composite in
//! compositor position) work without special cases.
//!
//! Terms are immutable values: every transformation rebuilds, nothing is
//! mutated in place.

use super::interner::{AtomId, Interner, VariableId};
use super::types::TypeId;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// A non-variable atomic term
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Atom {
    pub id: AtomId,
    pub ty: Option<TypeId>,
}

impl Atom {
    pub fn new(id: AtomId) -> Self {
        Atom { id, ty: None }
    }

    pub fn typed(id: AtomId, ty: TypeId) -> Self {
        Atom { id, ty: Some(ty) }
    }
}

/// A variable
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Variable {
    pub id: VariableId,
    pub ty: Option<TypeId>,
}

impl Variable {
    pub fn new(id: VariableId) -> Self {
        Variable { id, ty: None }
    }

    pub fn typed(id: VariableId, ty: TypeId) -> Self {
        Variable { id, ty: Some(ty) }
    }
}

/// A composite term: compositor applied to ordered components
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Composite {
    pub compositor: Box<Term>,
    pub components: Vec<Term>,
}

impl Composite {
    /// Rebuild a composite of the same shape from a (possibly new)
    /// compositor and components. Substitution uses this to produce a
    /// structurally fresh term rather than mutating the original.
    pub fn rebuild(compositor: Term, components: Vec<Term>) -> Term {
        Term::Composite(Composite {
            compositor: Box::new(compositor),
            components,
        })
    }

    /// Number of components
    pub fn arity(&self) -> usize {
        self.components.len()
    }
}

/// A term in the substitution/unification universe
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Term {
    Atom(Atom),
    Variable(Variable),
    Composite(Composite),
}

impl Term {
    /// Untyped atom
    pub fn atom(id: AtomId) -> Term {
        Term::Atom(Atom::new(id))
    }

    /// Atom carrying a type tag
    pub fn typed_atom(id: AtomId, ty: TypeId) -> Term {
        Term::Atom(Atom::typed(id, ty))
    }

    /// Untyped variable
    pub fn variable(id: VariableId) -> Term {
        Term::Variable(Variable::new(id))
    }

    /// Variable carrying a type tag
    pub fn typed_variable(id: VariableId, ty: TypeId) -> Term {
        Term::Variable(Variable::typed(id, ty))
    }

    /// Composite from compositor and components
    pub fn composite(compositor: Term, components: Vec<Term>) -> Term {
        Composite::rebuild(compositor, components)
    }

    /// True for variables only
    pub fn is_variable(&self) -> bool {
        matches!(self, Term::Variable(_))
    }

    /// True for composites only
    pub fn is_composite(&self) -> bool {
        matches!(self, Term::Composite(_))
    }

    /// The type tag, if this term carries one
    ///
    /// Composites carry no type of their own; a typed term algebra assigns
    /// types at the atomic leaves.
    pub fn ty(&self) -> Option<TypeId> {
        match self {
            Term::Atom(a) => a.ty,
            Term::Variable(v) => v.ty,
            Term::Composite(_) => None,
        }
    }

    /// All variables in this term, in left-to-right order with duplicates
    pub fn variables(&self) -> Vec<Variable> {
        match self {
            Term::Atom(_) => vec![],
            Term::Variable(v) => vec![v.clone()],
            Term::Composite(c) => {
                let mut vars = c.compositor.variables();
                for component in &c.components {
                    vars.extend(component.variables());
                }
                vars
            }
        }
    }

    /// Collect the distinct variables of this term into `vars`
    pub fn collect_variables(&self, vars: &mut HashSet<Variable>) {
        match self {
            Term::Atom(_) => {}
            Term::Variable(v) => {
                vars.insert(v.clone());
            }
            Term::Composite(c) => {
                c.compositor.collect_variables(vars);
                for component in &c.components {
                    component.collect_variables(vars);
                }
            }
        }
    }

    /// Display with symbol names resolved through an interner
    pub fn display<'a>(&'a self, interner: &'a Interner) -> TermDisplay<'a> {
        TermDisplay {
            term: self,
            interner,
        }
    }
}

// Bare Display prints raw IDs (V0, A3, ...); use `display(&interner)` for
// resolved names.

impl fmt::Display for Atom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.ty {
            Some(ty) => write!(f, "{}:{}", self.id, ty),
            None => write!(f, "{}", self.id),
        }
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.ty {
            Some(ty) => write!(f, "{}:{}", self.id, ty),
            None => write!(f, "{}", self.id),
        }
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::Atom(a) => write!(f, "{}", a),
            Term::Variable(v) => write!(f, "{}", v),
            Term::Composite(c) => {
                write!(f, "{}(", c.compositor)?;
                for (i, component) in c.components.iter().enumerate() {
                    if i > 0 {
                        write!(f, ",")?;
                    }
                    write!(f, "{}", component)?;
                }
                write!(f, ")")
            }
        }
    }
}

/// Pretty-printer resolving symbol names through an interner
pub struct TermDisplay<'a> {
    term: &'a Term,
    interner: &'a Interner,
}

impl fmt::Display for TermDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.term {
            Term::Atom(a) => write!(f, "{}", self.interner.resolve_atom(a.id)),
            Term::Variable(v) => write!(f, "{}", self.interner.resolve_variable(v.id)),
            Term::Composite(c) => {
                write!(f, "{}(", c.compositor.display(self.interner))?;
                for (i, component) in c.components.iter().enumerate() {
                    if i > 0 {
                        write!(f, ",")?;
                    }
                    write!(f, "{}", component.display(self.interner))?;
                }
                write!(f, ")")
            }
        }
    }
}
