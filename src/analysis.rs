//! # Analysis Interfaces
//!
//! Read-only views onto the whole-program analyses the normalization passes
//! consult: type inference and groundedness. The real engine computes both
//! upstream (groundedness via its own fixpoint); passes receive them as
//! injected trait objects rather than ambient lookups.
//!
//! A pass that mutates clause structure invalidates the analyses' answers
//! for the touched nodes. Recomputing them between pass invocations is the
//! orchestrating pipeline's responsibility, not the pass's.
//!
//! [`DeclaredTypes`] and [`PositiveBodyGroundedness`] are simple stand-ins
//! for drivers and tests that do not carry a full inference engine.

use crate::ast::{Rule, Term};
use std::collections::{BTreeSet, HashMap};

/// Type-lattice value for a term
///
/// `All` is the unconstrained top element: the analysis has not narrowed the
/// term at all. Anonymous records sit at `All` until their shape is resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeSet {
    /// Top of the lattice - all types remain possible
    All,
    /// A finite set of named types
    Of(BTreeSet<String>),
}

impl TypeSet {
    /// Build a finite type set from type names
    pub fn of<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        TypeSet::Of(names.into_iter().map(Into::into).collect())
    }

    /// Check if this is the unconstrained top element
    pub fn is_all(&self) -> bool {
        matches!(self, TypeSet::All)
    }
}

/// Inferred types for terms, computed per translation unit
pub trait TypeAnalysis {
    /// Get the lattice value inferred for a term within a rule
    fn type_of(&self, rule: &Rule, term: &Term) -> TypeSet;
}

/// Groundedness of terms, computed per translation unit
///
/// A term is grounded when its value is guaranteed determined by the rest of
/// the clause at evaluation time.
pub trait GroundednessAnalysis {
    /// Check whether a term is grounded within a rule
    fn is_grounded(&self, rule: &Rule, term: &Term) -> bool;
}

/// Type analysis backed by per-variable declarations
///
/// Variables without a declaration, and all non-variable terms, answer
/// [`TypeSet::All`].
#[derive(Debug, Clone, Default)]
pub struct DeclaredTypes {
    by_variable: HashMap<String, TypeSet>,
}

impl DeclaredTypes {
    /// Create an analysis with no declarations (everything is `All`)
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare the lattice value for a variable name
    pub fn declare(&mut self, variable: impl Into<String>, types: TypeSet) {
        self.by_variable.insert(variable.into(), types);
    }
}

impl TypeAnalysis for DeclaredTypes {
    fn type_of(&self, _rule: &Rule, term: &Term) -> TypeSet {
        match term {
            Term::Variable(name) => self
                .by_variable
                .get(name)
                .cloned()
                .unwrap_or(TypeSet::All),
            _ => TypeSet::All,
        }
    }
}

/// Groundedness from positive body occurrence
///
/// A variable is grounded iff the rule binds it through a positive body atom
/// or a constant equality; constants are always grounded, placeholders never,
/// and a record is grounded iff all of its fields are. This ignores
/// grounding through chains of variable equalities, which the engine's full
/// fixpoint analysis handles upstream.
#[derive(Debug, Clone, Copy, Default)]
pub struct PositiveBodyGroundedness;

impl PositiveBodyGroundedness {
    /// Create the analysis
    pub fn new() -> Self {
        PositiveBodyGroundedness
    }
}

impl GroundednessAnalysis for PositiveBodyGroundedness {
    fn is_grounded(&self, rule: &Rule, term: &Term) -> bool {
        match term {
            Term::Constant(_) | Term::StringConstant(_) => true,
            Term::Placeholder => false,
            Term::Variable(name) => rule.positive_body_variables().contains(name),
            Term::Record(fields) => fields.iter().all(|field| self.is_grounded(rule, field)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Atom, BodyPredicate, ComparisonOp};

    fn var(name: &str) -> Term {
        Term::Variable(name.to_string())
    }

    #[test]
    fn test_type_set_top() {
        assert!(TypeSet::All.is_all());
        assert!(!TypeSet::of(["number"]).is_all());
    }

    #[test]
    fn test_declared_types_default_to_all() {
        let mut types = DeclaredTypes::new();
        types.declare("X", TypeSet::of(["number"]));

        let rule = Rule::new(Atom::new("out".to_string(), vec![]), vec![]);

        assert_eq!(types.type_of(&rule, &var("X")), TypeSet::of(["number"]));
        assert_eq!(types.type_of(&rule, &var("Y")), TypeSet::All);
        assert_eq!(types.type_of(&rule, &Term::Record(vec![])), TypeSet::All);
    }

    #[test]
    fn test_positive_body_groundedness() {
        // out(X) :- rel(X), Y = 3, Z = {X, Y}.
        let rule = Rule::new(
            Atom::new("out".to_string(), vec![var("X")]),
            vec![
                BodyPredicate::Positive(Atom::new("rel".to_string(), vec![var("X")])),
                BodyPredicate::Comparison(var("Y"), ComparisonOp::Equal, Term::Constant(3)),
                BodyPredicate::Comparison(
                    var("Z"),
                    ComparisonOp::Equal,
                    Term::Record(vec![var("X"), var("Y")]),
                ),
            ],
        );

        let ground = PositiveBodyGroundedness::new();

        assert!(ground.is_grounded(&rule, &var("X")));
        assert!(ground.is_grounded(&rule, &var("Y")));
        // Z is only bound through the record equality, which this simple
        // analysis does not chase.
        assert!(!ground.is_grounded(&rule, &var("Z")));

        assert!(ground.is_grounded(&rule, &Term::Constant(7)));
        assert!(!ground.is_grounded(&rule, &Term::Placeholder));
        assert!(ground.is_grounded(&rule, &Term::Record(vec![var("X"), Term::Constant(1)])));
        assert!(!ground.is_grounded(&rule, &Term::Record(vec![var("W")])));
    }
}
