//! # Datalog AST - Abstract Syntax Tree Types
//!
//! Abstract Syntax Tree types for Datalog programs, shared by the
//! normalization passes and the precedence analyses.
//!
//! Literals and terms are closed sum types; passes dispatch by pattern
//! matching. Record values nest arbitrarily through [`Term::Record`].
//!
//! ## Rewriting
//!
//! For the generic replace-or-recurse tree transform used by the
//! normalization passes, see the [`rewrite`] module.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

pub mod rewrite;

// ============================================================================
// Core AST Types
// ============================================================================

/// Comparison operators for constraint predicates in rule bodies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ComparisonOp {
    Equal,          // =
    NotEqual,       // !=
    LessThan,       // <
    LessOrEqual,    // <=
    GreaterThan,    // >
    GreaterOrEqual, // >=
}

impl ComparisonOp {
    /// Parse a comparison operator from a string
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "=" => Some(ComparisonOp::Equal),
            "!=" => Some(ComparisonOp::NotEqual),
            "<" => Some(ComparisonOp::LessThan),
            "<=" => Some(ComparisonOp::LessOrEqual),
            ">" => Some(ComparisonOp::GreaterThan),
            ">=" => Some(ComparisonOp::GreaterOrEqual),
            _ => None,
        }
    }

    /// Get the string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            ComparisonOp::Equal => "=",
            ComparisonOp::NotEqual => "!=",
            ComparisonOp::LessThan => "<",
            ComparisonOp::LessOrEqual => "<=",
            ComparisonOp::GreaterThan => ">",
            ComparisonOp::GreaterOrEqual => ">=",
        }
    }

    /// Check if this operator is an equality
    ///
    /// Alias binding and placeholder simplification only fire on equalities.
    pub fn is_equality(&self) -> bool {
        matches!(self, ComparisonOp::Equal)
    }
}

/// Represents a variable, constant, or record value in Datalog
///
/// Records are anonymous composite values: `{x, 3, {y, z}}`. Their field
/// types stay unconstrained until type inference narrows them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Term {
    Variable(String), // e.g., "x", "y", "z"
    /// Don't-care position - represents "_" in Datalog
    Placeholder,
    Constant(i64), // e.g., 42, 100
    /// String constant
    StringConstant(String),
    /// Record value over an ordered sequence of sub-terms: `{a, b, c}`
    Record(Vec<Term>),
}

impl Term {
    /// Check if this term is a variable
    pub fn is_variable(&self) -> bool {
        matches!(self, Term::Variable(_))
    }

    /// Check if this term is a record value
    pub fn is_record(&self) -> bool {
        matches!(self, Term::Record(_))
    }

    /// Check if this term is a placeholder
    pub fn is_placeholder(&self) -> bool {
        matches!(self, Term::Placeholder)
    }

    /// Get variable name if this is a variable
    pub fn as_variable(&self) -> Option<&str> {
        if let Term::Variable(name) = self {
            Some(name)
        } else {
            None
        }
    }

    /// Get record fields if this is a record value
    pub fn as_record(&self) -> Option<&[Term]> {
        if let Term::Record(fields) = self {
            Some(fields)
        } else {
            None
        }
    }

    /// Get all variables referenced by this term, including inside records
    pub fn variables(&self) -> HashSet<String> {
        let mut vars = HashSet::new();
        self.collect_variables(&mut vars);
        vars
    }

    fn collect_variables(&self, vars: &mut HashSet<String>) {
        match self {
            Term::Variable(name) => {
                vars.insert(name.clone());
            }
            Term::Record(fields) => {
                for field in fields {
                    field.collect_variables(vars);
                }
            }
            Term::Placeholder | Term::Constant(_) | Term::StringConstant(_) => {}
        }
    }
}

/// Represents an atom like edge(x, y) or reach(x)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Atom {
    pub relation: String,
    pub args: Vec<Term>,
}

impl Atom {
    /// Create a new atom
    pub fn new(relation: String, args: Vec<Term>) -> Self {
        Atom { relation, args }
    }

    /// Get all variables in this atom (including variables inside records)
    pub fn variables(&self) -> HashSet<String> {
        let mut vars = HashSet::new();
        for term in &self.args {
            term.collect_variables(&mut vars);
        }
        vars
    }

    /// Check if this atom contains any record values
    pub fn has_records(&self) -> bool {
        self.args.iter().any(Term::is_record)
    }

    /// Get the arity (number of arguments) of this atom
    pub fn arity(&self) -> usize {
        self.args.len()
    }
}

/// Represents a body predicate (positive atom, negated atom, comparison,
/// or a fixed truth value)
///
/// `Boolean` literals appear when a pass simplifies a constraint away; a
/// `Boolean(true)` body literal is a no-op for evaluation and is dropped by
/// later constraint cleanup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum BodyPredicate {
    Positive(Atom),
    Negated(Atom),
    /// Comparison predicate: left op right (e.g., X = Y, X < 5).
    /// The two operands carry no semantic ordering.
    Comparison(Term, ComparisonOp, Term),
    /// Constraint with a fixed truth value
    Boolean(bool),
}

impl BodyPredicate {
    /// Get the underlying atom (returns None for non-atom predicates)
    pub fn atom(&self) -> Option<&Atom> {
        match self {
            BodyPredicate::Positive(atom) | BodyPredicate::Negated(atom) => Some(atom),
            BodyPredicate::Comparison(_, _, _) | BodyPredicate::Boolean(_) => None,
        }
    }

    /// Check if this is a positive atom
    pub fn is_positive(&self) -> bool {
        matches!(self, BodyPredicate::Positive(_))
    }

    /// Check if this is a negated atom
    pub fn is_negated(&self) -> bool {
        matches!(self, BodyPredicate::Negated(_))
    }

    /// Check if this is a comparison predicate
    pub fn is_comparison(&self) -> bool {
        matches!(self, BodyPredicate::Comparison(_, _, _))
    }

    /// Get all variables in this predicate
    pub fn variables(&self) -> HashSet<String> {
        match self {
            BodyPredicate::Positive(atom) | BodyPredicate::Negated(atom) => atom.variables(),
            BodyPredicate::Comparison(left, _, right) => {
                let mut vars = left.variables();
                vars.extend(right.variables());
                vars
            }
            BodyPredicate::Boolean(_) => HashSet::new(),
        }
    }
}

/// Represents a single Datalog rule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rule {
    pub head: Atom,
    pub body: Vec<BodyPredicate>,
}

impl Rule {
    /// Create a new rule
    pub fn new(head: Atom, body: Vec<BodyPredicate>) -> Self {
        Rule { head, body }
    }

    /// Create a rule with only positive body atoms (no negation)
    pub fn new_simple(head: Atom, body: Vec<Atom>) -> Self {
        Rule {
            head,
            body: body.into_iter().map(BodyPredicate::Positive).collect(),
        }
    }

    /// Get all variables bound by the body
    ///
    /// This includes:
    /// 1. Variables from positive body atoms (e.g., `edge(X, Y)` -> {X, Y})
    /// 2. Variables equated to a constant (e.g., `X = 3` -> {X})
    ///
    /// Variables equated to constants are bound because the equality pins
    /// their value, the same way a positive atom does.
    pub fn positive_body_variables(&self) -> HashSet<String> {
        let mut vars: HashSet<String> = self
            .body
            .iter()
            .filter(|pred| pred.is_positive())
            .flat_map(BodyPredicate::variables)
            .collect();

        for pred in &self.body {
            if let BodyPredicate::Comparison(left, op, right) = pred {
                if op.is_equality() {
                    match (left, right) {
                        (Term::Variable(v), Term::Constant(_) | Term::StringConstant(_))
                        | (Term::Constant(_) | Term::StringConstant(_), Term::Variable(v)) => {
                            vars.insert(v.clone());
                        }
                        _ => {}
                    }
                }
            }
        }

        vars
    }

    /// Get all variables in this rule
    pub fn variables(&self) -> HashSet<String> {
        let mut vars = self.head.variables();

        for pred in &self.body {
            vars.extend(pred.variables());
        }

        vars
    }

    /// Check if this rule is recursive (head relation appears in body)
    pub fn is_recursive(&self) -> bool {
        self.body.iter().any(|pred| {
            pred.atom()
                .map(|a| a.relation == self.head.relation)
                .unwrap_or(false)
        })
    }

    /// Get all positive body atoms
    pub fn positive_body_atoms(&self) -> Vec<&Atom> {
        self.body
            .iter()
            .filter_map(|pred| match pred {
                BodyPredicate::Positive(atom) => Some(atom),
                _ => None,
            })
            .collect()
    }

    /// Get all negated body atoms
    pub fn negated_body_atoms(&self) -> Vec<&Atom> {
        self.body
            .iter()
            .filter_map(|pred| match pred {
                BodyPredicate::Negated(atom) => Some(atom),
                _ => None,
            })
            .collect()
    }
}

/// Represents a complete Datalog program
///
/// Normalization passes mutate the program in place and report whether
/// anything changed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Program {
    pub rules: Vec<Rule>,
}

impl Program {
    /// Create a new empty program
    pub fn new() -> Self {
        Program { rules: Vec::new() }
    }

    /// Add a rule to the program
    pub fn add_rule(&mut self, rule: Rule) {
        self.rules.push(rule);
    }

    /// Returns all IDB relations (those that appear as heads of rules)
    pub fn idbs(&self) -> Vec<String> {
        let mut idbs: Vec<String> = self
            .rules
            .iter()
            .map(|rule| rule.head.relation.clone())
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();

        idbs.sort();
        idbs
    }

    /// Returns all EDB relations (those that appear in bodies but never as heads)
    pub fn edbs(&self) -> Vec<String> {
        let idb_set: HashSet<String> = self.idbs().into_iter().collect();

        let mut body_relations: HashSet<String> = HashSet::new();
        for rule in &self.rules {
            for pred in &rule.body {
                if let Some(atom) = pred.atom() {
                    body_relations.insert(atom.relation.clone());
                }
            }
        }

        let mut edbs: Vec<String> = body_relations.difference(&idb_set).cloned().collect();

        edbs.sort();
        edbs
    }
}
