//! # Precedence Analysis
//!
//! Relation-level dependency graph for Datalog programs, with recursion
//! detection and a stratifiability check for negation.
//!
//! An edge `head -> dep` means the head relation depends on `dep` through a
//! body atom. Cycles can form through both positive and negated atoms, so
//! both edge kinds enter the reachability graph; negated edges are recorded
//! separately for the stratification check.
//!
//! ```datalog
//! reach(x) :- source(x).                 // reach -> source
//! reach(y) :- reach(x), edge(x, y).      // reach -> reach, reach -> edge
//! unreachable(x) :- node(x), !reach(x).  // unreachable -!-> reach
//! ```

use crate::ast::{BodyPredicate, Program};
use crate::graph::Graph;
use std::collections::BTreeSet;
use thiserror::Error;

/// Program cannot be stratified
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StratificationError {
    /// A relation is negated inside its own recursive cycle (including
    /// self-negation); no evaluation order can compute the negated relation
    /// fully before it is negated.
    #[error("relation '{relation}' negates '{negated}' within the same recursive cycle")]
    NegationInCycle { relation: String, negated: String },
}

/// Relation dependency graph with recursion and stratifiability queries
#[derive(Debug, Clone, Default)]
pub struct PrecedenceGraph {
    dependencies: Graph<String>,
    /// (head, negated relation) pairs, in rule order
    negations: Vec<(String, String)>,
}

impl PrecedenceGraph {
    /// Build the precedence graph for a program
    pub fn build(program: &Program) -> Self {
        let mut graph = PrecedenceGraph::default();

        for rule in &program.rules {
            let head = &rule.head.relation;
            for pred in &rule.body {
                match pred {
                    BodyPredicate::Positive(atom) => {
                        graph.dependencies.insert(head.clone(), atom.relation.clone());
                    }
                    BodyPredicate::Negated(atom) => {
                        graph.dependencies.insert(head.clone(), atom.relation.clone());
                        graph.negations.push((head.clone(), atom.relation.clone()));
                    }
                    // Comparisons and boolean literals relate no relations
                    BodyPredicate::Comparison(_, _, _) | BodyPredicate::Boolean(_) => {}
                }
            }
        }

        graph
    }

    /// Check if `relation` directly depends on `dep` through some rule body
    pub fn depends_on(&self, relation: &str, dep: &str) -> bool {
        self.dependencies
            .contains_edge(&relation.to_string(), &dep.to_string())
    }

    /// Check if `relation` transitively depends on `dep`
    pub fn depends_transitively(&self, relation: &str, dep: &str) -> bool {
        self.dependencies
            .reaches(&relation.to_string(), &dep.to_string())
    }

    /// Check if a relation is recursive (lies on a dependency cycle)
    pub fn is_recursive(&self, relation: &str) -> bool {
        let relation = relation.to_string();
        self.dependencies.reaches(&relation, &relation)
    }

    /// Get all recursive relations, in name order
    pub fn recursive_relations(&self) -> BTreeSet<String> {
        self.dependencies
            .nodes()
            .filter(|rel| self.dependencies.reaches(rel, rel))
            .cloned()
            .collect()
    }

    /// Check that negation never occurs inside a recursive cycle
    ///
    /// A negated edge `head -!-> negated` is only admissible when the negated
    /// relation does not (transitively) depend back on the head; otherwise
    /// the pair sits in one cycle and the program is not stratifiable.
    pub fn check_stratifiable(&self) -> Result<(), StratificationError> {
        for (head, negated) in &self.negations {
            if head == negated || self.dependencies.reaches(negated, head) {
                return Err(StratificationError::NegationInCycle {
                    relation: head.clone(),
                    negated: negated.clone(),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Atom, Rule, Term};

    fn var(name: &str) -> Term {
        Term::Variable(name.to_string())
    }

    fn atom(relation: &str, vars: &[&str]) -> Atom {
        Atom::new(relation.to_string(), vars.iter().map(|v| var(v)).collect())
    }

    /// tc(x, y) :- edge(x, y).
    /// tc(x, z) :- tc(x, y), edge(y, z).
    /// result(x, y) :- tc(x, y).
    fn transitive_closure_program() -> Program {
        let mut program = Program::new();
        program.add_rule(Rule::new_simple(
            atom("tc", &["x", "y"]),
            vec![atom("edge", &["x", "y"])],
        ));
        program.add_rule(Rule::new_simple(
            atom("tc", &["x", "z"]),
            vec![atom("tc", &["x", "y"]), atom("edge", &["y", "z"])],
        ));
        program.add_rule(Rule::new_simple(
            atom("result", &["x", "y"]),
            vec![atom("tc", &["x", "y"])],
        ));
        program
    }

    #[test]
    fn test_recursive_relations() {
        let graph = PrecedenceGraph::build(&transitive_closure_program());

        assert!(graph.is_recursive("tc"));
        assert!(!graph.is_recursive("edge"));
        assert!(!graph.is_recursive("result"));

        let recursive: Vec<String> = graph.recursive_relations().into_iter().collect();
        assert_eq!(recursive, vec!["tc"]);
    }

    #[test]
    fn test_transitive_dependencies() {
        let graph = PrecedenceGraph::build(&transitive_closure_program());

        assert!(graph.depends_on("result", "tc"));
        assert!(!graph.depends_on("result", "edge"));
        assert!(graph.depends_transitively("result", "edge"));
        assert!(!graph.depends_transitively("edge", "result"));
    }

    #[test]
    fn test_negation_across_strata_is_fine() {
        // unreachable(x) :- node(x), !reach(x).  (reach not depending on unreachable)
        let mut program = transitive_closure_program();
        program.add_rule(Rule::new(
            atom("unreachable", &["x"]),
            vec![
                BodyPredicate::Positive(atom("node", &["x"])),
                BodyPredicate::Negated(atom("tc", &["x", "x"])),
            ],
        ));

        let graph = PrecedenceGraph::build(&program);
        assert_eq!(graph.check_stratifiable(), Ok(()));
    }

    #[test]
    fn test_self_negation_is_not_stratifiable() {
        // p(x) :- q(x), !p(x).
        let mut program = Program::new();
        program.add_rule(Rule::new(
            atom("p", &["x"]),
            vec![
                BodyPredicate::Positive(atom("q", &["x"])),
                BodyPredicate::Negated(atom("p", &["x"])),
            ],
        ));

        let graph = PrecedenceGraph::build(&program);
        assert_eq!(
            graph.check_stratifiable(),
            Err(StratificationError::NegationInCycle {
                relation: "p".to_string(),
                negated: "p".to_string(),
            })
        );
    }

    #[test]
    fn test_mutual_negation_cycle_is_not_stratifiable() {
        // a(x) :- base(x), !b(x).
        // b(x) :- a(x).
        let mut program = Program::new();
        program.add_rule(Rule::new(
            atom("a", &["x"]),
            vec![
                BodyPredicate::Positive(atom("base", &["x"])),
                BodyPredicate::Negated(atom("b", &["x"])),
            ],
        ));
        program.add_rule(Rule::new_simple(atom("b", &["x"]), vec![atom("a", &["x"])]));

        let graph = PrecedenceGraph::build(&program);
        assert!(graph.check_stratifiable().is_err());
    }
}
