//! # datalog-normalize
//!
//! Semantic normalization for Datalog programs: the stage between parsing
//! and IR building that canonicalizes clause bodies so later compilation
//! stages see one shape per construct.
//!
//! ```text
//! parse(source) -> [Normalization Passes] -> build_ir() -> optimize -> execute
//!                       ^ this crate
//! ```
//!
//! ## What lives here
//!
//! - [`ast`] - the rule program tree ([`Program`], [`Rule`], [`Atom`],
//!   [`BodyPredicate`], [`Term`]) and a generic replace-or-recurse tree
//!   rewrite facility.
//! - [`transform`] - normalization passes behind the [`Transform`] seam.
//!   [`ResolveRecordAliases`] replaces variables aliased to anonymous record
//!   values by the record itself and erases placeholder-record equalities.
//! - [`analysis`] - read-only interfaces to the upstream type and
//!   groundedness analyses that gate substitutions, with simple default
//!   implementations for drivers and tests.
//! - [`graph`] - the directed reachability graph behind precedence and
//!   stratification analyses.
//! - [`precedence`] - the relation dependency graph: recursion detection
//!   and the stratified-negation check.
//!
//! ## Example
//!
//! ```
//! use datalog_normalize::{
//!     AnalysisContext, Atom, BodyPredicate, ComparisonOp, DeclaredTypes,
//!     PositiveBodyGroundedness, Program, ResolveRecordAliases, Rule, Term,
//!     Transform,
//! };
//!
//! // out(X) :- rel(X), X = {A, B}.
//! let mut program = Program::new();
//! program.add_rule(Rule::new(
//!     Atom::new("out".to_string(), vec![Term::Variable("X".to_string())]),
//!     vec![
//!         BodyPredicate::Positive(Atom::new(
//!             "rel".to_string(),
//!             vec![Term::Variable("X".to_string())],
//!         )),
//!         BodyPredicate::Comparison(
//!             Term::Variable("X".to_string()),
//!             ComparisonOp::Equal,
//!             Term::Record(vec![
//!                 Term::Variable("A".to_string()),
//!                 Term::Variable("B".to_string()),
//!             ]),
//!         ),
//!     ],
//! ));
//!
//! let types = DeclaredTypes::new();
//! let groundedness = PositiveBodyGroundedness::new();
//! let ctx = AnalysisContext::new(&types, &groundedness);
//!
//! let changed = ResolveRecordAliases::new().apply(&mut program, &ctx);
//! assert!(changed);
//! assert!(program.rules[0].head.args[0].is_record());
//! ```
//!
//! Passes report a changed flag; invoking them repeatedly until every pass
//! reports unchanged is the job of the surrounding pipeline, as is
//! recomputing the analyses after a structural change.

pub mod analysis;
pub mod ast;
pub mod graph;
pub mod precedence;
pub mod transform;

pub use analysis::{
    DeclaredTypes, GroundednessAnalysis, PositiveBodyGroundedness, TypeAnalysis, TypeSet,
};
pub use ast::{Atom, BodyPredicate, ComparisonOp, Program, Rule, Term};
pub use graph::Graph;
pub use precedence::{PrecedenceGraph, StratificationError};
pub use transform::{AnalysisContext, ResolveRecordAliases, Transform};
