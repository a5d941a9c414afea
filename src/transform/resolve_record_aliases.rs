//! # Record Alias Resolution
//!
//! Canonicalizes anonymous record values that were aliased to variables
//! through equality constraints, and erases equalities that a substitution
//! makes vacuous.
//!
//! ## Example
//!
//! ```datalog
//! out(X) :- rel(X), X = {A, B}, sub(A, B).
//! ```
//!
//! becomes
//!
//! ```datalog
//! out({A, B}) :- rel({A, B}), {A, B} = {A, B}, sub(A, B).
//! ```
//!
//! The residual `{A, B} = {A, B}` equality is left for later constraint
//! cleanup; only placeholder equalities (`_ = {A, B}`) are simplified to a
//! true boolean literal here.
//!
//! A variable is only aliased when the substitution is safe: its inferred
//! type must still be the unconstrained top element (anonymous records stay
//! at top until their shape is resolved) and it must be grounded.
//! Substituted copies are never revisited within one invocation; the pass
//! reports a change and leaves re-running normalization to the outer
//! pipeline's fixpoint.

use crate::ast::{BodyPredicate, Program, Rule, Term};
use crate::transform::{AnalysisContext, Transform};
use std::collections::HashMap;
use tracing::debug;

/// Pass replacing record-aliased variables by their record value
#[derive(Debug, Clone, Copy, Default)]
pub struct ResolveRecordAliases;

impl ResolveRecordAliases {
    /// Create the pass
    pub fn new() -> Self {
        ResolveRecordAliases
    }

    /// Collect the variable-to-record alias map for one rule
    ///
    /// Scans body equalities with a variable on one side and a record on the
    /// other (either orientation). A binding is recorded only when the
    /// variable's inferred type is still the unconstrained top element and
    /// the variable is grounded. The first record seen per variable name
    /// wins; later equalities to the same name are ignored.
    fn variable_record_aliases(
        rule: &Rule,
        ctx: &AnalysisContext<'_>,
    ) -> HashMap<String, Term> {
        let mut aliases: HashMap<String, Term> = HashMap::new();

        for pred in &rule.body {
            let BodyPredicate::Comparison(left, op, right) = pred else {
                continue;
            };
            if !op.is_equality() {
                continue;
            }

            let (variable, record) = match (left, right) {
                (Term::Variable(_), Term::Record(_)) => (left, right),
                (Term::Record(_), Term::Variable(_)) => (right, left),
                _ => continue,
            };

            // An already-narrowed variable has a concrete record shape; the
            // substitution is only safe while inference still reports top.
            if !ctx.types.type_of(rule, variable).is_all() {
                continue;
            }

            if !ctx.groundedness.is_grounded(rule, variable) {
                continue;
            }

            let Term::Variable(name) = variable else {
                continue;
            };

            // We are interested only in the first mapping.
            if aliases.contains_key(name) {
                continue;
            }

            aliases.insert(name.clone(), record.clone());
        }

        aliases
    }

    /// Replace every occurrence of an aliased variable by a fresh clone of
    /// its record, through the whole rule (head and body)
    ///
    /// Returns true iff the alias map was non-empty. The originating
    /// equality is not removed; after substitution it reads `R = R` and is
    /// left for later constraint cleanup.
    fn substitute_named_aliases(rule: &mut Rule, aliases: &HashMap<String, Term>) -> bool {
        if aliases.is_empty() {
            return false;
        }

        rule.rewrite_terms(&mut |term| match term {
            Term::Variable(name) => aliases.get(name).cloned(),
            _ => None,
        });

        true
    }

    /// Collapse `_ = {…}` equalities (either orientation) to `true`
    ///
    /// Fires independently of types and groundedness: a record equated to a
    /// don't-care position constrains nothing. Returns true iff any literal
    /// was replaced.
    fn simplify_placeholder_equalities(rule: &mut Rule) -> bool {
        let mut changed = false;

        rule.rewrite_body(&mut |pred| {
            let BodyPredicate::Comparison(left, op, right) = pred else {
                return None;
            };
            let has_placeholder = left.is_placeholder() || right.is_placeholder();
            let has_record = left.is_record() || right.is_record();
            if op.is_equality() && has_placeholder && has_record {
                changed = true;
                Some(BodyPredicate::Boolean(true))
            } else {
                None
            }
        });

        changed
    }
}

impl Transform for ResolveRecordAliases {
    fn name(&self) -> &'static str {
        "resolve-record-aliases"
    }

    fn apply(&mut self, program: &mut Program, ctx: &AnalysisContext<'_>) -> bool {
        let mut changed = false;
        let mut rules_changed = 0usize;

        for rule in &mut program.rules {
            let aliases = Self::variable_record_aliases(rule, ctx);
            let mut rule_changed = Self::substitute_named_aliases(rule, &aliases);
            rule_changed |= Self::simplify_placeholder_equalities(rule);

            if rule_changed {
                rules_changed += 1;
                changed = true;
            }
        }

        if changed {
            debug!(
                pass = self.name(),
                rules_changed,
                "resolved record aliases"
            );
        }

        changed
    }
}
