//! # Tree Rewriting
//!
//! Generic replace-or-recurse transforms over owned AST trees.
//!
//! A rewrite is driven by a replacement function. For each visited node the
//! function either produces a replacement (the new owned subtree is inserted
//! and **not** revisited) or declines, in which case the walk descends into
//! the node's children. Because replacements are not revisited, a substituted
//! subtree that itself contains a rewritable node is only picked up by a
//! later pass invocation.
//!
//! Substituted subtrees are always independently owned: the AST uses value
//! semantics throughout, so no two tree positions can share a mutable node.

use super::{Atom, BodyPredicate, Rule, Term};

impl Term {
    /// Rewrite this term bottom-most-first under a replacement function.
    ///
    /// `f` returning `Some(new)` substitutes `new` for the visited node
    /// without descending into it; `None` keeps the node and recurses into
    /// record fields. Leaf terms are returned unchanged when not replaced.
    pub fn rewrite<F>(self, f: &mut F) -> Term
    where
        F: FnMut(&Term) -> Option<Term>,
    {
        if let Some(replacement) = f(&self) {
            return replacement;
        }

        match self {
            Term::Record(fields) => {
                Term::Record(fields.into_iter().map(|field| field.rewrite(f)).collect())
            }
            other => other,
        }
    }
}

impl Atom {
    /// Rewrite every argument term of this atom in place
    pub fn rewrite_terms<F>(&mut self, f: &mut F)
    where
        F: FnMut(&Term) -> Option<Term>,
    {
        for arg in &mut self.args {
            rewrite_in_place(arg, f);
        }
    }
}

impl Rule {
    /// Rewrite every term reachable from this rule, head and body
    ///
    /// Covers atom arguments (positive and negated) and both operands of
    /// comparison predicates. Boolean predicates carry no terms.
    pub fn rewrite_terms<F>(&mut self, f: &mut F)
    where
        F: FnMut(&Term) -> Option<Term>,
    {
        self.head.rewrite_terms(f);

        for pred in &mut self.body {
            match pred {
                BodyPredicate::Positive(atom) | BodyPredicate::Negated(atom) => {
                    atom.rewrite_terms(f);
                }
                BodyPredicate::Comparison(left, _, right) => {
                    rewrite_in_place(left, f);
                    rewrite_in_place(right, f);
                }
                BodyPredicate::Boolean(_) => {}
            }
        }
    }

    /// Rewrite body predicates in place under a replace-or-keep function
    ///
    /// `f` returning `Some(new)` replaces the whole literal; `None` keeps it.
    pub fn rewrite_body<F>(&mut self, f: &mut F)
    where
        F: FnMut(&BodyPredicate) -> Option<BodyPredicate>,
    {
        for pred in &mut self.body {
            if let Some(replacement) = f(pred) {
                *pred = replacement;
            }
        }
    }
}

/// Rewrite a term slot in place by temporarily taking ownership
fn rewrite_in_place<F>(slot: &mut Term, f: &mut F)
where
    F: FnMut(&Term) -> Option<Term>,
{
    let term = std::mem::replace(slot, Term::Placeholder);
    *slot = term.rewrite(f);
}

#[cfg(test)]
mod tests {
    use crate::ast::{Atom, BodyPredicate, ComparisonOp, Rule, Term};

    fn var(name: &str) -> Term {
        Term::Variable(name.to_string())
    }

    #[test]
    fn test_rewrite_replaces_matching_leaves() {
        // {x, {x, 3}} with x -> 7
        let term = Term::Record(vec![
            var("x"),
            Term::Record(vec![var("x"), Term::Constant(3)]),
        ]);

        let rewritten = term.rewrite(&mut |t| match t {
            Term::Variable(name) if name == "x" => Some(Term::Constant(7)),
            _ => None,
        });

        assert_eq!(
            rewritten,
            Term::Record(vec![
                Term::Constant(7),
                Term::Record(vec![Term::Constant(7), Term::Constant(3)]),
            ])
        );
    }

    #[test]
    fn test_rewrite_does_not_descend_into_replacements() {
        // x -> {x}: the x inside the replacement must survive untouched,
        // otherwise the rewrite would loop forever.
        let term = var("x");

        let rewritten = term.rewrite(&mut |t| match t {
            Term::Variable(name) if name == "x" => Some(Term::Record(vec![var("x")])),
            _ => None,
        });

        assert_eq!(rewritten, Term::Record(vec![var("x")]));
    }

    #[test]
    fn test_rule_rewrite_covers_head_and_comparison_operands() {
        // out(x) :- edge(x, y), x = y.
        let mut rule = Rule::new(
            Atom::new("out".to_string(), vec![var("x")]),
            vec![
                BodyPredicate::Positive(Atom::new("edge".to_string(), vec![var("x"), var("y")])),
                BodyPredicate::Comparison(var("x"), ComparisonOp::Equal, var("y")),
            ],
        );

        rule.rewrite_terms(&mut |t| match t {
            Term::Variable(name) if name == "x" => Some(Term::Constant(1)),
            _ => None,
        });

        assert_eq!(rule.head.args, vec![Term::Constant(1)]);
        assert_eq!(
            rule.body[0],
            BodyPredicate::Positive(Atom::new(
                "edge".to_string(),
                vec![Term::Constant(1), var("y")]
            ))
        );
        assert_eq!(
            rule.body[1],
            BodyPredicate::Comparison(Term::Constant(1), ComparisonOp::Equal, var("y"))
        );
    }

    #[test]
    fn test_rewrite_body_replaces_whole_literals() {
        let mut rule = Rule::new(
            Atom::new("out".to_string(), vec![]),
            vec![
                BodyPredicate::Comparison(var("x"), ComparisonOp::Equal, var("y")),
                BodyPredicate::Positive(Atom::new("edge".to_string(), vec![var("x")])),
            ],
        );

        rule.rewrite_body(&mut |pred| {
            if pred.is_comparison() {
                Some(BodyPredicate::Boolean(true))
            } else {
                None
            }
        });

        assert_eq!(rule.body[0], BodyPredicate::Boolean(true));
        assert!(rule.body[1].is_positive());
    }
}
