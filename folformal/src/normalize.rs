//! Raw tree → canonical [`Formula`].
//!
//! A single bottom-up pass: operands are normalized before their parent is built, and no
//! partially built node ever leaves this module.
//!
//! Rules
//! - A chain of two or more operands folds left-associatively into nested binary nodes of
//!   the chain's connective: `a ∧ b ∧ c` becomes `(a ∧ b) ∧ c`.
//! - A chain of one operand is a grammar artifact and collapses to that operand.
//! - Parenthesized groups collapse to their content.
//! - Negations and quantifiers always become nodes of their own, whatever they are wrapped in.
use crate::ast::Formula;
use crate::error::{Error, FolResult};
use crate::options::ParseOptions;
use crate::raw::RawTree;

/// Normalize with the default [`ParseOptions`].
pub fn normalize(raw: RawTree) -> FolResult<Formula> {
    normalize_with(raw, &ParseOptions::default())
}

/// Normalize, failing with [`Error::DepthLimitExceeded`] when the raw tree nests deeper than
/// `options.max_depth`.
///
/// Nesting counts parenthesized groups, negations and quantifiers on the path to a node.
/// Binary chains do not nest: a conjunction of five hundred operands is as shallow as one of
/// two, however tall its left fold gets.
pub fn normalize_with(raw: RawTree, options: &ParseOptions) -> FolResult<Formula> {
    let normalizer = Normalizer {
        limit: options.max_depth,
    };
    normalizer.fold(raw, 0)
}

struct Normalizer {
    limit: usize,
}

impl Normalizer {
    fn fold(&self, raw: RawTree, nesting: usize) -> FolResult<Formula> {
        if nesting > self.limit {
            return Err(Error::DepthLimitExceeded {
                limit: self.limit,
                offset: None,
            });
        }

        match raw {
            RawTree::Chain { first, rest, .. } if rest.is_empty() => self.fold(*first, nesting),
            RawTree::Chain { op, first, rest } => {
                let mut acc = self.fold(*first, nesting)?;
                for operand in rest {
                    acc = Formula::binary(op, acc, self.fold(operand, nesting)?);
                }
                Ok(acc)
            }
            RawTree::Not(inner) => Ok(Formula::not(self.fold(*inner, nesting + 1)?)),
            RawTree::Quantified {
                quantifier,
                variable,
                body,
            } => {
                let scope = self.fold(*body, nesting + 1)?;
                Ok(Formula::quantified(quantifier, variable, scope))
            }
            RawTree::Group(inner) => self.fold(*inner, nesting + 1),
            RawTree::Predicate { name, args } => Ok(Formula::Predicate { name, args }),
            RawTree::Verum => Ok(Formula::Verum),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{BinaryOp, NodeKind, Quantifier};

    fn pred(name: &str) -> RawTree {
        RawTree::Predicate {
            name: name.to_string(),
            args: vec![crate::ast::Term::new("a")],
        }
    }

    /// Wrap `inner` into one single-operand chain per binary precedence level, as the grammar does.
    fn through_all_levels(inner: RawTree) -> RawTree {
        [
            BinaryOp::And,
            BinaryOp::Or,
            BinaryOp::Xor,
            BinaryOp::Implies,
            BinaryOp::Bicond,
        ]
        .into_iter()
        .fold(inner, |acc, op| RawTree::chain(op, acc, Vec::new()))
    }

    #[test]
    fn single_operand_chains_collapse() {
        let raw = through_all_levels(pred("P"));
        assert_eq!(normalize(raw).unwrap(), Formula::predicate("P", ["a"]));
    }

    #[test]
    fn negation_survives_single_operand_chains() {
        let raw = through_all_levels(RawTree::Not(Box::new(through_all_levels(pred("P")))));
        let f = normalize(raw).unwrap();
        assert_eq!(f.kind(), NodeKind::Not);
        assert_eq!(f, Formula::not(Formula::predicate("P", ["a"])));
    }

    #[test]
    fn each_quantifier_survives_single_operand_chains() {
        for quantifier in [Quantifier::Forall, Quantifier::Exists] {
            let raw = through_all_levels(RawTree::Quantified {
                quantifier,
                variable: "x".to_string(),
                body: Box::new(through_all_levels(RawTree::Group(Box::new(
                    through_all_levels(pred("P")),
                )))),
            });
            let f = normalize(raw).unwrap();
            assert_eq!(f.kind(), quantifier.kind());
            assert_eq!(f.value(), Some("x"));
            assert_eq!(
                f,
                Formula::quantified(quantifier, "x", Formula::predicate("P", ["a"]))
            );
        }
    }

    #[test]
    fn long_chains_fold_left() {
        let raw = RawTree::chain(BinaryOp::Xor, pred("A"), vec![pred("B"), pred("C"), pred("D")]);
        let p = |n: &str| Formula::predicate(n, ["a"]);
        assert_eq!(
            normalize(raw).unwrap(),
            Formula::xor(Formula::xor(Formula::xor(p("A"), p("B")), p("C")), p("D"))
        );
    }

    #[test]
    fn groups_collapse() {
        let raw = RawTree::Group(Box::new(RawTree::Group(Box::new(pred("P")))));
        assert_eq!(normalize(raw).unwrap(), Formula::predicate("P", ["a"]));
    }

    #[test]
    fn lifting_then_normalizing_is_identity() {
        let f = Formula::bicond(
            Formula::forall("x", Formula::not(Formula::predicate("P", ["x"]))),
            Formula::and(Formula::Verum, Formula::proposition("Q")),
        );
        let once = normalize(RawTree::from(f.clone())).unwrap();
        assert_eq!(once, f);
        assert_eq!(normalize(RawTree::from(once.clone())).unwrap(), once);
    }

    #[test]
    fn wide_chains_are_not_depth_limited() {
        let operands = (0..500).map(|i| pred(&format!("P{i}"))).collect();
        let raw = RawTree::chain(BinaryOp::And, pred("A"), operands);
        let f = normalize_with(raw, &ParseOptions::with_max_depth(3)).unwrap();
        assert_eq!(f.height(), 501);
        assert_eq!(f.size(), 1001);
    }

    #[test]
    fn chains_inside_groups_count_once_per_group() {
        // (A ∧ (B ∧ (C ∧ D)))
        let mut raw = RawTree::chain(BinaryOp::And, pred("C"), vec![pred("D")]);
        for name in ["B", "A"] {
            raw = RawTree::chain(BinaryOp::And, pred(name), vec![RawTree::Group(Box::new(raw))]);
        }
        let raw = RawTree::Group(Box::new(raw));
        assert!(normalize_with(raw.clone(), &ParseOptions::with_max_depth(3)).is_ok());
        let err = normalize_with(raw, &ParseOptions::with_max_depth(2)).unwrap_err();
        assert_eq!(
            err,
            Error::DepthLimitExceeded {
                limit: 2,
                offset: None
            }
        );
    }

    #[test]
    fn depth_limit_applies_to_nesting() {
        let mut raw = pred("P");
        for _ in 0..10 {
            raw = RawTree::Group(Box::new(raw));
        }
        assert!(normalize_with(raw.clone(), &ParseOptions::with_max_depth(9)).is_err());
        assert!(normalize_with(raw, &ParseOptions::with_max_depth(10)).is_ok());
    }
}
