//! Raw parse trees, exactly as the grammar produces them.
//!
//! Every binary precedence level of the grammar is a repetition rule
//! (`operand (op operand)*`), so the parser emits one [`RawTree::Chain`] per level even when
//! there is nothing to chain. Parenthesized input is kept as [`RawTree::Group`]. The
//! normalizer removes these artifacts; see [`crate::normalize`].
use crate::ast::{BinaryOp, Formula, Quantifier, Term};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RawTree {
    /// `first (op rest[0]) (op rest[1]) ...`, possibly with an empty `rest`.
    Chain {
        op: BinaryOp,
        first: Box<RawTree>,
        rest: Vec<RawTree>,
    },
    Not(Box<RawTree>),
    Quantified {
        quantifier: Quantifier,
        variable: String,
        body: Box<RawTree>,
    },
    /// Parenthesized sub-formula.
    Group(Box<RawTree>),
    Predicate {
        name: String,
        args: Vec<Term>,
    },
    /// Lifted [`Formula::Verum`]; never produced by the parser.
    Verum,
}

impl RawTree {
    pub fn chain(op: BinaryOp, first: RawTree, rest: Vec<RawTree>) -> Self {
        RawTree::Chain {
            op,
            first: Box::new(first),
            rest,
        }
    }

    /// Number of operands of a chain, or `None` for any other node.
    pub fn chain_len(&self) -> Option<usize> {
        match self {
            RawTree::Chain { rest, .. } => Some(rest.len() + 1),
            _ => None,
        }
    }
}

/// Lift a canonical formula back to raw form: every binary node becomes a two-operand chain.
///
/// `normalize(RawTree::from(f)) == f` holds for every canonical formula.
impl From<Formula> for RawTree {
    fn from(formula: Formula) -> Self {
        match formula {
            Formula::Binary { op, lhs, rhs } => {
                RawTree::chain(op, RawTree::from(*lhs), vec![RawTree::from(*rhs)])
            }
            Formula::Not(inner) => RawTree::Not(Box::new(RawTree::from(*inner))),
            Formula::Quantified {
                quantifier,
                variable,
                scope,
            } => RawTree::Quantified {
                quantifier,
                variable,
                body: Box::new(RawTree::from(*scope)),
            },
            Formula::Predicate { name, args } => RawTree::Predicate { name, args },
            Formula::Verum => RawTree::Verum,
        }
    }
}
