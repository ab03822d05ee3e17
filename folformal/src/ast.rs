//! Canonical abstract syntax tree for first-order formulas.
//!
//! Role
//! - [`Formula`] is the immutable, owned tree produced by the normalizer and the composer.
//!   Every traversal in the crate matches on it exhaustively.
//! - [`Term`] is a predicate argument. Terms are leaves attached to predicates; they are
//!   not formula nodes and do not take part in depth or subformula counts.
//! - [`NodeKind`] names each formula node the way the serialized record does
//!   (`AND`, `FORALL`, `PREDICATE`, ...).
//!
//! Equality and hashing are structural. Identifiers are kept verbatim, case included.
use smallvec::SmallVec;
use strum::{EnumIs, EnumIter, IntoStaticStr};

use crate::walker::{WalkEvent, Walker};

/// Binary connectives, ordered from the loosest to the tightest binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, EnumIter, EnumIs)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BinaryOp {
    /// `↔`
    Bicond,
    /// `→`
    Implies,
    /// `⊕`
    Xor,
    /// `∨`
    Or,
    /// `∧`
    And,
}

impl BinaryOp {
    /// Binding strength of the operator; higher binds tighter.
    pub fn precedence(self) -> u8 {
        match self {
            BinaryOp::Bicond => 1,
            BinaryOp::Implies => 2,
            BinaryOp::Xor => 3,
            BinaryOp::Or => 4,
            BinaryOp::And => 5,
        }
    }

    /// The Unicode symbol used in formula text.
    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOp::Bicond => "↔",
            BinaryOp::Implies => "→",
            BinaryOp::Xor => "⊕",
            BinaryOp::Or => "∨",
            BinaryOp::And => "∧",
        }
    }

    /// Corresponding node kind.
    pub fn kind(self) -> NodeKind {
        match self {
            BinaryOp::Bicond => NodeKind::Bicond,
            BinaryOp::Implies => NodeKind::Implies,
            BinaryOp::Xor => NodeKind::Xor,
            BinaryOp::Or => NodeKind::Or,
            BinaryOp::And => NodeKind::And,
        }
    }

    /// Corresponding connective.
    pub fn connective(self) -> Connective {
        match self {
            BinaryOp::Bicond => Connective::Bicond,
            BinaryOp::Implies => Connective::Implies,
            BinaryOp::Xor => Connective::Xor,
            BinaryOp::Or => Connective::Or,
            BinaryOp::And => Connective::And,
        }
    }
}

/// Quantifier of a [`Formula::Quantified`] node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, EnumIter, EnumIs)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Quantifier {
    /// `∀`
    Forall,
    /// `∃`
    Exists,
}

impl Quantifier {
    /// The Unicode symbol used in formula text.
    pub fn symbol(self) -> &'static str {
        match self {
            Quantifier::Forall => "∀",
            Quantifier::Exists => "∃",
        }
    }

    /// Corresponding node kind.
    pub fn kind(self) -> NodeKind {
        match self {
            Quantifier::Forall => NodeKind::Forall,
            Quantifier::Exists => NodeKind::Exists,
        }
    }
}

/// Logical connectives counted by the metrics engine.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, EnumIter, EnumIs, IntoStaticStr,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum Connective {
    And,
    Or,
    Xor,
    Implies,
    Bicond,
    Not,
}

/// Kind tag of a serialized node.
///
/// `Verum` only appears as the antecedent of a global conditional built from zero premises,
/// and `Term` only as a predicate argument.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, EnumIter, EnumIs, IntoStaticStr,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum NodeKind {
    And,
    Or,
    Xor,
    Implies,
    Bicond,
    Not,
    Forall,
    Exists,
    Predicate,
    Verum,
    Term,
}

impl NodeKind {
    /// Name used in serialized records, e.g. `"BICOND"`.
    pub fn name(self) -> &'static str {
        self.into()
    }

    /// Number of formula children a node of this kind has.
    pub fn arity(self) -> usize {
        match self {
            NodeKind::And | NodeKind::Or | NodeKind::Xor | NodeKind::Implies | NodeKind::Bicond => 2,
            NodeKind::Not | NodeKind::Forall | NodeKind::Exists => 1,
            NodeKind::Predicate | NodeKind::Verum | NodeKind::Term => 0,
        }
    }
}

/// Pre-order index of a formula node, the root being `NodeId(0)`.
///
/// Terms do not receive ids. Ids are stable for a given tree shape, which makes them usable
/// as keys in metric records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct NodeId(pub usize);

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Argument of a predicate: a variable or a constant identifier.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Term {
    name: String,
}

impl Term {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

/// A canonical first-order formula.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Formula {
    /// Binary connective with exactly two operands.
    Binary {
        op: BinaryOp,
        lhs: Box<Formula>,
        rhs: Box<Formula>,
    },
    /// Negation.
    Not(Box<Formula>),
    /// `∀variable scope` or `∃variable scope`.
    Quantified {
        quantifier: Quantifier,
        variable: String,
        scope: Box<Formula>,
    },
    /// Predicate application, possibly without arguments.
    Predicate { name: String, args: Vec<Term> },
    /// Empty antecedent of a global conditional composed from zero premises.
    ///
    /// The parser never produces this node: its symbol `⊤` is not part of the input alphabet.
    Verum,
}

impl Formula {
    pub fn binary(op: BinaryOp, lhs: Formula, rhs: Formula) -> Self {
        Formula::Binary {
            op,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        }
    }

    pub fn and(lhs: Formula, rhs: Formula) -> Self {
        Self::binary(BinaryOp::And, lhs, rhs)
    }

    pub fn or(lhs: Formula, rhs: Formula) -> Self {
        Self::binary(BinaryOp::Or, lhs, rhs)
    }

    pub fn xor(lhs: Formula, rhs: Formula) -> Self {
        Self::binary(BinaryOp::Xor, lhs, rhs)
    }

    pub fn implies(lhs: Formula, rhs: Formula) -> Self {
        Self::binary(BinaryOp::Implies, lhs, rhs)
    }

    pub fn bicond(lhs: Formula, rhs: Formula) -> Self {
        Self::binary(BinaryOp::Bicond, lhs, rhs)
    }

    #[allow(clippy::should_implement_trait)]
    pub fn not(inner: Formula) -> Self {
        Formula::Not(Box::new(inner))
    }

    pub fn quantified(quantifier: Quantifier, variable: impl Into<String>, scope: Formula) -> Self {
        Formula::Quantified {
            quantifier,
            variable: variable.into(),
            scope: Box::new(scope),
        }
    }

    pub fn forall(variable: impl Into<String>, scope: Formula) -> Self {
        Self::quantified(Quantifier::Forall, variable, scope)
    }

    pub fn exists(variable: impl Into<String>, scope: Formula) -> Self {
        Self::quantified(Quantifier::Exists, variable, scope)
    }

    /// Build a predicate from its name and argument identifiers.
    pub fn predicate<I, S>(name: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Formula::Predicate {
            name: name.into(),
            args: args.into_iter().map(Term::new).collect(),
        }
    }

    /// Zero-argument predicate, written as a bare name.
    pub fn proposition(name: impl Into<String>) -> Self {
        Formula::Predicate {
            name: name.into(),
            args: Vec::new(),
        }
    }

    /// Kind tag of this node.
    pub fn kind(&self) -> NodeKind {
        match self {
            Formula::Binary { op, .. } => op.kind(),
            Formula::Not(_) => NodeKind::Not,
            Formula::Quantified { quantifier, .. } => quantifier.kind(),
            Formula::Predicate { .. } => NodeKind::Predicate,
            Formula::Verum => NodeKind::Verum,
        }
    }

    /// Identifier carried by the node: predicate name or bound variable.
    pub fn value(&self) -> Option<&str> {
        match self {
            Formula::Quantified { variable, .. } => Some(variable),
            Formula::Predicate { name, .. } => Some(name),
            Formula::Binary { .. } | Formula::Not(_) | Formula::Verum => None,
        }
    }

    /// The connective this node represents, if any.
    pub fn connective(&self) -> Option<Connective> {
        match self {
            Formula::Binary { op, .. } => Some(op.connective()),
            Formula::Not(_) => Some(Connective::Not),
            Formula::Quantified { .. } | Formula::Predicate { .. } | Formula::Verum => None,
        }
    }

    /// Child formulas, left to right. Predicate arguments are not formulas and are excluded.
    pub fn children(&self) -> SmallVec<&Formula, 2> {
        let mut children = SmallVec::new();
        match self {
            Formula::Binary { lhs, rhs, .. } => {
                children.push(lhs.as_ref());
                children.push(rhs.as_ref());
            }
            Formula::Not(inner) => children.push(inner.as_ref()),
            Formula::Quantified { scope, .. } => children.push(scope.as_ref()),
            Formula::Predicate { .. } | Formula::Verum => {}
        }
        children
    }

    /// Depth-first enter/leave events over this tree.
    pub fn walk(&self) -> Walker<'_> {
        Walker::new(self)
    }

    /// Formula nodes in pre-order, paired with their [`NodeId`].
    pub fn subformulas(&self) -> impl Iterator<Item = (NodeId, &Formula)> {
        self.walk()
            .filter_map(|event| match event {
                WalkEvent::Enter(node) => Some(node),
                WalkEvent::Leave(_) => None,
            })
            .enumerate()
            .map(|(index, node)| (NodeId(index), node))
    }

    /// Resolve a node id produced by the metrics engine.
    pub fn node(&self, id: NodeId) -> Option<&Formula> {
        self.subformulas()
            .find(|(candidate, _)| *candidate == id)
            .map(|(_, node)| node)
    }

    /// Number of formula nodes in the tree, root included.
    pub fn size(&self) -> usize {
        self.subformulas().count()
    }

    /// Height of the tree; a lone predicate has height 1.
    pub fn height(&self) -> usize {
        let mut depth = 0usize;
        let mut height = 0usize;
        for event in self.walk() {
            match event {
                WalkEvent::Enter(_) => {
                    depth += 1;
                    height = height.max(depth);
                }
                WalkEvent::Leave(_) => depth -= 1,
            }
        }
        height
    }
}

impl std::fmt::Display for Term {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.name)
    }
}
