//! Nested `{kind, value?, children}` records of formulas.
//!
//! This is the shape consumed outside the crate: every formula node becomes a record whose
//! `kind` is the node tag (`"AND"`, `"FORALL"`, `"PREDICATE"`, ...). Quantifiers carry their
//! bound variable and predicates their name as `value`. Predicate arguments appear as
//! `{"kind": "TERM", "value": ...}` children.
//!
//! Conversion from a [`Formula`] is iterative. Conversion back validates kinds, arity and
//! values, and reports the first problem with the path of the offending record.
use folformal::ast::{BinaryOp, Formula, NodeKind, Quantifier, Term};
use folformal::walker::WalkEvent;
use serde::{Deserialize, Serialize};

use crate::error::{ReportError, ReportResult};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AstRecord {
    pub kind: NodeKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(default)]
    pub children: Vec<AstRecord>,
}

impl AstRecord {
    fn leaf(kind: NodeKind, value: Option<String>) -> Self {
        Self {
            kind,
            value,
            children: Vec::new(),
        }
    }

    fn term(term: &Term) -> Self {
        Self::leaf(NodeKind::Term, Some(term.name().to_string()))
    }

    /// Number of records in this tree, terms included.
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(AstRecord::node_count).sum::<usize>()
    }
}

impl From<&Formula> for AstRecord {
    fn from(formula: &Formula) -> Self {
        // Records still waiting for their children, innermost last.
        let mut open: Vec<AstRecord> = Vec::new();
        let mut root = None;

        for event in formula.walk() {
            match event {
                WalkEvent::Enter(node) => {
                    let mut record = AstRecord::leaf(node.kind(), node.value().map(str::to_string));
                    if let Formula::Predicate { args, .. } = node {
                        record.children = args.iter().map(AstRecord::term).collect();
                    }
                    open.push(record);
                }
                WalkEvent::Leave(_) => {
                    let Some(done) = open.pop() else { continue };
                    match open.last_mut() {
                        Some(parent) => parent.children.push(done),
                        None => root = Some(done),
                    }
                }
            }
        }

        // The walk always enters and leaves the root.
        root.unwrap_or_else(|| AstRecord::leaf(formula.kind(), None))
    }
}

impl From<Formula> for AstRecord {
    fn from(formula: Formula) -> Self {
        AstRecord::from(&formula)
    }
}

impl TryFrom<AstRecord> for Formula {
    type Error = ReportError;

    fn try_from(record: AstRecord) -> ReportResult<Self> {
        formula_at(record, String::new())
    }
}

impl TryFrom<&AstRecord> for Formula {
    type Error = ReportError;

    fn try_from(record: &AstRecord) -> ReportResult<Self> {
        Formula::try_from(record.clone())
    }
}

fn child_path(path: &str, index: usize) -> String {
    format!("{path}/children/{index}")
}

fn expect_arity(record: &AstRecord, path: &str) -> ReportResult<()> {
    let expected = record.kind.arity();
    if record.children.len() != expected {
        return Err(ReportError::invalid(
            format!("{path}/children"),
            format!(
                "{} expects {expected} child(ren), found {}",
                record.kind.name(),
                record.children.len()
            ),
        ));
    }
    Ok(())
}

fn expect_no_value(record: &AstRecord, path: &str) -> ReportResult<()> {
    match &record.value {
        Some(value) => Err(ReportError::invalid(
            format!("{path}/value"),
            format!("{} carries no value, found `{value}`", record.kind.name()),
        )),
        None => Ok(()),
    }
}

fn expect_value(record: &mut AstRecord, path: &str) -> ReportResult<String> {
    match record.value.take() {
        Some(value) if !value.is_empty() => Ok(value),
        _ => Err(ReportError::invalid(
            format!("{path}/value"),
            format!("{} requires a non-empty value", record.kind.name()),
        )),
    }
}

fn binary_op(kind: NodeKind) -> Option<BinaryOp> {
    match kind {
        NodeKind::And => Some(BinaryOp::And),
        NodeKind::Or => Some(BinaryOp::Or),
        NodeKind::Xor => Some(BinaryOp::Xor),
        NodeKind::Implies => Some(BinaryOp::Implies),
        NodeKind::Bicond => Some(BinaryOp::Bicond),
        _ => None,
    }
}

fn formula_at(mut record: AstRecord, path: String) -> ReportResult<Formula> {
    match record.kind {
        NodeKind::And | NodeKind::Or | NodeKind::Xor | NodeKind::Implies | NodeKind::Bicond => {
            expect_no_value(&record, &path)?;
            expect_arity(&record, &path)?;
            let op = binary_op(record.kind)
                .ok_or_else(|| ReportError::invalid(&path, "not a binary connective"))?;
            let mut children = record.children.into_iter();
            let (Some(lhs), Some(rhs)) = (children.next(), children.next()) else {
                return Err(ReportError::invalid(&path, "missing operand"));
            };
            let lhs = formula_at(lhs, child_path(&path, 0))?;
            let rhs = formula_at(rhs, child_path(&path, 1))?;
            Ok(Formula::binary(op, lhs, rhs))
        }
        NodeKind::Not => {
            expect_no_value(&record, &path)?;
            expect_arity(&record, &path)?;
            let inner = record
                .children
                .pop()
                .ok_or_else(|| ReportError::invalid(&path, "missing operand"))?;
            Ok(Formula::not(formula_at(inner, child_path(&path, 0))?))
        }
        NodeKind::Forall | NodeKind::Exists => {
            expect_arity(&record, &path)?;
            let quantifier = if record.kind == NodeKind::Forall {
                Quantifier::Forall
            } else {
                Quantifier::Exists
            };
            let variable = expect_value(&mut record, &path)?;
            let scope = record
                .children
                .pop()
                .ok_or_else(|| ReportError::invalid(&path, "missing scope"))?;
            let scope = formula_at(scope, child_path(&path, 0))?;
            Ok(Formula::quantified(quantifier, variable, scope))
        }
        NodeKind::Predicate => {
            let name = expect_value(&mut record, &path)?;
            let args = record
                .children
                .into_iter()
                .enumerate()
                .map(|(index, mut child)| {
                    let path = child_path(&path, index);
                    if child.kind != NodeKind::Term {
                        return Err(ReportError::invalid(
                            format!("{path}/kind"),
                            format!("predicate arguments must be TERM, found {}", child.kind.name()),
                        ));
                    }
                    expect_arity(&child, &path)?;
                    Ok(Term::new(expect_value(&mut child, &path)?))
                })
                .collect::<ReportResult<Vec<_>>>()?;
            Ok(Formula::Predicate { name, args })
        }
        NodeKind::Verum => {
            expect_no_value(&record, &path)?;
            expect_arity(&record, &path)?;
            Ok(Formula::Verum)
        }
        NodeKind::Term => Err(ReportError::invalid(
            format!("{path}/kind"),
            "TERM only appears as a predicate argument",
        )),
    }
}
