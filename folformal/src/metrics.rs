//! Structural metrics of a canonical formula.
//!
//! Everything is computed by [`compute_metrics`] in one pass over the enter/leave events of
//! a [`Walker`](crate::walker::Walker); no recursion is involved, so arbitrarily deep trees
//! are measured without touching the call stack.
use std::collections::BTreeMap;

use log::trace;
use strum::IntoEnumIterator;

use crate::ast::{Connective, Formula, NodeId};
use crate::walker::WalkEvent;

/// Bound and free occurrences of predicate arguments.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VariableBinding {
    /// Arguments resolved to an enclosing quantifier.
    pub bound: usize,
    /// Arguments with no enclosing quantifier of the same name, constants included.
    pub free: usize,
    /// Occurrences bound by each quantifier node. Quantifiers binding nothing map to zero.
    pub by_quantifier: BTreeMap<NodeId, usize>,
}

impl VariableBinding {
    pub fn occurrences(&self) -> usize {
        self.bound + self.free
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MetricsRecord {
    /// Height of the tree; a lone predicate has depth 1.
    pub total_depth: usize,
    /// Largest number of connective nodes on a root-to-leaf path.
    pub operator_depth: usize,
    /// Node count of the scope of each quantifier, the quantifier itself excluded.
    pub quantifier_scope: BTreeMap<NodeId, usize>,
    /// Node count of the subtree rooted at each connective, the connective included.
    pub connective_scope: BTreeMap<NodeId, usize>,
    pub variable_binding: VariableBinding,
    /// Number of formula nodes, root included. Predicate arguments are not counted.
    pub subformula_count: usize,
    pub quantifier_count: usize,
    /// Occurrences of every connective; connectives that do not occur map to zero.
    pub connective_distribution: BTreeMap<Connective, usize>,
}

impl MetricsRecord {
    /// Total number of connective nodes.
    pub fn connective_count(&self) -> usize {
        self.connective_distribution.values().sum()
    }
}

struct OpenNode {
    id: NodeId,
    connective: bool,
}

/// Measure `formula`. Pure and total: every canonical formula yields a record.
///
/// Example
/// ```
/// use folformal::metrics::compute_metrics;
/// use folformal::parser::parse;
///
/// let metrics = compute_metrics(&parse("∀x (P(x) → Q(x))").unwrap());
/// assert_eq!(metrics.total_depth, 3);
/// assert_eq!(metrics.variable_binding.bound, 2);
/// assert_eq!(metrics.variable_binding.free, 0);
/// ```
pub fn compute_metrics(formula: &Formula) -> MetricsRecord {
    let mut record = MetricsRecord {
        connective_distribution: Connective::iter().map(|c| (c, 0)).collect(),
        ..Default::default()
    };

    let mut next_id = 0usize;
    let mut open: Vec<OpenNode> = Vec::new();
    let mut connectives_on_path = 0usize;
    // Innermost binder last.
    let mut binders: Vec<(&str, NodeId)> = Vec::new();

    for event in formula.walk() {
        match event {
            WalkEvent::Enter(node) => {
                let id = NodeId(next_id);
                next_id += 1;

                let connective = node.connective().is_some();
                if connective {
                    connectives_on_path += 1;
                    record.operator_depth = record.operator_depth.max(connectives_on_path);
                }
                open.push(OpenNode { id, connective });
                record.total_depth = record.total_depth.max(open.len());

                match node {
                    Formula::Quantified { variable, .. } => {
                        binders.push((variable.as_str(), id));
                        record.variable_binding.by_quantifier.insert(id, 0);
                    }
                    Formula::Predicate { args, .. } => {
                        for arg in args {
                            let binder = binders
                                .iter()
                                .rev()
                                .find(|(variable, _)| *variable == arg.name());
                            match binder {
                                Some((_, quantifier)) => {
                                    record.variable_binding.bound += 1;
                                    *record
                                        .variable_binding
                                        .by_quantifier
                                        .entry(*quantifier)
                                        .or_default() += 1;
                                }
                                None => record.variable_binding.free += 1,
                            }
                        }
                    }
                    Formula::Binary { .. } | Formula::Not(_) | Formula::Verum => {}
                }
            }
            WalkEvent::Leave(node) => {
                // Enter and Leave events are balanced.
                let Some(OpenNode { id, connective }) = open.pop() else {
                    continue;
                };
                let size = next_id - id.0;

                if connective {
                    connectives_on_path -= 1;
                    record.connective_scope.insert(id, size);
                }
                if let Some(kind) = node.connective() {
                    *record.connective_distribution.entry(kind).or_default() += 1;
                }
                if let Formula::Quantified { .. } = node {
                    binders.pop();
                    record.quantifier_scope.insert(id, size - 1);
                    record.quantifier_count += 1;
                }
            }
        }
    }

    record.subformula_count = next_id;
    trace!(
        "Computed metrics over {} node(s), depth {}",
        record.subformula_count, record.total_depth
    );
    record
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;

    #[test]
    fn single_predicate() {
        let m = compute_metrics(&parse("P(a)").unwrap());
        assert_eq!(m.total_depth, 1);
        assert_eq!(m.operator_depth, 0);
        assert_eq!(m.subformula_count, 1);
        assert_eq!(m.variable_binding.free, 1);
        assert_eq!(m.connective_count(), 0);
        assert_eq!(m.connective_distribution.len(), 6);
    }

    #[test]
    fn innermost_binder_wins() {
        // The inner ∃x shadows the outer ∀x for Q(x) only.
        let m = compute_metrics(&parse("∀x (P(x) ∧ ∃x Q(x, y))").unwrap());
        let binding = &m.variable_binding;
        assert_eq!(binding.bound, 2);
        assert_eq!(binding.free, 1);
        assert_eq!(
            binding.by_quantifier,
            BTreeMap::from([(NodeId(0), 1), (NodeId(3), 1)])
        );
    }

    #[test]
    fn scopes_are_keyed_by_preorder_id() {
        // #0 ∀, #1 →, #2 P, #3 ¬, #4 Q
        let m = compute_metrics(&parse("∀x (P(x) → ¬Q(x))").unwrap());
        assert_eq!(m.quantifier_scope, BTreeMap::from([(NodeId(0), 4)]));
        assert_eq!(
            m.connective_scope,
            BTreeMap::from([(NodeId(1), 4), (NodeId(3), 2)])
        );
        assert_eq!(m.operator_depth, 2);
        assert_eq!(m.total_depth, 4);
        assert_eq!(m.quantifier_count, 1);
    }

    #[test]
    fn quantifier_binding_nothing_is_reported() {
        let m = compute_metrics(&parse("∃y P(a)").unwrap());
        assert_eq!(m.variable_binding.by_quantifier, BTreeMap::from([(NodeId(0), 0)]));
        assert_eq!(m.variable_binding.free, 1);
    }

    #[test]
    fn distribution_counts_every_connective() {
        let m = compute_metrics(&parse("(A ∧ B) ∨ (C ⊕ ¬D) → (E ↔ F ∧ G)").unwrap());
        let expected = [
            (Connective::And, 2),
            (Connective::Or, 1),
            (Connective::Xor, 1),
            (Connective::Implies, 1),
            (Connective::Bicond, 1),
            (Connective::Not, 1),
        ];
        assert_eq!(m.connective_distribution, BTreeMap::from(expected));
        assert_eq!(m.connective_count(), 7);
    }
}
