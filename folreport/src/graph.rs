//! Formula trees as petgraph graphs and Graphviz DOT text.
use folformal::ast::Formula;
use folformal::render::render;
use folformal::walker::WalkEvent;
use petgraph::dot::{Config, Dot};
use petgraph::graph::{DiGraph, NodeIndex};

/// Label of a single node: connective symbol, `∀x`/`∃x`, or the predicate application.
pub fn node_label(node: &Formula) -> String {
    match node {
        Formula::Binary { op, .. } => op.symbol().to_string(),
        Formula::Not(_) => "¬".to_string(),
        Formula::Quantified {
            quantifier,
            variable,
            ..
        } => format!("{}{}", quantifier.symbol(), variable),
        Formula::Predicate { .. } | Formula::Verum => render(node),
    }
}

/// One graph node per formula node, in pre-order, so node index `i` is `NodeId(i)`.
/// Edges go from parent to child and are weighted by the child position.
pub fn formula_graph(formula: &Formula) -> DiGraph<String, usize> {
    let mut graph = DiGraph::new();
    // (graph node, children added so far), innermost last
    let mut open: Vec<(NodeIndex, usize)> = Vec::new();

    for event in formula.walk() {
        match event {
            WalkEvent::Enter(node) => {
                let index = graph.add_node(node_label(node));
                if let Some((parent, position)) = open.last_mut() {
                    graph.add_edge(*parent, index, *position);
                    *position += 1;
                }
                open.push((index, 0));
            }
            WalkEvent::Leave(_) => {
                open.pop();
            }
        }
    }
    graph
}

/// DOT text of the formula tree, ready for Graphviz.
pub fn to_dot(formula: &Formula) -> String {
    let graph = formula_graph(formula);
    format!("{}", Dot::with_config(&graph, &[Config::EdgeNoLabel]))
}
