//! JSON analysis documents: formula text, nested record and metrics side by side.
use std::io::Write;

use folformal::ast::{Formula, NodeId, NodeKind};
use folformal::compose::GlobalConditionalComposer;
use folformal::metrics::{MetricsRecord, compute_metrics};
use folformal::options::ParseOptions;
use folformal::parser::FormulaParser;
use folformal::render::render;
use folformal::walker::WalkEvent;
use serde::{Deserialize, Serialize};

use crate::error::ReportResult;
use crate::record::AstRecord;

fn to_json<T: Serialize>(value: &T, pretty: bool) -> ReportResult<String> {
    let json = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    Ok(json)
}

fn write_json<T: Serialize, W: Write>(value: &T, writer: W, pretty: bool) -> ReportResult<()> {
    if pretty {
        serde_json::to_writer_pretty(writer, value)?;
    } else {
        serde_json::to_writer(writer, value)?;
    }
    Ok(())
}

/// A formula node listed with its own rendered text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubformulaEntry {
    pub id: NodeId,
    pub kind: NodeKind,
    /// Distance from the root; the root has depth 0.
    pub depth: usize,
    /// Number of formula children, terms excluded.
    pub children: usize,
    pub text: String,
}

/// Every formula node of `formula` in pre-order, so `entries[i].id == NodeId(i)`.
pub fn subformula_entries(formula: &Formula) -> Vec<SubformulaEntry> {
    let mut entries = Vec::new();
    let mut depth = 0usize;
    for event in formula.walk() {
        match event {
            WalkEvent::Enter(node) => {
                entries.push(SubformulaEntry {
                    id: NodeId(entries.len()),
                    kind: node.kind(),
                    depth,
                    children: node.children().len(),
                    text: render(node),
                });
                depth += 1;
            }
            WalkEvent::Leave(_) => depth -= 1,
        }
    }
    entries
}

/// One formula described several ways.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormulaAnalysis {
    /// Input text exactly as given, when the formula was parsed from text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    /// Rendered formula text.
    pub formula: String,
    pub ast: AstRecord,
    pub metrics: MetricsRecord,
    #[serde(default)]
    pub subformulas: Vec<SubformulaEntry>,
}

impl FormulaAnalysis {
    pub fn new(formula: &Formula) -> Self {
        Self {
            source: None,
            formula: render(formula),
            ast: AstRecord::from(formula),
            metrics: compute_metrics(formula),
            subformulas: subformula_entries(formula),
        }
    }

    /// Parse `src` and analyse the result, keeping `src` verbatim.
    pub fn parse(src: &str, options: ParseOptions) -> ReportResult<Self> {
        let formula = FormulaParser::new(options).parse(src)?;
        Ok(Self {
            source: Some(src.to_string()),
            ..Self::new(&formula)
        })
    }

    pub fn to_json(&self, pretty: bool) -> ReportResult<String> {
        to_json(self, pretty)
    }

    pub fn write_json<W: Write>(&self, writer: W, pretty: bool) -> ReportResult<()> {
        write_json(self, writer, pretty)
    }
}

/// Premises and conclusion as given, and the analysis of the global conditional built from
/// them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlobalConditionalAnalysis {
    pub premises: Vec<String>,
    pub conclusion: String,
    pub global_conditional: FormulaAnalysis,
}

impl GlobalConditionalAnalysis {
    pub fn compose<S: AsRef<str>>(
        premises: &[S],
        conclusion: &str,
        options: ParseOptions,
    ) -> ReportResult<Self> {
        let global = GlobalConditionalComposer::new(options).compose(premises, conclusion)?;
        Ok(Self {
            premises: premises.iter().map(|p| p.as_ref().to_string()).collect(),
            conclusion: conclusion.to_string(),
            global_conditional: FormulaAnalysis::new(&global),
        })
    }

    pub fn to_json(&self, pretty: bool) -> ReportResult<String> {
        to_json(self, pretty)
    }

    pub fn write_json<W: Write>(&self, writer: W, pretty: bool) -> ReportResult<()> {
        write_json(self, writer, pretty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};

    #[test]
    fn metrics_are_keyed_by_name() {
        let analysis = FormulaAnalysis::parse("∀x (P(x) → Q(x))", ParseOptions::default()).unwrap();
        let value: Value = serde_json::from_str(&analysis.to_json(false).unwrap()).unwrap();

        assert_eq!(value["formula"], "∀x (P(x) → Q(x))");
        assert_eq!(value["ast"]["kind"], "FORALL");
        let metrics = &value["metrics"];
        assert_eq!(metrics["total_depth"], 3);
        assert_eq!(metrics["operator_depth"], 1);
        assert_eq!(metrics["subformula_count"], 4);
        assert_eq!(metrics["quantifier_count"], 1);
        assert_eq!(metrics["quantifier_scope"], json!({"0": 3}));
        assert_eq!(metrics["connective_scope"], json!({"1": 3}));
        assert_eq!(
            metrics["variable_binding"],
            json!({"bound": 2, "free": 0, "by_quantifier": {"0": 2}})
        );
        assert_eq!(
            metrics["connective_distribution"],
            json!({"AND": 0, "OR": 0, "XOR": 0, "IMPLIES": 1, "BICOND": 0, "NOT": 0})
        );
    }

    #[test]
    fn documents_deserialize_back() {
        let analysis =
            GlobalConditionalAnalysis::compose(&["A(a)", "B(b)"], "C(c)", ParseOptions::default())
                .unwrap();
        let mut buf = Vec::new();
        analysis.write_json(&mut buf, true).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.contains('\n'));

        let back: GlobalConditionalAnalysis = serde_json::from_str(&text).unwrap();
        assert_eq!(back, analysis);
        assert_eq!(back.global_conditional.formula, "A(a) ∧ B(b) → C(c)");
        assert_eq!(back.global_conditional.metrics.subformula_count, 5);
        assert_eq!(
            Formula::try_from(back.global_conditional.ast).unwrap(),
            folformal::parser::parse("A(a) ∧ B(b) → C(c)").unwrap()
        );
    }

    #[test]
    fn parsed_source_is_kept_verbatim() {
        let src = "∀x(P(x)→Q(x))";
        let analysis = FormulaAnalysis::parse(src, ParseOptions::default()).unwrap();
        assert_eq!(analysis.source.as_deref(), Some(src));
        assert_eq!(analysis.formula, "∀x (P(x) → Q(x))");

        let value: Value = serde_json::from_str(&analysis.to_json(false).unwrap()).unwrap();
        assert_eq!(value["source"], src);

        let built = FormulaAnalysis::new(&folformal::parser::parse(src).unwrap());
        assert_eq!(built.source, None);
        let value: Value = serde_json::from_str(&built.to_json(false).unwrap()).unwrap();
        assert!(value.get("source").is_none());
    }

    #[test]
    fn subformulas_are_listed_in_pre_order() {
        let analysis = FormulaAnalysis::parse("∀x (P(x) → Q(x))", ParseOptions::default()).unwrap();
        let listed: Vec<_> = analysis
            .subformulas
            .iter()
            .map(|e| (e.id.0, e.kind, e.depth, e.children, e.text.as_str()))
            .collect();
        assert_eq!(
            listed,
            vec![
                (0, NodeKind::Forall, 0, 1, "∀x (P(x) → Q(x))"),
                (1, NodeKind::Implies, 1, 2, "P(x) → Q(x)"),
                (2, NodeKind::Predicate, 2, 0, "P(x)"),
                (3, NodeKind::Predicate, 2, 0, "Q(x)"),
            ]
        );

        let value: Value = serde_json::from_str(&analysis.to_json(false).unwrap()).unwrap();
        assert_eq!(
            value["subformulas"][1],
            json!({"id": 1, "kind": "IMPLIES", "depth": 1, "children": 2, "text": "P(x) → Q(x)"})
        );
    }

    #[test]
    fn subformula_texts_parse_back_to_their_nodes() {
        let f = folformal::parser::parse("¬(A(a) ∨ B(b)) ⊕ ∃y C(y)").unwrap();
        let entries = subformula_entries(&f);
        assert_eq!(entries.len(), f.size());
        for entry in &entries {
            let node = f.node(entry.id).unwrap();
            assert_eq!(folformal::parser::parse(&entry.text).unwrap(), *node);
        }
    }

    #[test]
    fn composition_failures_are_forwarded() {
        let err = GlobalConditionalAnalysis::compose(&["A(a", "B(b)"], "C(c)", ParseOptions::default())
            .unwrap_err();
        assert!(err.is_formula());
    }
}
