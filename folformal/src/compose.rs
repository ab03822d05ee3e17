//! Global conditionals: `(premise₁ ∧ … ∧ premiseₙ) → conclusion`.
//!
//! Every premise and the conclusion is parsed on its own and the resulting trees are joined
//! afterwards. Formula texts are never concatenated, so a long premise list cannot lose
//! operands to the grammar.
use log::debug;

use crate::ast::Formula;
use crate::error::{ComposeItem, Error, FolResult};
use crate::options::ParseOptions;
use crate::parser::FormulaParser;

/// Compose with the default [`ParseOptions`]. See [`GlobalConditionalComposer::compose`].
///
/// Example
/// ```
/// use folformal::ast::Formula;
/// use folformal::compose::compose_global_conditional;
///
/// let f = compose_global_conditional(&["A(a)", "B(b)"], "C(c)").unwrap();
/// assert_eq!(
///     f,
///     Formula::implies(
///         Formula::and(Formula::predicate("A", ["a"]), Formula::predicate("B", ["b"])),
///         Formula::predicate("C", ["c"]),
///     )
/// );
/// ```
pub fn compose_global_conditional<S: AsRef<str>>(
    premises: &[S],
    conclusion: &str,
) -> FolResult<Formula> {
    GlobalConditionalComposer::default().compose(premises, conclusion)
}

/// Left fold of already parsed premises into a conjunction, in input order.
///
/// Returns [`Formula::Verum`] for an empty list and the premise itself for a single one.
pub fn conjoin(premises: impl IntoIterator<Item = Formula>) -> Formula {
    let mut premises = premises.into_iter();
    match premises.next() {
        Some(first) => premises.fold(first, Formula::and),
        None => Formula::Verum,
    }
}

/// Composer holding the parser used for every premise and the conclusion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GlobalConditionalComposer {
    parser: FormulaParser,
}

impl GlobalConditionalComposer {
    pub fn new(options: ParseOptions) -> Self {
        Self {
            parser: FormulaParser::new(options),
        }
    }

    /// Build `IMPLIES(conjunction of premises, conclusion)`.
    ///
    /// - Premises are folded left in input order, without reordering or deduplication.
    /// - A single premise is used as is, with no `AND` wrapper.
    /// - Zero premises yield the [`Formula::Verum`] antecedent.
    ///
    /// The first item that fails to parse aborts the whole composition with
    /// [`Error::Composition`] naming it. The depth limit applies to each item on its own; the
    /// premise fold adds no nesting, so any number of premises can be composed.
    ///
    /// With zero premises the result renders as `⊤ → conclusion`. `⊤` is not part of the input
    /// alphabet, so that text does not parse back; convert through a record instead.
    pub fn compose<S: AsRef<str>>(&self, premises: &[S], conclusion: &str) -> FolResult<Formula> {
        let premises = premises
            .iter()
            .enumerate()
            .map(|(index, premise)| {
                self.parser
                    .parse(premise.as_ref())
                    .map_err(|source| Error::Composition {
                        item: ComposeItem::Premise(index),
                        source: Box::new(source),
                    })
            })
            .collect::<FolResult<Vec<_>>>()?;

        let conclusion = self
            .parser
            .parse(conclusion)
            .map_err(|source| Error::Composition {
                item: ComposeItem::Conclusion,
                source: Box::new(source),
            })?;

        debug!(
            "Composing global conditional from {} premise(s)",
            premises.len()
        );
        Ok(Formula::implies(conjoin(premises), conclusion))
    }
}
