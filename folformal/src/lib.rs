//! Folformal: first-order logic formulas in Unicode notation, from text to structural metrics.
//!
//! Pipeline
//!  - [`parser`] turns one formula string into a raw tree that mirrors the grammar: one
//!    chain per binary precedence level, parenthesized groups kept.
//!  - [`normalize`] folds the raw tree bottom-up into the canonical [`ast::Formula`]. Binary
//!    nodes always have two operands; negations and quantifiers are never collapsed away.
//!  - [`compose`] parses premises and a conclusion independently and joins them into the
//!    global conditional `(p₁ ∧ … ∧ pₙ) → c`.
//!  - [`metrics`] measures depth, scopes, variable binding and connective distribution.
//!  - [`render`] prints a formula back to text the parser accepts.
//!
//! Precedence, loosest first: `↔`, `→`, `⊕`, `∨`, `∧`, `¬`, `∀x`/`∃x`, predicate application.
//! Binary connectives associate to the left.
//!
//! Every stage is a pure function over immutable trees. The only resource control is the
//! nesting limit of [`options::ParseOptions`], enforced explicitly rather than left to the
//! call stack.
//!
//! Example
//! ```
//! use folformal::prelude::*;
//!
//! let global = compose_global_conditional(&["∀x (Human(x) → Mortal(x))", "Human(socrates)"], "Mortal(socrates)")
//!     .unwrap();
//! assert_eq!(global.kind(), NodeKind::Implies);
//! assert_eq!(
//!     render(&global),
//!     "∀x (Human(x) → Mortal(x)) ∧ Human(socrates) → Mortal(socrates)"
//! );
//!
//! let metrics = compute_metrics(&global);
//! assert_eq!(metrics.subformula_count, 8);
//! assert_eq!(metrics.variable_binding.bound, 2);
//! assert_eq!(metrics.variable_binding.free, 2);
//! ```

/// Canonical formula tree.
pub mod ast;
/// Global conditionals built from premises and a conclusion.
pub mod compose;
pub mod error;
/// Structural metrics.
pub mod metrics;
/// Raw tree to canonical formula.
pub mod normalize;
pub mod options;
/// Lexer and grammar.
pub mod parser;
pub mod raw;
/// Formula text output.
pub mod render;
/// Iterative depth-first traversal.
pub mod walker;

pub mod prelude {
    //! Convenient re-exports for end users.
    //!
    //! - Formula tree and kind tags
    //! - Parsing, composition and metrics entry points
    //! - Pretty-printing via `PrettyFormula`
    pub use crate::ast::{BinaryOp, Connective, Formula, NodeId, NodeKind, Quantifier, Term};
    pub use crate::compose::{GlobalConditionalComposer, compose_global_conditional};
    pub use crate::error::{ComposeItem, Error, FolResult, SyntaxError};
    pub use crate::metrics::{MetricsRecord, VariableBinding, compute_metrics};
    pub use crate::options::ParseOptions;
    pub use crate::parser::{FormulaParser, parse};
    pub use crate::render::{PrettyFormula, render};
    pub use crate::walker::{WalkEvent, Walker};
}
