//! Report layer on top of [`folformal`]: what downstream tooling consumes.
//!
//! - [`record`]: nested `{kind, value?, children}` records of formulas, both directions.
//! - [`analysis`]: JSON documents pairing rendered text, record and metrics.
//! - [`graph`]: petgraph graphs and Graphviz DOT text of formula trees.
//! - [`batch`]: parallel processing of dataset records with a caller-chosen failure policy.
//! - [`config`]: TOML configuration of the above.
//!
//! Example
//! ```
//! use folreport::analysis::GlobalConditionalAnalysis;
//! use folreport::config::ReportConfig;
//!
//! let config = ReportConfig::default();
//! let analysis = GlobalConditionalAnalysis::compose(
//!     &["∀x (Cat(x) → Mammal(x))", "Cat(tom)"],
//!     "Mammal(tom)",
//!     config.parse_options(),
//! )
//! .unwrap();
//! assert_eq!(analysis.global_conditional.metrics.quantifier_count, 1);
//! let json = analysis.to_json(config.pretty_json).unwrap();
//! assert!(json.contains("\"kind\": \"IMPLIES\""));
//! ```

pub mod analysis;
pub mod batch;
pub mod config;
pub mod error;
pub mod graph;
pub mod magic;
pub mod record;

pub use folformal;
