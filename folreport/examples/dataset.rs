//! Analyse dataset records read as JSON lines from stdin, one JSON document per record on
//! stdout.
//!
//! ```text
//! echo '{"premises": ["∀x (P(x) → Q(x))", "P(a)"], "conclusion": "Q(a)"}' \
//!     | cargo run -p folreport --example dataset
//! ```
use std::io::{self, Write};

use folreport::batch::{BatchDriver, DatasetRecord};
use folreport::config::ReportConfig;
use folreport::error::ReportResult;
use folreport::folformal::ast::Formula;
use folreport::graph::to_dot;

fn main() -> ReportResult<()> {
    let config = ReportConfig::load_or_default()?;
    let records = DatasetRecord::read_json_lines(io::stdin().lock())?;
    let pretty = config.pretty_json;

    let summary = BatchDriver::new(config).run(&records)?;

    let mut stdout = io::stdout().lock();
    for (index, analysis) in summary.analyses() {
        analysis.write_json(&mut stdout, pretty)?;
        writeln!(stdout)?;
        let formula = Formula::try_from(&analysis.global_conditional.ast)?;
        eprintln!("record {index}:\n{}", to_dot(&formula));
    }
    for (index, error) in summary.failures() {
        eprintln!("record {index} failed: {error}");
    }
    Ok(())
}
