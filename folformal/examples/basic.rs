use folformal::prelude::*;

fn main() {
    let premises = [
        "∀x (Orchid(x) → Flower(x))",
        "∀x (Flower(x) → ∃y (Pollinator(y) ∧ Visits(y, x)))",
        "Orchid(vanilla)",
    ];
    let conclusion = "∃y (Pollinator(y) ∧ Visits(y, vanilla))";

    let global = match compose_global_conditional(&premises, conclusion) {
        Ok(global) => global,
        Err(e) => {
            eprintln!("{e}");
            return;
        }
    };
    global.pretty_print().unwrap();

    let metrics = compute_metrics(&global);
    println!("total depth:      {}", metrics.total_depth);
    println!("operator depth:   {}", metrics.operator_depth);
    println!("subformulas:      {}", metrics.subformula_count);
    println!("quantifiers:      {}", metrics.quantifier_count);
    println!(
        "bound / free:     {} / {}",
        metrics.variable_binding.bound, metrics.variable_binding.free
    );
    for (connective, count) in &metrics.connective_distribution {
        println!("{:<17} {count}", format!("{connective:?}:"));
    }
}
