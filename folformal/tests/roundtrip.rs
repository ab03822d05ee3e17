use folformal::ast::{BinaryOp, Formula, Quantifier, Term};
use folformal::normalize::normalize;
use folformal::parser::parse;
use folformal::raw::RawTree;
use folformal::render::{PrettyFormula, render};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;

const PREDICATES: [&str; 5] = ["P", "Q", "Loves", "Ärger", "is_red"];
const TERMS: [&str; 6] = ["x", "y", "z", "a", "bob", "c_1"];
const VARIABLES: [&str; 3] = ["x", "y", "z"];
const BINARY: [BinaryOp; 5] = [
    BinaryOp::Bicond,
    BinaryOp::Implies,
    BinaryOp::Xor,
    BinaryOp::Or,
    BinaryOp::And,
];

fn random_args(rng: &mut impl Rng) -> Vec<Term> {
    let arity = rng.random_range(0..=3);
    (0..arity)
        .map(|_| Term::new(TERMS[rng.random_range(0..TERMS.len())]))
        .collect()
}

fn random_quantifier(rng: &mut impl Rng) -> (Quantifier, &'static str) {
    let quantifier = if rng.random_bool(0.5) {
        Quantifier::Forall
    } else {
        Quantifier::Exists
    };
    (quantifier, VARIABLES[rng.random_range(0..VARIABLES.len())])
}

fn random_formula(budget: usize, rng: &mut impl Rng) -> Formula {
    if budget == 0 || rng.random_bool(0.2) {
        return Formula::Predicate {
            name: PREDICATES[rng.random_range(0..PREDICATES.len())].to_string(),
            args: random_args(rng),
        };
    }

    match rng.random_range(0..=6) {
        0..=4 => {
            let op = BINARY[rng.random_range(0..BINARY.len())];
            let lhs = random_formula(budget - 1, rng);
            let rhs = random_formula(budget - 1, rng);
            Formula::binary(op, lhs, rhs)
        }
        5 => Formula::not(random_formula(budget - 1, rng)),
        _ => {
            let (quantifier, variable) = random_quantifier(rng);
            Formula::quantified(quantifier, variable, random_formula(budget - 1, rng))
        }
    }
}

/// Raw trees as the grammar could shape them: chains of any length, groups anywhere.
fn random_raw(budget: usize, rng: &mut impl Rng) -> RawTree {
    if budget == 0 || rng.random_bool(0.2) {
        return RawTree::Predicate {
            name: PREDICATES[rng.random_range(0..PREDICATES.len())].to_string(),
            args: random_args(rng),
        };
    }

    match rng.random_range(0..=7) {
        0..=3 => {
            let op = BINARY[rng.random_range(0..BINARY.len())];
            let first = random_raw(budget - 1, rng);
            let rest = (0..rng.random_range(0..=3))
                .map(|_| random_raw(budget - 1, rng))
                .collect();
            RawTree::chain(op, first, rest)
        }
        4 => RawTree::Group(Box::new(random_raw(budget - 1, rng))),
        5 => RawTree::Not(Box::new(random_raw(budget - 1, rng))),
        _ => {
            let (quantifier, variable) = random_quantifier(rng);
            RawTree::Quantified {
                quantifier,
                variable: variable.to_string(),
                body: Box::new(random_raw(budget - 1, rng)),
            }
        }
    }
}

#[test]
fn render_then_parse_is_identity() {
    let mut rng = ChaCha20Rng::seed_from_u64(0x42);
    for _ in 0..500 {
        let formula = random_formula(7, &mut rng);
        let text = render(&formula);
        let reparsed = parse(&text).unwrap_or_else(|e| panic!("`{text}` failed to parse: {e}"));
        assert_eq!(reparsed, formula, "round trip changed `{text}`");
    }
}

#[test]
fn wrapped_output_parses_back() {
    let mut rng = ChaCha20Rng::seed_from_u64(0x1337);
    for _ in 0..100 {
        let formula = random_formula(6, &mut rng);
        let text = formula.pretty_string(24);
        assert_eq!(parse(&text).unwrap(), formula);
    }
}

#[test]
fn normalization_is_idempotent() {
    let mut rng = ChaCha20Rng::seed_from_u64(0xfeed);
    for _ in 0..500 {
        let raw = random_raw(6, &mut rng);
        let once = normalize(raw).unwrap();
        let twice = normalize(RawTree::from(once.clone())).unwrap();
        assert_eq!(twice, once);
    }
}

#[test]
fn normalized_binary_nodes_have_two_operands() {
    let mut rng = ChaCha20Rng::seed_from_u64(7);
    for _ in 0..200 {
        let raw = random_raw(6, &mut rng);
        let chains = count_chain_operators(&raw);
        let formula = normalize(raw).unwrap();
        let binaries = formula
            .subformulas()
            .filter(|(_, n)| matches!(n, Formula::Binary { .. }))
            .count();
        assert_eq!(binaries, chains);
        assert!(
            formula
                .subformulas()
                .all(|(_, n)| n.children().len() == n.kind().arity())
        );
    }
}

/// Number of binary operators written in a raw tree: `n - 1` for a chain of `n` operands.
fn count_chain_operators(raw: &RawTree) -> usize {
    match raw {
        RawTree::Chain { first, rest, .. } => {
            let nested: usize = rest.iter().map(count_chain_operators).sum();
            rest.len() + count_chain_operators(first) + nested
        }
        RawTree::Not(inner) | RawTree::Group(inner) => count_chain_operators(inner),
        RawTree::Quantified { body, .. } => count_chain_operators(body),
        RawTree::Predicate { .. } | RawTree::Verum => 0,
    }
}
