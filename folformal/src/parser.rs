//! Parser for first-order formulas in Unicode notation, using chumsky.
//!
//! Role
//! - Turn formula text into a [`RawTree`] that mirrors the grammar, then into a canonical
//!   [`Formula`] through [`crate::normalize`].
//! - Accept exactly what [`crate::render`] produces, so rendering and parsing round-trip.
//!
//! Two stages:
//! 1) Tokenisation from input string to a spanned `Token` stream.
//! 2) Parsing the tokens into a raw tree, one repetition rule per precedence level.
//!
//! Accepted syntax:
//! - Predicates: `Name(a, b)`, `Name()` or a bare `Name`. Identifiers are sequences of Unicode
//!   letters, digits and `_`, kept verbatim.
//! - Connectives, loosest first: `↔`, `→`, `⊕`, `∨`, `∧`; every level is left-associative.
//! - Prefix operators binding tighter than any connective: `¬φ`, `∀x φ`, `∃x φ`, where φ is a
//!   negation, a quantified formula, a predicate or a parenthesized formula.
//! - Parentheses can wrap any formula.
//!
//! Parsing never recovers from errors: the first problem is reported as a [`SyntaxError`] and
//! no tree is returned.
use chumsky::{input::ValueInput, prelude::*};
use log::trace;

use crate::ast::{BinaryOp, Formula, Quantifier, Term};
use crate::error::{Error, FolResult, SyntaxError};
use crate::normalize::normalize_with;
use crate::options::ParseOptions;
use crate::raw::RawTree;

pub type Spanned<T> = (T, SimpleSpan);
type Span = SimpleSpan;

const END_OF_INPUT: &str = "end of input";

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
enum Token {
    // Delimiters & punctuation
    LParen,
    RParen,
    Comma,

    // Connectives
    Not,
    And,
    Or,
    Xor,
    Implies,
    Bicond,

    // Quantifiers
    ForAll,
    Exists,

    // Predicate names, variables and constants
    Ident(String),
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Token::LParen => write!(f, "("),
            Token::RParen => write!(f, ")"),
            Token::Comma => write!(f, ","),
            Token::Not => write!(f, "¬"),
            Token::And => write!(f, "∧"),
            Token::Or => write!(f, "∨"),
            Token::Xor => write!(f, "⊕"),
            Token::Implies => write!(f, "→"),
            Token::Bicond => write!(f, "↔"),
            Token::ForAll => write!(f, "∀"),
            Token::Exists => write!(f, "∃"),
            Token::Ident(name) => write!(f, "{name}"),
        }
    }
}

impl From<BinaryOp> for Token {
    fn from(op: BinaryOp) -> Self {
        match op {
            BinaryOp::Bicond => Token::Bicond,
            BinaryOp::Implies => Token::Implies,
            BinaryOp::Xor => Token::Xor,
            BinaryOp::Or => Token::Or,
            BinaryOp::And => Token::And,
        }
    }
}

// ---------------- Lexer ----------------

fn lexer<'src>() -> impl Parser<'src, &'src str, Vec<Spanned<Token>>, extra::Err<Rich<'src, char>>>
{
    let symbol = choice((
        just('∧').to(Token::And),
        just('∨').to(Token::Or),
        just('⊕').to(Token::Xor),
        just('→').to(Token::Implies),
        just('↔').to(Token::Bicond),
        just('¬').to(Token::Not),
        just('∀').to(Token::ForAll),
        just('∃').to(Token::Exists),
        just('(').to(Token::LParen),
        just(')').to(Token::RParen),
        just(',').to(Token::Comma),
    ));

    let ident = any()
        .filter(|c: &char| c.is_alphanumeric() || *c == '_')
        .repeated()
        .at_least(1)
        .to_slice()
        .map(|s: &str| Token::Ident(s.to_string()))
        .labelled("identifier");

    symbol
        .or(ident)
        .map_with(|tok, e| (tok, e.span()))
        .padded()
        .repeated()
        .collect()
        .then_ignore(end())
}

/// Reject inputs nesting deeper than `limit` before the recursive grammar sees them.
///
/// Nesting is the number of open parentheses plus the `¬`/`∀`/`∃` prefixes still pending at
/// each parenthesis level; a binary connective closes the pending prefixes of its level.
/// The argument list of a predicate, a `(` right after a predicate name, does not nest.
fn check_nesting(tokens: &[Spanned<Token>], limit: usize) -> FolResult<()> {
    let mut pending: Vec<usize> = vec![0];
    let mut depth = 0usize;
    let mut in_arguments = false;
    // The identifier after `∀`/`∃` is the bound variable, never a predicate name.
    let mut after_binder = false;
    let mut after_name = false;

    for (token, span) in tokens {
        if in_arguments {
            match token {
                Token::Ident(_) | Token::Comma => continue,
                Token::RParen => {
                    in_arguments = false;
                    after_name = false;
                    continue;
                }
                // Malformed argument list; the grammar reports it.
                _ => in_arguments = false,
            }
        }

        match token {
            Token::LParen if after_name => in_arguments = true,
            Token::LParen => {
                pending.push(0);
                depth += 1;
            }
            Token::RParen => {
                // An unbalanced `)` is left for the grammar to report.
                if pending.len() > 1 {
                    let prefixes = pending.pop().unwrap_or_default();
                    depth -= prefixes + 1;
                }
            }
            Token::Not | Token::ForAll | Token::Exists => {
                if let Some(level) = pending.last_mut() {
                    *level += 1;
                }
                depth += 1;
            }
            Token::And | Token::Or | Token::Xor | Token::Implies | Token::Bicond => {
                if let Some(level) = pending.last_mut() {
                    depth -= *level;
                    *level = 0;
                }
            }
            Token::Comma | Token::Ident(_) => {}
        }
        after_name = matches!(token, Token::Ident(_)) && !after_binder;
        after_binder = matches!(token, Token::ForAll | Token::Exists);

        if depth > limit {
            return Err(Error::DepthLimitExceeded {
                limit,
                offset: Some(span.start),
            });
        }
    }
    Ok(())
}

// ---------------- chumsky parser over tokens ----------------

/// One precedence level: `operand (op operand)*`, kept flat.
fn chain<'tokens, I, P>(
    operand: P,
    op: BinaryOp,
) -> impl Parser<'tokens, I, RawTree, extra::Err<Rich<'tokens, Token, Span>>> + Clone
where
    I: ValueInput<'tokens, Token = Token, Span = Span>,
    P: Parser<'tokens, I, RawTree, extra::Err<Rich<'tokens, Token, Span>>> + Clone,
{
    operand
        .clone()
        .then(
            just(Token::from(op))
                .ignore_then(operand)
                .repeated()
                .collect::<Vec<_>>(),
        )
        .map(move |(first, rest)| RawTree::chain(op, first, rest))
}

fn raw_parser<'tokens, I>()
-> impl Parser<'tokens, I, RawTree, extra::Err<Rich<'tokens, Token, Span>>> + Clone
where
    I: ValueInput<'tokens, Token = Token, Span = Span>,
{
    recursive(|formula| {
        let ident = select! { Token::Ident(name) => name }.labelled("identifier");

        // Name(a, b), Name() or Name
        let arguments = ident
            .clone()
            .map(|name: String| Term::new(name))
            .separated_by(just(Token::Comma))
            .collect::<Vec<_>>()
            .delimited_by(just(Token::LParen), just(Token::RParen))
            .labelled("argument list");

        let predicate = ident
            .clone()
            .then(arguments.or_not())
            .map(|(name, args)| RawTree::Predicate {
                name,
                args: args.unwrap_or_default(),
            })
            .labelled("predicate");

        let group = formula
            .delimited_by(just(Token::LParen), just(Token::RParen))
            .map(|inner| RawTree::Group(Box::new(inner)))
            .labelled("parenthesized formula");

        let atom = predicate.or(group);

        let quantifier = select! {
            Token::ForAll => Quantifier::Forall,
            Token::Exists => Quantifier::Exists,
        };

        // Prefix operators bind tighter than every connective
        let unary = recursive(move |unary| {
            let negation = just(Token::Not)
                .ignore_then(unary.clone())
                .map(|inner| RawTree::Not(Box::new(inner)))
                .labelled("negation");

            let quantified = quantifier
                .then(ident)
                .then(unary)
                .map(|((quantifier, variable), body)| RawTree::Quantified {
                    quantifier,
                    variable,
                    body: Box::new(body),
                })
                .labelled("quantified formula");

            choice((negation, quantified, atom)).labelled("operand")
        });

        // Tightest binary level first
        let and = chain(unary, BinaryOp::And);
        let or = chain(and, BinaryOp::Or);
        let xor = chain(or, BinaryOp::Xor);
        let implies = chain(xor, BinaryOp::Implies);
        chain(implies, BinaryOp::Bicond)
    })
}

// ---------------- Error mapping ----------------

fn lexing_error(src: &str, err: &Rich<'_, char>) -> SyntaxError {
    let offset = err.span().start;
    let fragment = src
        .get(offset..)
        .and_then(|rest| rest.chars().next())
        .map(String::from)
        .unwrap_or_else(|| END_OF_INPUT.to_string());
    let message = match err.found() {
        Some(c) => format!("unknown symbol `{c}`"),
        None => format!("unexpected {END_OF_INPUT}"),
    };
    SyntaxError {
        offset,
        fragment,
        message,
    }
}

fn parsing_error(src: &str, tokens: &[Spanned<Token>], err: &Rich<'_, Token, Span>) -> SyntaxError {
    // Parser spans index into the token slice; translate them back to byte offsets.
    let (offset, fragment) = match tokens.get(err.span().start) {
        Some((_, span)) => (
            span.start,
            src.get(span.start..span.end).unwrap_or_default().to_string(),
        ),
        None => (src.len(), END_OF_INPUT.to_string()),
    };

    let found = err
        .found()
        .map(|token| format!("`{token}`"))
        .unwrap_or_else(|| END_OF_INPUT.to_string());
    let expected: Vec<String> = err.expected().map(|pattern| pattern.to_string()).collect();
    let message = if expected.is_empty() {
        format!("unexpected {found}")
    } else {
        format!("unexpected {found}, expected {}", expected.join(", "))
    };

    SyntaxError {
        offset,
        fragment,
        message,
    }
}

// ---------------- Public API ----------------

/// Stateless formula parser configured by [`ParseOptions`].
///
/// The grammar is fixed; a parser value only carries limits and can be shared freely.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FormulaParser {
    options: ParseOptions,
}

impl FormulaParser {
    pub fn new(options: ParseOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ParseOptions {
        &self.options
    }

    /// Parse `src` into its raw tree, before any normalization.
    pub fn parse_raw(&self, src: &str) -> FolResult<RawTree> {
        if src.trim().is_empty() {
            return Err(SyntaxError {
                offset: 0,
                fragment: END_OF_INPUT.to_string(),
                message: "empty formula".to_string(),
            }
            .into());
        }

        // 1) Lexing
        let (tokens, lex_errs) = lexer().parse(src).into_output_errors();
        if let Some(err) = lex_errs.first() {
            return Err(lexing_error(src, err).into());
        }
        let tokens = tokens.unwrap_or_default();
        trace!("Lexed {} tokens from formula `{}`", tokens.len(), src);

        check_nesting(&tokens, self.options.max_depth)?;

        // 2) Parsing with chumsky over the token stream
        let plain: Vec<Token> = tokens.iter().map(|(t, _s)| t.clone()).collect();
        let (raw, parse_errs) = raw_parser()
            .then_ignore(end())
            .parse(plain.as_slice())
            .into_output_errors();
        if let Some(err) = parse_errs.first() {
            return Err(parsing_error(src, &tokens, err).into());
        }

        raw.ok_or_else(|| {
            SyntaxError {
                offset: 0,
                fragment: src.to_string(),
                message: "no formula could be recognised".to_string(),
            }
            .into()
        })
    }

    /// Parse `src` into a canonical formula.
    pub fn parse(&self, src: &str) -> FolResult<Formula> {
        let raw = self.parse_raw(src)?;
        normalize_with(raw, &self.options)
    }
}

/// Parse a formula with the default [`ParseOptions`].
///
/// Example
/// ```
/// use folformal::ast::{Formula, NodeKind};
/// use folformal::parser::parse;
///
/// let f = parse("∀x (Orchid(x) → Plant(x))").unwrap();
/// assert_eq!(f.kind(), NodeKind::Forall);
/// assert!(parse("Orchid(x").is_err());
/// ```
pub fn parse(src: &str) -> FolResult<Formula> {
    FormulaParser::default().parse(src)
}

/// Parse a formula into its raw tree with the default [`ParseOptions`].
pub fn parse_raw(src: &str) -> FolResult<RawTree> {
    FormulaParser::default().parse_raw(src)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lex(src: &str) -> Vec<Token> {
        lexer()
            .parse(src)
            .into_result()
            .expect("lexing should succeed")
            .into_iter()
            .map(|(t, _)| t)
            .collect()
    }

    #[test]
    fn lexes_symbols_and_unicode_identifiers() {
        assert_eq!(
            lex("∀x (Café(x) ⊕ ¬Ünïcode_2(x, rina))"),
            vec![
                Token::ForAll,
                Token::Ident("x".into()),
                Token::LParen,
                Token::Ident("Café".into()),
                Token::LParen,
                Token::Ident("x".into()),
                Token::RParen,
                Token::Xor,
                Token::Not,
                Token::Ident("Ünïcode_2".into()),
                Token::LParen,
                Token::Ident("x".into()),
                Token::Comma,
                Token::Ident("rina".into()),
                Token::RParen,
                Token::RParen,
            ]
        );
    }

    #[test]
    fn raw_tree_keeps_one_chain_per_level() {
        let raw = parse_raw("P(a)").unwrap();
        let mut node = &raw;
        let mut levels = Vec::new();
        while let RawTree::Chain { op, first, rest } = node {
            assert!(rest.is_empty());
            levels.push(*op);
            node = first;
        }
        assert_eq!(
            levels,
            vec![
                BinaryOp::Bicond,
                BinaryOp::Implies,
                BinaryOp::Xor,
                BinaryOp::Or,
                BinaryOp::And
            ]
        );
        assert!(matches!(node, RawTree::Predicate { name, .. } if name == "P"));
    }

    #[test]
    fn nesting_check_counts_parentheses_and_prefixes() {
        let tokens = lexer().parse("¬(¬(P) ∧ ¬¬Q)").into_result().unwrap();
        assert!(check_nesting(&tokens, 4).is_ok());
        assert!(matches!(
            check_nesting(&tokens, 3),
            Err(Error::DepthLimitExceeded { limit: 3, .. })
        ));
    }

    #[test]
    fn argument_lists_do_not_nest() {
        let tokens = lexer().parse("(P(a, b) ∧ (Q(c)))").into_result().unwrap();
        assert!(check_nesting(&tokens, 2).is_ok());
        assert!(check_nesting(&tokens, 1).is_err());

        // `∀x (` is a group, not an argument list: the variable is followed by the scope.
        let tokens = lexer().parse("∀x (P(x))").into_result().unwrap();
        assert!(check_nesting(&tokens, 2).is_ok());
        assert!(check_nesting(&tokens, 1).is_err());
    }

    #[test]
    fn lexer_rejects_unknown_symbols() {
        let err = parse("P(a) = Q(a)").unwrap_err();
        match err {
            Error::Syntax(e) => {
                assert_eq!(e.offset, 5);
                assert_eq!(e.fragment, "=");
            }
            other => panic!("unexpected error {other:?}"),
        }
    }
}
