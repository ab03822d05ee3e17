//! RcDoc-based pretty-printer with termcolor annotations for [`Formula`].
//!
//! Role
//! - Turn a canonical formula back into formula text that the parser accepts, using the
//!   fewest parentheses that keep the tree shape: [`render`] is the inverse of
//!   [`crate::parser::parse`].
//! - Provide colored output for terminals (TTY-aware) and plain strings for logs and tests.
//!
//! Parenthesization
//! - A left operand is wrapped when its connective binds looser than its parent's.
//! - A right operand is wrapped when it binds looser than or as loose as its parent's, so
//!   `(a ∧ b) ∧ c` prints as `a ∧ b ∧ c` while `a ∧ (b ∧ c)` keeps its parentheses.
//! - Negations and quantifiers wrap binary operands.
//!
//! Breaks are only inserted after binary operators. The parser skips any whitespace,
//! newlines included, so wrapped output still parses to the same tree.
use std::io::{self, Write};

use pretty::{FmtWrite, RcDoc, RenderAnnotated};
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

use crate::ast::{BinaryOp, Formula, Term};

/// Width used by [`render`]; wide enough that real formulas stay on one line.
const SINGLE_LINE_WIDTH: usize = 1 << 20;

/// Styles used to annotate parts of the pretty-printed document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Style {
    Punct, // commas
    /// Parentheses are colored by nesting depth so matching pairs share a color.
    Paren(u8),
    Quantifier, // ∀x, ∃x
    Operator,   // ∧ ∨ ⊕ → ↔ ¬
    Predicate,
    Term,
    Verum,
}

impl Style {
    fn to_color_spec(self) -> ColorSpec {
        let mut s = ColorSpec::new();
        match self {
            Style::Punct => {
                s.set_dimmed(true);
            }
            Style::Paren(depth) => {
                let fg = match depth % 6 {
                    0 => Color::Blue,
                    1 => Color::Green,
                    2 => Color::White,
                    3 => Color::Yellow,
                    4 => Color::Red,
                    _ => Color::Magenta,
                };
                s.set_fg(Some(fg)).set_dimmed(true);
            }
            Style::Quantifier => {
                s.set_fg(Some(Color::Cyan)).set_bold(true);
            }
            Style::Operator => {
                s.set_fg(Some(Color::Yellow)).set_bold(true);
            }
            Style::Predicate => {
                s.set_fg(Some(Color::Green)).set_bold(true);
            }
            Style::Term => {
                s.set_fg(Some(Color::Green));
            }
            Style::Verum => {
                s.set_fg(Some(Color::Magenta));
            }
        }
        s
    }
}

fn punct(s: &'static str) -> RcDoc<'static, Style> {
    RcDoc::as_string(s).annotate(Style::Punct)
}

#[inline]
fn lparen(depth: u8) -> RcDoc<'static, Style> {
    RcDoc::as_string("(").annotate(Style::Paren(depth))
}

#[inline]
fn rparen(depth: u8) -> RcDoc<'static, Style> {
    RcDoc::as_string(")").annotate(Style::Paren(depth))
}

fn op(s: &'static str) -> RcDoc<'static, Style> {
    RcDoc::as_string(s).annotate(Style::Operator)
}

fn term(t: &Term) -> RcDoc<'static, Style> {
    RcDoc::as_string(t.name().to_string()).annotate(Style::Term)
}

/// Which side of a binary parent an operand sits on, or a unary parent.
#[derive(Clone, Copy)]
enum Position {
    Left(BinaryOp),
    Right(BinaryOp),
    Unary,
}

#[inline]
fn requires_parens(current: &Formula, position: Position) -> bool {
    let Formula::Binary { op: current, .. } = current else {
        return false;
    };
    match position {
        Position::Left(parent) => current.precedence() < parent.precedence(),
        Position::Right(parent) => current.precedence() <= parent.precedence(),
        Position::Unary => true,
    }
}

#[inline]
fn to_doc_parenthesized_with_depth(
    f: &Formula,
    position: Position,
    depth: u8,
) -> RcDoc<'static, Style> {
    if requires_parens(f, position) {
        lparen(depth)
            .append(to_doc_with_depth(f, depth.wrapping_add(1)))
            .append(rparen(depth))
            .group()
    } else {
        to_doc_with_depth(f, depth)
    }
}

/// Depth-aware builder that colors parentheses by nesting level.
fn to_doc_with_depth(f: &Formula, depth: u8) -> RcDoc<'static, Style> {
    match f {
        Formula::Binary { op: bin, lhs, rhs } => {
            to_doc_parenthesized_with_depth(lhs, Position::Left(*bin), depth)
                .append(RcDoc::space())
                .append(op(bin.symbol()))
                .append(RcDoc::line())
                .append(to_doc_parenthesized_with_depth(
                    rhs,
                    Position::Right(*bin),
                    depth,
                ))
                .group()
                .nest(2)
        }
        Formula::Not(inner) => op("¬")
            .append(to_doc_parenthesized_with_depth(inner, Position::Unary, depth))
            .group(),
        Formula::Quantified {
            quantifier,
            variable,
            scope,
        } => RcDoc::as_string(format!("{}{}", quantifier.symbol(), variable))
            .annotate(Style::Quantifier)
            .append(RcDoc::space())
            .append(to_doc_parenthesized_with_depth(scope, Position::Unary, depth))
            .group(),
        Formula::Predicate { name, args } if args.is_empty() => {
            RcDoc::as_string(name.clone()).annotate(Style::Predicate)
        }
        Formula::Predicate { name, args } => RcDoc::as_string(name.clone())
            .annotate(Style::Predicate)
            .append(lparen(depth))
            .append(RcDoc::intersperse(
                args.iter().map(term),
                punct(",").append(RcDoc::space()),
            ))
            .append(rparen(depth))
            .group(),
        Formula::Verum => RcDoc::as_string("⊤").annotate(Style::Verum),
    }
}

// A writer that maps Style annotations to termcolor ColorSpec on a WriteColor sink.
struct ColorWriter<'w, W: WriteColor + Write> {
    out: &'w mut W,
}

impl<'a, 'w, W: WriteColor + Write> RenderAnnotated<'a, Style> for ColorWriter<'w, W> {
    fn push_annotation(&mut self, ann: &'a Style) -> io::Result<()> {
        self.out.set_color(&ann.to_color_spec())
    }
    fn pop_annotation(&mut self) -> io::Result<()> {
        self.out.reset()
    }
}

impl<'w, W: WriteColor + Write> pretty::Render for ColorWriter<'w, W> {
    type Error = io::Error;
    fn write_str(&mut self, s: &str) -> io::Result<usize> {
        self.out.write_all(s.as_bytes())?;
        Ok(s.len())
    }
    fn write_str_all(&mut self, s: &str) -> io::Result<()> {
        self.out.write_all(s.as_bytes())
    }
    fn fail_doc(&self) -> Self::Error {
        io::Error::other("render failed")
    }
}

fn render_to<W: WriteColor + Write>(
    doc: &RcDoc<'_, Style>,
    width: usize,
    out: &mut W,
) -> io::Result<()> {
    let mut cw = ColorWriter { out };
    doc.render_raw(width, &mut cw)
}

fn to_plain_string(f: &Formula, width: usize) -> String {
    let mut buf = String::new();
    let _ = to_doc_with_depth(f, 0).render_fmt(width, &mut buf);
    buf
}

/// Width of the terminal, or 80 if it cannot be determined.
fn terminal_width() -> usize {
    term_size::dimensions().map(|(w, _)| w).unwrap_or(80)
}

/// Formula text of `formula` on a single line.
///
/// `parse(&render(&f)) == Ok(f)` for every formula the parser can produce. [`Formula::Verum`]
/// is the exception: it renders as `⊤`, which is outside the input alphabet, so a global
/// conditional built from zero premises does not parse back.
///
/// Example
/// ```
/// use folformal::ast::Formula;
/// use folformal::render::render;
///
/// let f = Formula::forall(
///     "x",
///     Formula::implies(Formula::predicate("P", ["x"]), Formula::proposition("Q")),
/// );
/// assert_eq!(render(&f), "∀x (P(x) → Q)");
/// ```
pub fn render(formula: &Formula) -> String {
    to_plain_string(formula, SINGLE_LINE_WIDTH)
}

/// Pretty-printing conveniences for [`Formula`].
pub trait PrettyFormula {
    /// Annotated document, for composing or rendering manually.
    fn pretty_doc(&self) -> RcDoc<'static, Style>;

    /// Render with colors to any termcolor writer at the given width.
    fn pretty_render_to<W: WriteColor + Write>(&self, width: usize, out: &mut W) -> io::Result<()>;

    /// Print to stdout with colors (TTY-aware), at the terminal width (or 80 if not a TTY).
    fn pretty_print(&self) -> io::Result<()>;

    /// Plain string wrapped at `width` columns.
    fn pretty_string(&self, width: usize) -> String;
}

impl PrettyFormula for Formula {
    #[inline]
    fn pretty_doc(&self) -> RcDoc<'static, Style> {
        to_doc_with_depth(self, 0)
    }

    #[inline]
    fn pretty_render_to<W: WriteColor + Write>(&self, width: usize, out: &mut W) -> io::Result<()> {
        render_to(&self.pretty_doc(), width, out)
    }

    fn pretty_print(&self) -> io::Result<()> {
        let stdout = StandardStream::stdout(ColorChoice::Auto);
        let mut stdout = stdout.lock();
        self.pretty_render_to(terminal_width(), &mut stdout)?;
        writeln!(stdout)
    }

    #[inline]
    fn pretty_string(&self, width: usize) -> String {
        to_plain_string(self, width)
    }
}

impl std::fmt::Display for Formula {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut w = FmtWrite::new(f);
        self.pretty_doc().render_raw(SINGLE_LINE_WIDTH, &mut w)
    }
}
