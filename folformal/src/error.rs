use strum::EnumIs;
use thiserror::Error;

/// A malformed formula, located by byte offset into the source text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("syntax error at offset {offset} near `{fragment}`: {message}")]
pub struct SyntaxError {
    /// Byte offset of the failure in the input (the input length for end of input).
    pub offset: usize,
    /// Offending substring, or `end of input`.
    pub fragment: String,
    /// Human-readable description.
    pub message: String,
}

/// Item of a global conditional that failed to parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIs)]
pub enum ComposeItem {
    /// Zero-based index into the premise list.
    Premise(usize),
    Conclusion,
}

impl std::fmt::Display for ComposeItem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ComposeItem::Premise(index) => write!(f, "premise #{index}"),
            ComposeItem::Conclusion => write!(f, "conclusion"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, EnumIs, Error)]
pub enum Error {
    /// The formula text does not follow the grammar.
    #[error(transparent)]
    Syntax(#[from] SyntaxError),

    /// One of the premises or the conclusion of a global conditional could not be parsed.
    /// Composition is aborted as a whole.
    #[error("Failed to compose the global conditional: the {item} is invalid. {source}")]
    Composition {
        item: ComposeItem,
        #[source]
        source: Box<Error>,
    },

    /// Nesting exceeded the configured limit.
    #[error("Nesting depth exceeds the configured limit of {limit} (offset: {offset:?}).")]
    DepthLimitExceeded { limit: usize, offset: Option<usize> },
}

impl Error {
    /// The item that failed, for composition errors.
    pub fn failed_item(&self) -> Option<ComposeItem> {
        match self {
            Error::Composition { item, .. } => Some(*item),
            Error::Syntax(_) | Error::DepthLimitExceeded { .. } => None,
        }
    }
}

pub type FolResult<T> = Result<T, Error>;
