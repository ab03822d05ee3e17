use strum::EnumIs;
use thiserror::Error;

#[derive(Debug, EnumIs, Error)]
pub enum ReportError {
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Parsing, composition or depth-limit failure from the formula core.
    #[error(transparent)]
    Formula(#[from] folformal::error::Error),

    #[error("Failed to parse configuration file '{file}': {source}")]
    ConfigParseError {
        source: toml::de::Error,
        file: String,
    },

    #[error("Failed to serialize configuration: {0}")]
    ConfigSerializeError(#[from] toml::ser::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// A record does not describe a valid formula or dataset entry. `path` points at the
    /// offending field, e.g. `/children/1/value`.
    #[error("Invalid record at '{path}': {reason}")]
    InvalidRecord { path: String, reason: String },

    #[error("A batch worker panicked")]
    WorkerPanicked,
}

impl ReportError {
    pub(crate) fn invalid(path: impl Into<String>, reason: impl Into<String>) -> Self {
        ReportError::InvalidRecord {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

pub type ReportResult<T> = Result<T, ReportError>;
