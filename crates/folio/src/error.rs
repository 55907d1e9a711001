//! Error types for list view state.

use folio_seeker::SeekerError;
use thiserror::Error;

/// Errors raised while paginating, sorting or exporting a list view.
#[derive(Debug, Error)]
pub enum PagesError {
    /// Property resolution, formatting or sorting failed.
    #[error(transparent)]
    Seeker(#[from] SeekerError),

    /// The supplied source cannot be iterated as a list.
    #[error("cannot iterate over {0}: expected a list, collection or array")]
    IterationSource(&'static str),

    /// A cached list exists under this key with a different record type.
    #[error("list '{key}' is cached with a different record type")]
    ScopeTypeMismatch { key: String },

    /// The page size is not a positive integer.
    #[error("invalid page size '{0}': expected a positive integer")]
    InvalidPageSize(String),

    /// The requested page index is not an integer.
    #[error("invalid page index '{0}'")]
    InvalidPageIndex(String),

    /// The export field specification cannot be parsed.
    #[error("malformed export spec '{spec}': {reason}")]
    MalformedExportSpec { spec: String, reason: String },

    /// Export was requested for a list without records.
    #[error("cannot export an empty list")]
    EmptyExportList,

    /// No formatter is registered for a column and its type cannot be detected.
    #[error("cannot determine the column type of '{field}'")]
    UnknownColumnType { field: String },

    /// The export parameter names no known format.
    #[error("unknown export format '{0}'")]
    UnknownExportFormat(String),

    /// The separator attribute is not `"<itemVar>, <interval>"`.
    #[error("malformed separator '{spec}': {reason}")]
    MalformedSeparator { spec: String, reason: &'static str },

    /// The configuration is inconsistent.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// A report renderer failed.
    #[error("report rendering failed: {0}")]
    Render(String),
}

impl From<csv::Error> for PagesError {
    fn from(err: csv::Error) -> Self {
        PagesError::Render(err.to_string())
    }
}

impl From<std::io::Error> for PagesError {
    fn from(err: std::io::Error) -> Self {
        PagesError::Render(err.to_string())
    }
}

/// Result type for list view operations.
pub type Result<T> = std::result::Result<T, PagesError>;
