//! Error types for the seeker crate.

use thiserror::Error;

/// Errors raised while resolving properties, formatting or sorting records.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SeekerError {
    /// The path is empty or one of its segments is not an identifier.
    #[error("invalid property path '{path}': {reason}")]
    InvalidPropertyPath { path: String, reason: &'static str },

    /// No accessor named after the segment exists on the record.
    #[error("property '{segment}' of path '{path}' not found on {record_type}")]
    PropertyNotFound {
        path: String,
        segment: String,
        record_type: &'static str,
    },

    /// The accessor exists but may not be invoked.
    #[error("property '{segment}' of path '{path}' is not accessible on {record_type}")]
    PropertyNotAccessible {
        path: String,
        segment: String,
        record_type: &'static str,
    },

    /// Invoking the accessor failed.
    #[error("error while reading property '{segment}' of path '{path}': {reason}")]
    PropertyInvocation {
        path: String,
        segment: String,
        reason: String,
    },

    /// Two values on the sort field have no natural order and no formatter.
    #[error("values of '{path}' cannot be compared ({left} vs {right})")]
    NotComparable {
        path: String,
        left: String,
        right: String,
    },

    /// A formatter was required but none is registered for the type.
    #[error("no type formatter registered for {value_type}")]
    TypeFormatterNotFound { value_type: String },
}

/// Result type for seeker operations.
pub type Result<T> = std::result::Result<T, SeekerError>;
