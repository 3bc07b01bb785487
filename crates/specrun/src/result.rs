//! Result and error types for Specrun.

use crate::location::Location;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for Specrun operations
pub type SpecrunResult<T> = Result<T, SpecrunError>;

/// Errors that can occur in Specrun
///
/// Test failures and test errors are never represented here; they are
/// verdicts on a [`crate::TestResult`]. These variants abort the report
/// or run they occur in.
#[derive(Debug, Error)]
pub enum SpecrunError {
    /// Two coverage locations of one file overlap or are out of order
    #[error("Overlapping locations in {file}: {location} starts before {line}:{col}")]
    OverlappingLocations {
        /// File being rendered
        file: String,
        /// Offending location
        location: Location,
        /// Cursor line when the location was reached
        line: u32,
        /// Cursor column when the location was reached
        col: u32,
    },

    /// A coverage location points outside the source text
    #[error("Location {location} lies outside the source text of {file}")]
    LocationOutOfRange {
        /// File being rendered
        file: String,
        /// Offending location
        location: Location,
    },

    /// Test running is only defined for one dialect
    #[error("Test running only defined for VDM-SL currently (got {dialect})")]
    UnsupportedDialect {
        /// Dialect found in the specification
        dialect: String,
    },

    /// The specification could not be parsed
    #[error("Specification parse failed with {count} error(s)")]
    ParseFailed {
        /// Number of parse errors
        count: usize,
    },

    /// The specification did not type check
    #[error("Specification type check failed with {count} error(s)")]
    TypeCheckFailed {
        /// Number of type errors
        count: usize,
    },

    /// Operation name pattern did not compile
    #[error("Invalid operation pattern '{pattern}': {source}")]
    InvalidPattern {
        /// The pattern as configured
        pattern: String,
        /// Underlying regex error
        #[source]
        source: regex::Error,
    },

    /// Interpreter transcript is malformed
    #[error("Invalid transcript {path}: {message}")]
    Transcript {
        /// Transcript path
        path: PathBuf,
        /// Error message
        message: String,
    },

    /// Configuration error
    #[error("Configuration error: {message}")]
    Config {
        /// Error message
        message: String,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),
}

impl SpecrunError {
    /// Create a configuration error
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }
}
