//! Error types for the CLI

use specrun::SpecrunError;
use thiserror::Error;

/// Result type for CLI operations
pub type CliResult<T> = Result<T, CliError>;

/// Errors that can occur in the CLI
#[derive(Debug, Error)]
pub enum CliError {
    /// At least one test did not pass
    #[error("There were failing tests ({failures} failed, {errors} had errors)")]
    TestsFailed {
        /// Failed tests
        failures: usize,
        /// Errored tests
        errors: usize,
    },

    /// Specrun library error
    #[error("{0}")]
    Specrun(#[from] SpecrunError),
}

impl CliError {
    /// Process exit status for this error.
    ///
    /// | code | meaning                          |
    /// |------|----------------------------------|
    /// | 1    | test failures or errors          |
    /// | 2    | unsupported dialect              |
    /// | 3    | specification parse failed       |
    /// | 4    | specification type check failed  |
    /// | 5    | configuration or usage error     |
    /// | 6    | I/O or fatal engine error        |
    #[must_use]
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::TestsFailed { .. } => 1,
            Self::Specrun(err) => match err {
                SpecrunError::UnsupportedDialect { .. } => 2,
                SpecrunError::ParseFailed { .. } => 3,
                SpecrunError::TypeCheckFailed { .. } => 4,
                SpecrunError::Config { .. }
                | SpecrunError::InvalidPattern { .. }
                | SpecrunError::Transcript { .. }
                | SpecrunError::Json(_)
                | SpecrunError::Yaml(_) => 5,
                SpecrunError::OverlappingLocations { .. }
                | SpecrunError::LocationOutOfRange { .. }
                | SpecrunError::Io(_) => 6,
            },
        }
    }
}
