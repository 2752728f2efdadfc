//! Error types for methodql
//!
//! Only structural failures are errors. A query name that is well formed but
//! names unknown properties or is still being typed parses into an invalid
//! tree instead (see `PartTree::defects`).

use thiserror::Error;

/// The main error type for methodql operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    // ========== Argument Errors ==========
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    // ========== Grammar Errors ==========
    #[error("Malformed query name '{query}': '{keyword}' has an empty predicate next to it")]
    EmptyBranch { query: String, keyword: String },

    #[error("Malformed query name '{query}': more than one OrderBy clause")]
    DuplicateOrderBy { query: String },
}

/// Result type alias for methodql operations
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Returns true if the source is structurally not a query name
    pub fn is_malformed_grammar(&self) -> bool {
        matches!(
            self,
            Error::EmptyBranch { .. } | Error::DuplicateOrderBy { .. }
        )
    }

    /// Returns true if the caller handed in an unusable argument
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, Error::InvalidArgument(_) | Error::Configuration(_))
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Configuration(err.to_string())
    }
}
