//! Error types for titlecat-core
//!
//! Defines module-specific error types using thiserror for clear error
//! propagation. "No match" is an expected outcome and is modeled as a
//! result variant, never as an error.

use thiserror::Error;

/// Main error type for titlecat-core
#[derive(Error, Debug)]
pub enum Error {
    /// Taxonomy failed structural validation at construction time
    #[error("Invalid taxonomy: {0}")]
    InvalidTaxonomy(String),

    /// A keyword pattern failed to compile
    #[error("Invalid keyword pattern {pattern:?}: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// Engine configuration errors
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Convenience Result type using titlecat-core Error
pub type Result<T> = std::result::Result<T, Error>;
