//! Error types for titlecat-server

use thiserror::Error;

/// Main error type for titlecat-server
#[derive(Error, Debug)]
pub enum Error {
    /// Mapping file could not be read
    #[error("Failed to read mapping file: {0}")]
    Io(#[from] std::io::Error),

    /// Mapping file is not valid TOML for the expected shape
    #[error("Failed to parse mapping file: {0}")]
    Parse(#[from] toml::de::Error),

    /// Mapping file parsed but failed taxonomy validation
    #[error(transparent)]
    Taxonomy(#[from] titlecat_core::Error),
}

/// Convenience Result type using titlecat-server Error
pub type Result<T> = std::result::Result<T, Error>;
