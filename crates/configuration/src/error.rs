//! Errors that can occur when reading, interpreting or writing the configuration.

use std::path::PathBuf;

use crate::environment;

/// The configuration file could not be read.
#[derive(Debug, thiserror::Error)]
pub enum ParseConfigurationError {
    #[error("parse error on {file_path}:{line}:{column}: {message}")]
    ParseError {
        file_path: PathBuf,
        line: usize,
        column: usize,
        message: String,
    },
    #[error("unsupported configuration version {0}, expected 1")]
    UnsupportedVersion(u32),
    #[error("I/O error: {0}")]
    IoErrorButStringified(String),
}

/// The configuration was read but cannot be used.
#[derive(Debug, thiserror::Error)]
pub enum MakeRuntimeConfigurationError {
    #[error("invalid dialect in environment variable {variable}: {message}")]
    InvalidDialect { variable: String, message: String },
    #[error(transparent)]
    Environment(#[from] environment::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum WriteParsedConfigurationError {
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("cannot serialize the configuration: {0}")]
    SerializationError(#[from] serde_json::Error),
}
