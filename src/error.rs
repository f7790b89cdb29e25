//! Error types for schema conversion

use thiserror::Error;

/// Result type for conversion operations
pub type Result<T> = std::result::Result<T, ConvertError>;

/// Conversion errors
///
/// Only collaborator failures surface here. Problems inside the schemas
/// themselves (bad ignore patterns, unknown attribute kinds, dangling
/// relation targets) degrade the output instead of failing the run.
#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("Runtime mode '{mode}' is not one of the accepted modes {accepted:?}")]
    ModeNotAccepted { mode: String, accepted: Vec<String> },

    #[error("Invalid schema input: {0}")]
    InvalidInput(String),

    #[error("Formatter failed: {0}")]
    Formatter(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(#[from] config_crate::ConfigError),
}
