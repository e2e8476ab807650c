//! Common error types for the transcript monitoring processes

use thiserror::Error;

/// Common result type
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across the monitoring processes
#[derive(Error, Debug)]
pub enum Error {
    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Artifact serialization error
    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    /// A derivation step exceeded its cycle budget
    #[error("Derivation step exceeded budget of {0:?}")]
    StepTimeout(std::time::Duration),
}
