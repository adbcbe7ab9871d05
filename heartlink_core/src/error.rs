//! Application error types and handling

use thiserror::Error;

pub type Result<T> = std::result::Result<T, DoctorError>;

/// Faults of the doctor's own plumbing. Probe failures never surface here;
/// they are folded into report records instead.
#[derive(Error, Debug)]
pub enum DoctorError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
