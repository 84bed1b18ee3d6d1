//! Player error types.
//!
//! The audio path has no error returns. Only configuration can fail.

use std::fmt;

/// Error type for player configuration.
#[derive(Debug)]
pub enum PlayerError {
    /// A configuration value is out of range.
    InvalidConfiguration(String),

    /// A configuration could not be parsed or written.
    Serialization(String),
}

impl fmt::Display for PlayerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidConfiguration(msg) => write!(f, "Invalid configuration: {}", msg),
            Self::Serialization(msg) => write!(f, "Serialization error: {}", msg),
        }
    }
}

impl std::error::Error for PlayerError {}

impl From<serde_json::Error> for PlayerError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

/// Result type alias for player operations.
pub type PlayerResult<T> = Result<T, PlayerError>;
