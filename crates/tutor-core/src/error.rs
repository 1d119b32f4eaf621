//! Error types for the tutor application.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A shared error type for the entire tutor application.
///
/// This provides typed, structured error variants with automatic conversion
/// from common error types via the `From` trait. Nothing here is retried
/// automatically; callers surface the message and leave session state alone.
#[derive(Error, Debug, Clone, Serialize, Deserialize)]
pub enum TutorError {
    /// Configuration error (missing/invalid API key or config file).
    /// Fatal at startup.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The model gateway call failed (network error, auth error, quota).
    #[error("Model unavailable{}: {message}", status_suffix(.status_code))]
    ModelUnavailable {
        status_code: Option<u16>,
        message: String,
    },

    /// Image transcription failed (decode or gateway failure). Blocks the
    /// subsequent classify/hint call.
    #[error("Extraction failed: {0}")]
    Extraction(String),

    /// An action was requested in a session state that does not permit it
    /// (e.g. a solution request with no pending question).
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// IO error (config file reads).
    #[error("IO error: {message}")]
    Io { message: String },

    /// Serialization/deserialization error.
    #[error("Serialization error: {format} - {message}")]
    Serialization {
        format: String, // "TOML", "JSON", etc.
        message: String,
    },
}

fn status_suffix(status_code: &Option<u16>) -> String {
    match status_code {
        Some(code) => format!(" (HTTP {})", code),
        None => String::new(),
    }
}

impl TutorError {
    /// Creates a Config error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates a ModelUnavailable error without an HTTP status.
    pub fn model_unavailable(message: impl Into<String>) -> Self {
        Self::ModelUnavailable {
            status_code: None,
            message: message.into(),
        }
    }

    /// Creates a ModelUnavailable error carrying the HTTP status code.
    pub fn model_unavailable_with_status(status_code: u16, message: impl Into<String>) -> Self {
        Self::ModelUnavailable {
            status_code: Some(status_code),
            message: message.into(),
        }
    }

    /// Creates an Extraction error.
    pub fn extraction(message: impl Into<String>) -> Self {
        Self::Extraction(message.into())
    }

    /// Creates an InvalidState error.
    pub fn invalid_state(message: impl Into<String>) -> Self {
        Self::InvalidState(message.into())
    }

    /// Check if this is a Config error.
    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config(_))
    }

    /// Check if this is a ModelUnavailable error.
    pub fn is_model_unavailable(&self) -> bool {
        matches!(self, Self::ModelUnavailable { .. })
    }

    /// Check if this is an Extraction error.
    pub fn is_extraction(&self) -> bool {
        matches!(self, Self::Extraction(_))
    }

    /// Check if this is an InvalidState error.
    pub fn is_invalid_state(&self) -> bool {
        matches!(self, Self::InvalidState(_))
    }
}

impl From<std::io::Error> for TutorError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

impl From<serde_json::Error> for TutorError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for TutorError {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

/// A type alias for `Result<T, TutorError>`.
pub type Result<T> = std::result::Result<T, TutorError>;
