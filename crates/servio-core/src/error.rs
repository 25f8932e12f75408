//! Error types for the Servio client.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::field_errors::FieldErrors;

/// A shared error type for the entire Servio client.
///
/// Every failure the client can hit while talking to the marketplace backend
/// or validating user input lands in one of these variants. None of them is
/// fatal: callers turn them into inline messages via [`ServioError::user_message`].
#[derive(Error, Debug, Clone, Serialize, Deserialize)]
pub enum ServioError {
    /// The request never produced an HTTP response (DNS, connect, timeout).
    #[error("Network error: {message}")]
    Network { message: String, is_timeout: bool },

    /// The backend answered with a non-success status.
    #[error("Backend error ({status}): {message}")]
    Http { status: u16, message: String },

    /// Field-level validation failure, either local or reported by the backend.
    #[error("Validation failed: {}", .0.summary())]
    Validation(FieldErrors),

    /// Entity not found error with type information
    #[error("Entity not found: {entity_type} '{id}'")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization {
        format: String, // "TOML", "JSON", etc.
        message: String,
    },

    /// IO error (config files)
    #[error("IO error: {message}")]
    Io { message: String },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal error (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ServioError {
    // ============================================================================
    // Constructor helpers
    // ============================================================================

    /// Creates a Network error
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
            is_timeout: false,
        }
    }

    /// Creates a Network error caused by a timeout
    pub fn timeout(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
            is_timeout: true,
        }
    }

    /// Creates an Http error
    pub fn http(status: u16, message: impl Into<String>) -> Self {
        Self::Http {
            status,
            message: message.into(),
        }
    }

    /// Creates a NotFound error
    pub fn not_found(entity_type: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type,
            id: id.into(),
        }
    }

    /// Creates a Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    // ============================================================================
    // Type checking methods
    // ============================================================================

    /// Check if this is a Network error
    pub fn is_network(&self) -> bool {
        matches!(self, Self::Network { .. })
    }

    /// Check if this is a Validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Check if this is a NotFound error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
            || matches!(self, Self::Http { status: 404, .. })
    }

    /// Returns the per-field messages carried by a validation error.
    pub fn field_errors(&self) -> Option<&FieldErrors> {
        match self {
            Self::Validation(errors) => Some(errors),
            _ => None,
        }
    }

    /// Human-readable message suitable for an inline error banner.
    ///
    /// Unlike `Display`, this never leaks status codes or serializer
    /// internals; it tells the user what happened and that a retry is possible.
    pub fn user_message(&self) -> String {
        match self {
            Self::Network {
                is_timeout: true, ..
            } => "The server took too long to respond. Please try again.".to_string(),
            Self::Network { .. } => {
                "Could not reach the server. Check your connection and try again.".to_string()
            }
            Self::Http { status, message }
                if (400..500).contains(status) && !message.is_empty() =>
            {
                message.clone()
            }
            Self::Http { .. } => {
                "The server failed to process the request. Please try again later.".to_string()
            }
            Self::Validation(errors) => errors.summary(),
            Self::NotFound { entity_type, .. } => {
                format!("The requested {entity_type} was not found.")
            }
            Self::Serialization { .. } => {
                "The server sent a response that could not be read.".to_string()
            }
            Self::Io { message } | Self::Config(message) | Self::Internal(message) => {
                message.clone()
            }
        }
    }
}

// ============================================================================
// From implementations for automatic conversion
// ============================================================================

impl From<FieldErrors> for ServioError {
    fn from(errors: FieldErrors) -> Self {
        Self::Validation(errors)
    }
}

impl From<std::io::Error> for ServioError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

impl From<serde_json::Error> for ServioError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for ServioError {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

/// A type alias for `Result<T, ServioError>`.
pub type Result<T> = std::result::Result<T, ServioError>;
