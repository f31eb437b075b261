//! Error types for the PaperQA desktop core.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A shared error type for the client and the persistence stores.
///
/// The first four variants make up the RPC taxonomy surfaced to the UI;
/// the remaining ones come from the persistence and configuration layers.
/// The enum is serializable so it can be handed across a desktop IPC boundary.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum PqaError {
    /// Transport connect or disconnect failed
    #[error("Connection error: {0}")]
    Connection(String),

    /// An in-flight request failed inside the transport
    #[error("Transport error during '{method}': {message}")]
    Transport { method: String, message: String },

    /// The reply payload could not be decoded
    #[error("Decode error for '{method}': {message}")]
    Decode { method: String, message: String },

    /// The server answered with an explicit error status
    #[error("Remote error from '{method}': {message}")]
    Remote { method: String, message: String },

    /// IO error (file system operations)
    #[error("IO error: {message}")]
    Io { message: String },

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization {
        format: String, // "JSON"
        message: String,
    },

    /// Key-value backend error
    #[error("Storage error: {0}")]
    Storage(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal error (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl PqaError {
    // ============================================================================
    // Constructor helpers
    // ============================================================================

    /// Creates a Connection error
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection(message.into())
    }

    /// Creates a Transport error for the given method
    pub fn transport(method: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Transport {
            method: method.into(),
            message: message.into(),
        }
    }

    /// Creates a Decode error for the given method
    pub fn decode(method: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Decode {
            method: method.into(),
            message: message.into(),
        }
    }

    /// Creates a Remote error for the given method
    pub fn remote(method: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Remote {
            method: method.into(),
            message: message.into(),
        }
    }

    /// Creates an IO error
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }

    /// Creates a Storage error
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage(message.into())
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

    pub fn is_connection(&self) -> bool {
        matches!(self, Self::Connection(_))
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport { .. })
    }

    pub fn is_decode(&self) -> bool {
        matches!(self, Self::Decode { .. })
    }

    pub fn is_remote(&self) -> bool {
        matches!(self, Self::Remote { .. })
    }

    /// Check if this error came from the persistence side rather than the RPC side.
    pub fn is_persistence(&self) -> bool {
        matches!(
            self,
            Self::Io { .. } | Self::Serialization { .. } | Self::Storage(_)
        )
    }
}

// ============================================================================
// From implementations for automatic conversion
// ============================================================================

impl From<std::io::Error> for PqaError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

impl From<serde_json::Error> for PqaError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<anyhow::Error> for PqaError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

/// A type alias for `Result<T, PqaError>`.
pub type Result<T> = std::result::Result<T, PqaError>;
