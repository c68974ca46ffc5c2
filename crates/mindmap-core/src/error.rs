//! Error types for the mindmap service.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A shared error type for every layer of the mindmap service.
///
/// The first six variants form the failure taxonomy surfaced to callers;
/// the remaining ones cover plumbing (configuration, files, encoding).
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum MindmapError {
    /// The bearer credential was rejected (or missing).
    #[error("Invalid credential")]
    InvalidCredential,

    /// The upstream inference provider could not be reached or answered non-2xx.
    #[error("Upstream unavailable{}: {message}", status_suffix(.status))]
    UpstreamUnavailable {
        status: Option<u16>,
        message: String,
    },

    /// The upstream answered 2xx but without the expected completion field.
    #[error("Malformed upstream response: {0}")]
    MalformedUpstreamResponse(String),

    /// Writing an archive snapshot failed.
    #[error("Storage write failure: {0}")]
    StorageWriteFailure(String),

    /// The outline could not be turned into a diagram.
    #[error("Render failure: {0}")]
    RenderFailure(String),

    /// A stage of the raster export failed.
    #[error("Export failure: {0}")]
    ExportFailure(String),

    /// Another export is still in flight.
    #[error("An export is already in progress")]
    ExportBusy,

    /// Caller supplied unusable input (e.g. an empty message)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error (file system operations)
    #[error("IO error: {message}")]
    Io { message: String },

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization { format: String, message: String },
}

impl MindmapError {
    // ============================================================================
    // Constructor helpers
    // ============================================================================

    /// Creates an UpstreamUnavailable error without an HTTP status
    pub fn upstream(message: impl Into<String>) -> Self {
        Self::UpstreamUnavailable {
            status: None,
            message: message.into(),
        }
    }

    /// Creates an UpstreamUnavailable error carrying the HTTP status
    pub fn upstream_status(status: u16, message: impl Into<String>) -> Self {
        Self::UpstreamUnavailable {
            status: Some(status),
            message: message.into(),
        }
    }

    /// Creates a MalformedUpstreamResponse error
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedUpstreamResponse(message.into())
    }

    /// Creates a StorageWriteFailure error
    pub fn storage(message: impl Into<String>) -> Self {
        Self::StorageWriteFailure(message.into())
    }

    /// Creates a RenderFailure error
    pub fn render(message: impl Into<String>) -> Self {
        Self::RenderFailure(message.into())
    }

    /// Creates an ExportFailure error
    pub fn export(message: impl Into<String>) -> Self {
        Self::ExportFailure(message.into())
    }

    /// Creates an InvalidInput error
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    /// Creates a Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates an IO error
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }

    // ============================================================================
    // Type checking methods
    // ============================================================================

    /// Check if this is an InvalidCredential error
    pub fn is_invalid_credential(&self) -> bool {
        matches!(self, Self::InvalidCredential)
    }

    /// Check if this error came from the upstream provider (transport or payload)
    pub fn is_upstream(&self) -> bool {
        matches!(
            self,
            Self::UpstreamUnavailable { .. } | Self::MalformedUpstreamResponse(_)
        )
    }

    /// Check if this is a StorageWriteFailure error
    pub fn is_storage(&self) -> bool {
        matches!(self, Self::StorageWriteFailure(_))
    }

    /// Check if this error belongs to the diagram pipeline (render or export).
    ///
    /// These failures only abort the diagram operation; the rest of the
    /// session stays usable.
    pub fn is_diagram(&self) -> bool {
        matches!(
            self,
            Self::RenderFailure(_) | Self::ExportFailure(_) | Self::ExportBusy
        )
    }

    /// Check if this is a config error
    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config(_))
    }
}

// ============================================================================
// From implementations for automatic conversion
// ============================================================================

impl From<std::io::Error> for MindmapError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

impl From<serde_json::Error> for MindmapError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for MindmapError {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::ser::Error> for MindmapError {
    fn from(err: toml::ser::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

/// Conversion from anyhow::Error, used at the bootstrap boundary
impl From<anyhow::Error> for MindmapError {
    fn from(err: anyhow::Error) -> Self {
        Self::Config(err.to_string())
    }
}

fn status_suffix(status: &Option<u16>) -> String {
    status.map(|s| format!(" (HTTP {s})")).unwrap_or_default()
}

/// A type alias for `Result<T, MindmapError>`.
pub type Result<T> = std::result::Result<T, MindmapError>;
