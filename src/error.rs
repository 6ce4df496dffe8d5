//! Error types for the gateway.

use thiserror::Error;

/// Main error type for gateway operations.
///
/// Preconditions the remote filesystem reports as part of normal operation
/// (missing source, existing target) get their own variants so the HTTP
/// boundary can map them onto the legacy payload messages or onto real
/// status codes, depending on the configured error surface.
#[derive(Error, Debug)]
pub enum GatewayError {
    /// Network request error.
    #[error("Request error: {0}")]
    Request(#[from] reqwest::Error),

    /// JSON parsing error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Local disk I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// URL construction error.
    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),

    /// HTTP request failed with status code.
    #[error("HTTP error: {0}")]
    Http(u16),

    /// Structured exception reported by the remote filesystem.
    #[error("Remote exception: {exception}: {message}")]
    Remote { exception: String, message: String },

    /// Path does not exist on the remote filesystem.
    #[error("Path not found: {0}")]
    NotFound(String),

    /// Target path already exists and overwrite was not allowed.
    #[error("Path already exists: {0}")]
    AlreadyExists(String),

    /// Operation requires a plain file but the path is a directory.
    #[error("Not a file: {0}")]
    NotAFile(String),

    /// Caller-supplied path was rejected.
    #[error("Invalid path: {0}")]
    InvalidPath(String),

    /// The connected client does not expose cluster introspection.
    #[error("Cluster introspection not supported by this client")]
    Unsupported,

    /// Invalid or unexpected response from the remote filesystem.
    #[error("Invalid response from remote filesystem")]
    InvalidResponse,
}

/// Result type alias for gateway operations.
pub type Result<T> = std::result::Result<T, GatewayError>;
