//! Host-provided external services.
//!
//! The engine never talks to the network or clipboard directly; the
//! embedding application implements these traits. All failures are
//! recoverable: callers surface them as a status message and keep going.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RemoteError {
    /// The endpoint answered with a non-success status.
    #[error("Endpoint returned {status}: {message}")]
    Endpoint { status: u16, message: String },

    /// The request never completed (connection, timeout, ...).
    #[error("Transport error: {0}")]
    Transport(String),

    /// No clipboard is available in this host.
    #[error("Clipboard unavailable")]
    ClipboardUnavailable,
}

/// Destination for raw image uploads.
pub trait UploadEndpoint {
    /// Upload image bytes, returning the stored source identifier
    /// (path or URL) the host assigned.
    fn upload_image(&mut self, name: &str, data: &[u8]) -> Result<String, RemoteError>;
}

/// Destination for exported documents.
pub trait SaveEndpoint {
    fn save_document(&mut self, name: &str, json: &str) -> Result<(), RemoteError>;
}

/// Host clipboard.
pub trait Clipboard {
    fn copy_text(&mut self, text: &str) -> Result<(), RemoteError>;
}
