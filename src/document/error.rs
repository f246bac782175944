//! Document serialization errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Unsupported document schema: expected {expected}, found {found}")]
    SchemaMismatch { expected: String, found: String },
}

pub type Result<T> = std::result::Result<T, DocumentError>;
