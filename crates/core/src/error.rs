//! Error types for mortar-core

use thiserror::Error;

/// Errors that can occur in core operations
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to write descriptor '{path}': {source}")]
    Descriptor {
        path: String,
        source: std::io::Error,
    },

    #[error("failed to copy '{from}' -> '{to}': {source}")]
    Copy {
        from: String,
        to: String,
        source: std::io::Error,
    },

    #[error("copy source does not exist: {0}")]
    CopySourceMissing(String),
}
