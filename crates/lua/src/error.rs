//! Error types for mortar-lua

use thiserror::Error;

/// Errors that can occur while evaluating a build script
#[derive(Debug, Error)]
pub enum Error {
    #[error("lua runtime error: {0}")]
    Runtime(#[from] mlua::Error),

    #[error("build script not found: {0}")]
    ScriptNotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for script evaluation
pub type Result<T> = std::result::Result<T, Error>;
