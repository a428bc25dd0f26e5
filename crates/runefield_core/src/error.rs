//! Error types for the fallible edges of the editor (config and command parsing).
use thiserror::Error;

/// Top-level editor error type.
///
/// Editing operations themselves never fail; out-of-range input is clamped.
#[derive(Error, Debug)]
pub enum EditorError {
    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid command: {0}")]
    InvalidCommand(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
