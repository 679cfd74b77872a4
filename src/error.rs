//! Error types for loading tuning files and leaderboard storage
//!
//! The simulation itself never fails; only the edges that touch the
//! filesystem or parse external data return these.

/// Errors from tuning and leaderboard I/O
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// IO error from filesystem
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed JSON
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Tuning values out of their valid range
    #[error("Invalid tuning: {0}")]
    InvalidTuning(String),
}

/// Result type for tuning and leaderboard operations
pub type Result<T> = std::result::Result<T, Error>;
