use std::path::PathBuf;

use thiserror::Error;

/// Crate-wide result type alias.
pub type Result<T> = std::result::Result<T, DiskmapError>;

/// Errors surfaced by the scan → tree → layout pipeline.
#[derive(Debug, Error)]
pub enum DiskmapError {
    /// The record source produced nothing that could be placed in a tree.
    #[error("no files found to display")]
    EmptyInput,

    /// Non-positive viewport. The navigator logs and ignores these instead of returning them.
    #[error("invalid viewport {width}x{height}")]
    InvalidViewport { width: f64, height: f64 },

    /// The record source itself failed.
    #[error(transparent)]
    Scanner(#[from] ScanError),
}

/// Failures reported by a record source.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("directory does not exist: {0}")]
    NotFound(PathBuf),

    #[error("permission denied: {0}")]
    PermissionDenied(PathBuf),

    #[error("path is not a directory: {0}")]
    NotADirectory(PathBuf),

    #[error("no files found in directory: {0}")]
    NoFiles(PathBuf),

    #[error("error walking directory: {0}")]
    Walk(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid record list: {0}")]
    Records(#[from] serde_json::Error),
}
