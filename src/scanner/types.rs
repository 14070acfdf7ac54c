use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// One scanned file: a `/`-separated path relative to the scan root and its size in bytes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRecord {
    pub path: String,
    pub size: u64,
}

impl FileRecord {
    pub fn new(path: impl Into<String>, size: u64) -> Self {
        Self {
            path: path.into(),
            size,
        }
    }
}

/// Progress updates emitted during scanning.
#[derive(Debug, Clone)]
pub enum ScanProgress {
    /// Starting scan of a directory
    Started { root: PathBuf },
    /// Periodic progress update
    Progress { files_scanned: u64, total_bytes: u64 },
    /// Scan completed
    Completed {
        total_files: u64,
        total_bytes: u64,
        elapsed_ms: u64,
    },
    /// Error encountered (non-fatal, the entry was skipped)
    Error { path: PathBuf, message: String },
}
