pub mod types;
pub mod walk;

use std::path::{Path, PathBuf};
use std::sync::mpsc;

use crate::error::ScanError;
use self::types::{FileRecord, ScanProgress};

/// Anything that can hand the core a complete list of file records.
///
/// The list is delivered atomically: the tree builder never sees a partial scan.
pub trait RecordSource {
    fn records(&self) -> Result<Vec<FileRecord>, ScanError>;
}

impl RecordSource for [FileRecord] {
    fn records(&self) -> Result<Vec<FileRecord>, ScanError> {
        Ok(self.to_vec())
    }
}

impl RecordSource for Vec<FileRecord> {
    fn records(&self) -> Result<Vec<FileRecord>, ScanError> {
        Ok(self.clone())
    }
}

/// Filesystem-backed record source.
pub struct DirectoryScanner {
    root: PathBuf,
    progress_tx: Option<mpsc::Sender<ScanProgress>>,
}

impl DirectoryScanner {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            progress_tx: None,
        }
    }

    /// Forward scan progress events to `tx`.
    pub fn with_progress(mut self, tx: mpsc::Sender<ScanProgress>) -> Self {
        self.progress_tx = Some(tx);
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl RecordSource for DirectoryScanner {
    fn records(&self) -> Result<Vec<FileRecord>, ScanError> {
        // Without a listener the events go to a receiver that is dropped right away.
        let tx = match &self.progress_tx {
            Some(tx) => tx.clone(),
            None => mpsc::channel().0,
        };
        walk::scan_walkdir(&self.root, tx)
    }
}

/// Read a JSON array of `{ "path": ..., "size": ... }` records.
pub fn load_records(path: &Path) -> Result<Vec<FileRecord>, ScanError> {
    let data = std::fs::read(path)?;
    let records: Vec<FileRecord> = serde_json::from_slice(&data)?;
    tracing::info!("Loaded {} records from {}", records.len(), path.display());
    Ok(records)
}
