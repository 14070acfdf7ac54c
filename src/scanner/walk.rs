use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};
use std::sync::mpsc;
use std::time::Instant;

use super::types::{FileRecord, ScanProgress};
use crate::error::ScanError;

/// Files between two `ScanProgress::Progress` events.
const PROGRESS_INTERVAL: u64 = 1000;

/// Walk `root` and collect every regular file as a record relative to `root`.
///
/// The walk is serial: records are delivered all at once when the scan completes.
/// Entries that cannot be read because of missing permissions are skipped and
/// reported through `progress_tx`; any other walk error aborts the scan.
pub fn scan_walkdir(
    root: &Path,
    progress_tx: mpsc::Sender<ScanProgress>,
) -> Result<Vec<FileRecord>, ScanError> {
    let root = validate_root(root)?;
    let start = Instant::now();
    let _ = progress_tx.send(ScanProgress::Started { root: root.clone() });

    let walker = jwalk::WalkDir::new(&root)
        .skip_hidden(false)
        .sort(true)
        .parallelism(jwalk::Parallelism::Serial);

    let mut records = Vec::new();
    let mut total_bytes: u64 = 0;

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                if is_permission_denied(&e) {
                    let path = e.path().map(Path::to_path_buf).unwrap_or_else(|| root.clone());
                    tracing::warn!("Permission denied: {}", path.display());
                    let _ = progress_tx.send(ScanProgress::Error {
                        path,
                        message: e.to_string(),
                    });
                    continue;
                }
                return Err(ScanError::Walk(e.to_string()));
            }
        };

        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();
        let size = match std::fs::symlink_metadata(&path) {
            Ok(meta) => meta.len(),
            Err(e) if e.kind() == ErrorKind::PermissionDenied => {
                tracing::warn!("Permission denied: {}", path.display());
                let _ = progress_tx.send(ScanProgress::Error {
                    path,
                    message: e.to_string(),
                });
                continue;
            }
            Err(e) => return Err(ScanError::Walk(e.to_string())),
        };

        let Some(relative) = relative_slash_path(&root, &path) else {
            tracing::debug!("Skipping entry outside scan root: {}", path.display());
            continue;
        };

        total_bytes = total_bytes.saturating_add(size);
        records.push(FileRecord::new(relative, size));

        if records.len() as u64 % PROGRESS_INTERVAL == 0 {
            let _ = progress_tx.send(ScanProgress::Progress {
                files_scanned: records.len() as u64,
                total_bytes,
            });
        }
    }

    if records.is_empty() {
        return Err(ScanError::NoFiles(root));
    }

    let elapsed_ms = start.elapsed().as_millis() as u64;
    tracing::info!(
        "Scanned {} files ({} bytes) under {} in {} ms",
        records.len(),
        total_bytes,
        root.display(),
        elapsed_ms
    );
    let _ = progress_tx.send(ScanProgress::Completed {
        total_files: records.len() as u64,
        total_bytes,
        elapsed_ms,
    });

    Ok(records)
}

fn validate_root(root: &Path) -> Result<PathBuf, ScanError> {
    let canonical = match root.canonicalize() {
        Ok(path) => path,
        Err(e) => return Err(classify_io(root, e)),
    };
    let meta = std::fs::metadata(&canonical).map_err(|e| classify_io(root, e))?;
    if !meta.is_dir() {
        return Err(ScanError::NotADirectory(root.to_path_buf()));
    }
    Ok(canonical)
}

fn classify_io(root: &Path, e: std::io::Error) -> ScanError {
    match e.kind() {
        ErrorKind::NotFound => ScanError::NotFound(root.to_path_buf()),
        ErrorKind::PermissionDenied => ScanError::PermissionDenied(root.to_path_buf()),
        _ => ScanError::Io(e),
    }
}

fn is_permission_denied(e: &jwalk::Error) -> bool {
    e.io_error()
        .map(|io| io.kind() == ErrorKind::PermissionDenied)
        .unwrap_or(false)
}

/// `root/a/b.txt` → `"a/b.txt"`. Returns `None` for the root itself or paths outside it.
fn relative_slash_path(root: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(root).ok()?;
    let parts: Vec<String> = relative
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect();
    if parts.is_empty() {
        None
    } else {
        Some(parts.join("/"))
    }
}
