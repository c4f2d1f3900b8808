//! Recording file discovery
//!
//! Finds `.csv` logs under an input folder. Hidden files and folders are
//! skipped; unreadable entries are logged and skipped.

use std::path::{Path, PathBuf};

use thiserror::Error;
use walkdir::{DirEntry, WalkDir};

/// Recording scanner errors
#[derive(Debug, Error)]
pub enum ScanError {
    /// Specified path does not exist
    #[error("Path not found: {0}")]
    PathNotFound(PathBuf),

    /// Path exists but is not a directory
    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),
}

const RECORDING_EXTENSION: &str = "csv";

/// Find recording logs under `root`, sorted by path
///
/// Only the top level is searched unless `recursive` is set.
pub fn find_recordings(root: &Path, recursive: bool) -> Result<Vec<PathBuf>, ScanError> {
    if !root.exists() {
        return Err(ScanError::PathNotFound(root.to_path_buf()));
    }
    if !root.is_dir() {
        return Err(ScanError::NotADirectory(root.to_path_buf()));
    }

    let max_depth = if recursive { usize::MAX } else { 1 };
    let walker = WalkDir::new(root)
        .follow_links(false)
        .min_depth(1)
        .max_depth(max_depth)
        .into_iter()
        .filter_entry(|e| !is_hidden(e));

    let mut files = Vec::new();
    for entry in walker {
        match entry {
            Ok(entry) => {
                if entry.file_type().is_file() && is_recording(entry.path()) {
                    files.push(entry.path().to_path_buf());
                }
            }
            Err(e) => {
                tracing::warn!("Error accessing entry: {}", e);
            }
        }
    }

    files.sort();
    tracing::debug!(root = %root.display(), found = files.len(), "Recording scan complete");
    Ok(files)
}

/// Hidden below the root (the root itself may be `.`)
fn is_hidden(entry: &DirEntry) -> bool {
    entry.depth() > 0
        && entry
            .file_name()
            .to_str()
            .map(|name| name.starts_with('.'))
            .unwrap_or(false)
}

fn is_recording(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.eq_ignore_ascii_case(RECORDING_EXTENSION))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_recording() {
        assert!(is_recording(Path::new("shot_01.csv")));
        assert!(is_recording(Path::new("dir/SHOT.CSV")));
        assert!(!is_recording(Path::new("notes.txt")));
        assert!(!is_recording(Path::new("csv")));
    }

    #[test]
    fn test_missing_root() {
        let result = find_recordings(Path::new("/nonexistent/bta/recordings"), false);
        assert!(matches!(result, Err(ScanError::PathNotFound(_))));
    }
}
