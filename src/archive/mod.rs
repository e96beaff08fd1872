//! Event archives
//!
//! An archive is a JSON Lines file holding one [`IdeEvent`](crate::event::IdeEvent)
//! per line. Archives are discovered directly under an event directory and
//! read sequentially; the reader owns its file handle, so dropping it closes
//! the archive on every exit path.

mod reader;

pub use reader::ArchiveReader;

use std::path::{Path, PathBuf};
use thiserror::Error;

/// File extensions recognized as event archives
pub const ARCHIVE_EXTENSIONS: &[&str] = &["jsonl"];

#[derive(Error, Debug)]
pub enum ArchiveError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Malformed record at {path}:{line}: {source}")]
    Malformed {
        path: PathBuf,
        line: usize,
        #[source]
        source: serde_json::Error,
    },
    #[error("Event directory not found: {0}")]
    DirectoryNotFound(PathBuf),
}

/// Check whether a path carries a recognized archive extension
pub fn is_archive(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|ext| {
            ARCHIVE_EXTENSIONS
                .iter()
                .any(|known| known.eq_ignore_ascii_case(ext))
        })
        .unwrap_or(false)
}

/// List archives directly under `dir`, sorted by file name
///
/// Not recursive. Sorting makes evaluation order, and therefore output,
/// reproducible across runs and platforms.
pub fn discover_archives(dir: &Path) -> Result<Vec<PathBuf>, ArchiveError> {
    if !dir.is_dir() {
        return Err(ArchiveError::DirectoryNotFound(dir.to_path_buf()));
    }
    let entries = std::fs::read_dir(dir).map_err(|source| ArchiveError::Io {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut archives = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|source| ArchiveError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
        let path = entry.path();
        if path.is_file() && is_archive(&path) {
            archives.push(path);
        }
    }
    archives.sort_by(|a, b| a.file_name().cmp(&b.file_name()));

    tracing::debug!(dir = %dir.display(), count = archives.len(), "Discovered archives");
    Ok(archives)
}
