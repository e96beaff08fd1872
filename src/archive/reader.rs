//! Sequential JSON Lines archive reader

use std::fs::File;
use std::io::{BufRead, BufReader, Lines};
use std::path::{Path, PathBuf};

use super::ArchiveError;
use crate::event::IdeEvent;

/// Reads events from one archive, one record per line
///
/// Blank lines are skipped. The first malformed line is yielded as an error;
/// callers decide whether to abort or drop the archive.
pub struct ArchiveReader<R = BufReader<File>> {
    path: PathBuf,
    lines: Lines<R>,
    line: usize,
}

impl ArchiveReader {
    /// Open an archive file
    pub fn open(path: &Path) -> Result<Self, ArchiveError> {
        let file = File::open(path).map_err(|source| ArchiveError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::from_reader(path, BufReader::new(file)))
    }
}

impl<R: BufRead> ArchiveReader<R> {
    /// Read records from an already-open buffered source
    ///
    /// `path` is only used in error messages.
    pub fn from_reader(path: impl Into<PathBuf>, reader: R) -> Self {
        Self {
            path: path.into(),
            lines: reader.lines(),
            line: 0,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl<R: BufRead> Iterator for ArchiveReader<R> {
    type Item = Result<IdeEvent, ArchiveError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let line = match self.lines.next()? {
                Ok(l) => l,
                Err(source) => {
                    return Some(Err(ArchiveError::Io {
                        path: self.path.clone(),
                        source,
                    }))
                }
            };
            self.line += 1;

            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }

            return Some(
                serde_json::from_str(trimmed).map_err(|source| ArchiveError::Malformed {
                    path: self.path.clone(),
                    line: self.line,
                    source,
                }),
            );
        }
    }
}
