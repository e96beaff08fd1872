//! Recommender model persistence
//!
//! A model directory holds `*.json` files, each an array of [`ModelEntry`].
//! [`ModelStore::save`] writes one file per receiver type; [`ModelStore::load`]
//! accepts any split, since entries carry their own receiver type.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::query::{Query, QuerySelection};

#[derive(Error, Debug)]
pub enum ModelError {
    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse model file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("Model directory not found: {0}")]
    DirectoryNotFound(PathBuf),
}

/// One observed invocation: the query at a site and the method called there
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelEntry {
    pub query: Query,
    pub method: String,
}

impl ModelEntry {
    /// Build an entry from a reconstructed query, if its selection is known
    pub fn from_selection(qs: QuerySelection) -> Option<Self> {
        let method = qs.selection?;
        Some(Self {
            query: qs.query,
            method,
        })
    }
}

/// In-memory model, indexed by receiver type
#[derive(Debug, Default, Clone)]
pub struct ModelStore {
    by_receiver: BTreeMap<String, Vec<ModelEntry>>,
}

impl ModelStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, entry: ModelEntry) {
        self.by_receiver
            .entry(entry.query.receiver_type.clone())
            .or_default()
            .push(entry);
    }

    /// Observations for a receiver type, in insertion order
    pub fn entries_for(&self, receiver_type: &str) -> &[ModelEntry] {
        self.by_receiver
            .get(receiver_type)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Total number of observations
    pub fn len(&self) -> usize {
        self.by_receiver.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.by_receiver.is_empty()
    }

    pub fn receiver_types(&self) -> impl Iterator<Item = &str> {
        self.by_receiver.keys().map(String::as_str)
    }

    /// Load every `*.json` file directly under `dir`, in file-name order
    pub fn load(dir: &Path) -> Result<Self, ModelError> {
        let _span = tracing::info_span!("model_load", dir = %dir.display()).entered();
        if !dir.is_dir() {
            return Err(ModelError::DirectoryNotFound(dir.to_path_buf()));
        }

        let files = model_files(dir)?;
        let mut store = Self::new();
        for path in &files {
            let content = std::fs::read_to_string(path).map_err(|e| io_err(path, e))?;
            let entries: Vec<ModelEntry> =
                serde_json::from_str(&content).map_err(|source| ModelError::Parse {
                    path: path.clone(),
                    source,
                })?;
            tracing::debug!(path = %path.display(), entries = entries.len(), "Loaded model file");
            for entry in entries {
                store.insert(entry);
            }
        }

        tracing::info!(
            files = files.len(),
            receiver_types = store.by_receiver.len(),
            entries = store.len(),
            "Model loaded"
        );
        Ok(store)
    }

    /// Write the model into `dir`, one file per receiver type
    ///
    /// File names are a digest of the receiver type so arbitrary type names
    /// map to safe, stable paths. Any model files already in `dir` are
    /// removed first; other files are left alone.
    pub fn save(&self, dir: &Path) -> Result<usize, ModelError> {
        std::fs::create_dir_all(dir).map_err(|e| io_err(dir, e))?;
        let stale = model_files(dir)?;
        for path in &stale {
            std::fs::remove_file(path).map_err(|e| io_err(path, e))?;
        }
        if !stale.is_empty() {
            tracing::debug!(dir = %dir.display(), removed = stale.len(), "Removed previous model files");
        }

        for (receiver, entries) in &self.by_receiver {
            let path = dir.join(model_file_name(receiver));
            let json = serde_json::to_string_pretty(entries).map_err(|source| {
                ModelError::Parse {
                    path: path.clone(),
                    source,
                }
            })?;
            std::fs::write(&path, json).map_err(|e| io_err(&path, e))?;
        }

        tracing::info!(dir = %dir.display(), files = self.by_receiver.len(), "Model saved");
        Ok(self.by_receiver.len())
    }
}

/// `*.json` files directly under `dir`, sorted by path
fn model_files(dir: &Path) -> Result<Vec<PathBuf>, ModelError> {
    let mut files: Vec<PathBuf> = std::fs::read_dir(dir)
        .map_err(|e| io_err(dir, e))?
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| io_err(dir, e))?
        .into_iter()
        .map(|e| e.path())
        .filter(|p| p.is_file() && p.extension().is_some_and(|e| e == "json"))
        .collect();
    files.sort();
    Ok(files)
}

fn io_err(path: &Path, source: std::io::Error) -> ModelError {
    ModelError::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// File name holding the observations of one receiver type
pub(crate) fn model_file_name(receiver_type: &str) -> String {
    let hash = blake3::hash(receiver_type.as_bytes());
    format!("{}.json", &hash.to_hex()[..16])
}
