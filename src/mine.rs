//! Model mining from recorded events
//!
//! Builds a [`ModelStore`] from the invocations captured in completion-event
//! contexts, so the recommender can be trained on one corpus and evaluated on
//! another.

use std::path::{Path, PathBuf};

use crate::archive::{ArchiveError, ArchiveReader};
use crate::query::QueryReconstructor;
use crate::recommender::{ModelEntry, ModelStore};

/// Counters for a mining run
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct MineStats {
    pub archives: usize,
    pub contexts: usize,
    pub entries: usize,
    /// Reconstructed queries dropped because their selection was unresolved
    pub unresolved: usize,
}

/// Add every resolved query of every completion context in `archives` to `store`
pub fn mine_archives<Q: QueryReconstructor>(
    reconstructor: &Q,
    archives: &[PathBuf],
    store: &mut ModelStore,
) -> Result<MineStats, ArchiveError> {
    let _span = tracing::info_span!("mine_archives", count = archives.len()).entered();
    let mut stats = MineStats::default();

    for path in archives {
        mine_archive(reconstructor, path, store, &mut stats)?;
        stats.archives += 1;
    }

    tracing::info!(
        archives = stats.archives,
        contexts = stats.contexts,
        entries = stats.entries,
        unresolved = stats.unresolved,
        "Mining finished"
    );
    Ok(stats)
}

fn mine_archive<Q: QueryReconstructor>(
    reconstructor: &Q,
    path: &Path,
    store: &mut ModelStore,
    stats: &mut MineStats,
) -> Result<(), ArchiveError> {
    for event in ArchiveReader::open(path)? {
        let event = event?;
        let Some(completion) = event.as_completion() else {
            continue;
        };
        stats.contexts += 1;
        for qs in reconstructor.reconstruct(&completion.context) {
            match ModelEntry::from_selection(qs) {
                Some(entry) => {
                    store.insert(entry);
                    stats.entries += 1;
                }
                None => stats.unresolved += 1,
            }
        }
    }
    Ok(())
}
