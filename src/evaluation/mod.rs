//! Evaluation pipeline
//!
//! For every archive: read events, keep applied method completions, rebuild
//! the session's queries from the captured context, find the query that
//! selected the accepted method, and ask the recommender what it would have
//! ranked there. Each kept event yields exactly one [`EvaluationRecord`].

mod filter;
mod matcher;
mod scorecard;

pub use filter::{accepted_method, filter_event, Rejection};
pub use matcher::find_match;
pub use scorecard::{EvaluationRecord, Outcome, Scorecard, Summary, MAX_RANKED_RESULTS};

use std::path::{Path, PathBuf};

use rayon::prelude::*;

use crate::archive::{discover_archives, ArchiveError, ArchiveReader};
use crate::event::IdeEvent;
use crate::query::QueryReconstructor;
use crate::recommender::RankedRetriever;

/// Counters for one archive pass
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ArchiveStats {
    pub events: usize,
    pub not_completion: usize,
    pub not_applied: usize,
    pub no_selection: usize,
    pub not_method: usize,
    pub evaluated: usize,
}

impl ArchiveStats {
    fn reject(&mut self, why: Rejection) {
        match why {
            Rejection::NotCompletion => self.not_completion += 1,
            Rejection::NotApplied => self.not_applied += 1,
            Rejection::NoSelection => self.no_selection += 1,
            Rejection::NotMethod => self.not_method += 1,
        }
    }
}

/// An archive that failed and was left out of the scorecard
#[derive(Debug)]
pub struct SkippedArchive {
    pub path: PathBuf,
    pub error: ArchiveError,
}

/// Result of evaluating a set of archives
#[derive(Debug, Default)]
pub struct RunReport {
    pub scorecard: Scorecard,
    pub archives: usize,
    pub skipped: Vec<SkippedArchive>,
}

/// Replays completion events against a recommender
pub struct Evaluator<Q, R> {
    reconstructor: Q,
    retriever: R,
}

impl<Q: QueryReconstructor, R: RankedRetriever> Evaluator<Q, R> {
    pub fn new(reconstructor: Q, retriever: R) -> Self {
        Self {
            reconstructor,
            retriever,
        }
    }

    pub fn retriever(&self) -> &R {
        &self.retriever
    }

    /// Evaluate one event; `None` when the filter rejects it
    pub fn evaluate_event(&self, event: &IdeEvent) -> Option<EvaluationRecord> {
        self.try_evaluate_event(event).ok()
    }

    fn try_evaluate_event(&self, event: &IdeEvent) -> Result<EvaluationRecord, Rejection> {
        let (completion, selected) = filter_event(event)?;

        let query_selections = self.reconstructor.reconstruct(&completion.context);
        let record = match find_match(&query_selections, selected) {
            Some(index) => {
                let results = self.retriever.retrieve(&query_selections[index].query);
                EvaluationRecord::matched(selected, results)
            }
            None => {
                tracing::debug!(
                    selected,
                    queries = query_selections.len(),
                    "No reconstructed query selected the accepted method"
                );
                EvaluationRecord::unmatched(selected)
            }
        };
        Ok(record)
    }

    /// Evaluate a stream of events, stopping at the first read error
    pub fn evaluate_events<I>(
        &self,
        events: I,
    ) -> Result<(Vec<EvaluationRecord>, ArchiveStats), ArchiveError>
    where
        I: IntoIterator<Item = Result<IdeEvent, ArchiveError>>,
    {
        let mut stats = ArchiveStats::default();
        let mut records = Vec::new();
        for event in events {
            let event = event?;
            stats.events += 1;
            match self.try_evaluate_event(&event) {
                Ok(record) => {
                    stats.evaluated += 1;
                    records.push(record);
                }
                Err(why) => stats.reject(why),
            }
        }
        Ok((records, stats))
    }

    /// Evaluate every event of one archive file
    ///
    /// The archive is closed before returning, whether or not reading succeeded.
    pub fn evaluate_archive(&self, path: &Path) -> Result<Vec<EvaluationRecord>, ArchiveError> {
        let _span = tracing::info_span!("evaluate_archive", path = %path.display()).entered();
        let reader = ArchiveReader::open(path)?;
        let (records, stats) = self.evaluate_events(reader)?;
        tracing::debug!(
            events = stats.events,
            evaluated = stats.evaluated,
            not_completion = stats.not_completion,
            not_applied = stats.not_applied,
            no_selection = stats.no_selection,
            not_method = stats.not_method,
            "Archive evaluated"
        );
        Ok(records)
    }

    /// Evaluate archives in parallel, concatenating records in archive order
    ///
    /// With `skip_bad_archives`, a failing archive is logged and left out;
    /// otherwise the first failure (in archive order) aborts the run.
    /// `on_archive_done` is called once per archive as it finishes.
    pub fn evaluate_archives<F>(
        &self,
        archives: &[PathBuf],
        skip_bad_archives: bool,
        on_archive_done: F,
    ) -> Result<RunReport, ArchiveError>
    where
        F: Fn(&Path) + Sync,
    {
        let _span = tracing::info_span!("evaluate_archives", count = archives.len()).entered();

        let outcomes: Vec<Result<Vec<EvaluationRecord>, ArchiveError>> = archives
            .par_iter()
            .map(|path| {
                let outcome = self.evaluate_archive(path);
                on_archive_done(path.as_path());
                outcome
            })
            .collect();

        let mut report = RunReport {
            archives: archives.len(),
            ..Default::default()
        };
        for (path, outcome) in archives.iter().zip(outcomes) {
            match outcome {
                Ok(records) => report.scorecard.extend(records),
                Err(error) if skip_bad_archives => {
                    tracing::warn!(path = %path.display(), error = %error, "Skipping unreadable archive");
                    report.skipped.push(SkippedArchive {
                        path: path.clone(),
                        error,
                    });
                }
                Err(error) => return Err(error),
            }
        }

        tracing::info!(
            archives = report.archives,
            skipped = report.skipped.len(),
            records = report.scorecard.len(),
            "Evaluation finished"
        );
        Ok(report)
    }

    /// Discover and evaluate every archive under `dir`
    pub fn evaluate_directory(
        &self,
        dir: &Path,
        skip_bad_archives: bool,
    ) -> Result<RunReport, ArchiveError> {
        let archives = discover_archives(dir)?;
        self.evaluate_archives(&archives, skip_bad_archives, |_| {})
    }
}
