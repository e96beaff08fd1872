//! # completion-eval - Offline evaluation of completion recommenders
//!
//! Replays recorded IDE completion events against a method-call recommender
//! and reports, per accepted completion, what the recommender would have
//! ranked at that point.
//!
//! ## Pipeline
//!
//! 1. [`archive`] reads JSON Lines event archives
//! 2. [`evaluation`] keeps applied method completions, rebuilds the session's
//!    queries with a [`QueryReconstructor`], finds the query that selected the
//!    accepted method and asks a [`RankedRetriever`] for candidates
//! 3. [`export`] writes the resulting [`Scorecard`] as CSV
//!
//! ## Quick Start
//!
//! ```no_run
//! use completion_eval::{ContextProcessor, Evaluator, MethodCallRecommender, ModelStore};
//! use completion_eval::export::{write_csv_file, ExportOptions};
//! use std::path::Path;
//!
//! # fn main() -> anyhow::Result<()> {
//! let model = ModelStore::load(Path::new("model"))?;
//! let evaluator = Evaluator::new(ContextProcessor::new(), MethodCallRecommender::new(model));
//!
//! let report = evaluator.evaluate_directory(Path::new("events"), false)?;
//! write_csv_file(
//!     Path::new("completion_evaluation.csv"),
//!     report.scorecard.records(),
//!     &ExportOptions::default(),
//! )?;
//! println!("MRR: {:.3}", report.scorecard.summary().mrr);
//! # Ok(())
//! # }
//! ```

pub mod archive;
pub mod config;
pub mod evaluation;
pub mod event;
pub mod export;
pub mod mine;
pub mod query;
pub mod recommender;

pub use evaluation::{EvaluationRecord, Evaluator, Outcome, Scorecard};
pub use query::{ContextProcessor, Query, QueryReconstructor, QuerySelection};
pub use recommender::{
    CandidateResult, MethodCallRecommender, ModelStore, RankedRetriever, SimilarityBreakdown,
};
