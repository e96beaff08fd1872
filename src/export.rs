//! CSV export of a scorecard
//!
//! The header names 11 ranked slots (`_0` through `_10`) while rows carry at
//! most [`MAX_RANKED_RESULTS`] results. Existing consumers of the report rely
//! on both, so neither is "fixed" here.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::evaluation::{EvaluationRecord, MAX_RANKED_RESULTS};
use crate::recommender::{CandidateResult, SimilarityBreakdown};

/// Ranked slots advertised by the header
pub const HEADER_SLOTS: usize = 11;

/// Per-slot column prefixes, suffixed with `_<slot>` in the header
pub const SLOT_COLUMNS: [&str; 1 + SimilarityBreakdown::LEN] = [
    "recommendedMethod",
    "similarity",
    "similarityReceiverType",
    "similarityRequiredType",
    "similarityObjectOrigin",
    "similaritySurroundingExpression",
    "similarityEnclosingMethodReturnType",
    "similarityEnclosingMethodParameterSize",
    "similarityEnclosingMethodParameters",
    "similarityEnclosingMethodSuper",
];

/// Total number of header columns
pub const HEADER_WIDTH: usize = 2 + HEADER_SLOTS * SLOT_COLUMNS.len();

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Failed to write {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// How rows shorter than the header are written
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum RowLayout {
    /// Stop after the last populated field
    #[default]
    Ragged,
    /// Fill with empty fields up to the header width
    Padded,
}

/// Field quoting policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Quoting {
    /// Write fields verbatim; identifiers containing `,` corrupt the row
    #[default]
    Never,
    /// Quote fields containing a delimiter, quote or line break
    Necessary,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExportOptions {
    pub layout: RowLayout,
    pub quoting: Quoting,
}

/// Header row in column order
pub fn header() -> Vec<String> {
    let mut columns = Vec::with_capacity(HEADER_WIDTH);
    columns.push("evaluated".to_string());
    columns.push("selectedMethod".to_string());
    for slot in 0..HEADER_SLOTS {
        for prefix in SLOT_COLUMNS {
            columns.push(format!("{prefix}_{slot}"));
        }
    }
    columns
}

/// Render a score as shortest round-trip decimal text
///
/// Whole numbers keep a trailing `.0`; very small or large magnitudes use
/// exponent notation. Never rounds.
pub fn format_score(value: f64) -> String {
    format!("{value:?}")
}

fn push_candidate(row: &mut Vec<String>, candidate: &CandidateResult) {
    row.push(candidate.method.clone());
    row.extend(candidate.breakdown.scores().iter().map(|s| format_score(*s)));
}

/// Fields of one record's row, before padding
pub fn row_fields(record: &EvaluationRecord) -> Vec<String> {
    let mut row = Vec::with_capacity(HEADER_WIDTH);
    let evaluated = if record.is_matched() { "True" } else { "False" };
    row.push(evaluated.to_string());
    row.push(record.selected_method.clone());

    if let Some(results) = record.ranked_results() {
        for candidate in results.iter().take(MAX_RANKED_RESULTS) {
            push_candidate(&mut row, candidate);
        }
    }
    row
}

/// Write the header and one row per record
pub fn write_csv<W: Write>(
    writer: W,
    records: &[EvaluationRecord],
    options: &ExportOptions,
) -> Result<(), ExportError> {
    let quote_style = match options.quoting {
        Quoting::Never => csv::QuoteStyle::Never,
        Quoting::Necessary => csv::QuoteStyle::Necessary,
    };
    let mut csv_writer = csv::WriterBuilder::new()
        .flexible(true)
        .quote_style(quote_style)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(writer);

    csv_writer.write_record(header())?;
    for record in records {
        let mut row = row_fields(record);
        if options.layout == RowLayout::Padded {
            row.resize(HEADER_WIDTH, String::new());
        }
        csv_writer.write_record(&row)?;
    }
    csv_writer.flush().map_err(csv::Error::from)?;
    Ok(())
}

/// Write the report to `path`, replacing any existing file
pub fn write_csv_file(
    path: &Path,
    records: &[EvaluationRecord],
    options: &ExportOptions,
) -> Result<(), ExportError> {
    let _span = tracing::info_span!("write_csv", path = %path.display(), rows = records.len())
        .entered();
    let io_err = |source| ExportError::Io {
        path: path.display().to_string(),
        source,
    };
    let file = File::create(path).map_err(io_err)?;
    let mut out = BufWriter::new(file);
    write_csv(&mut out, records, options)?;
    out.flush().map_err(io_err)?;
    Ok(())
}
