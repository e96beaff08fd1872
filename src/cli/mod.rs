//! CLI implementation for completion-eval

mod config;
mod display;

use config::apply_config_defaults;

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use tracing_subscriber::{reload, EnvFilter, Registry};

use completion_eval::archive::discover_archives;
use completion_eval::config::Config;
use completion_eval::evaluation::Evaluator;
use completion_eval::export::{write_csv_file, ExportOptions, Quoting, RowLayout};
use completion_eval::mine::mine_archives;
use completion_eval::{ContextProcessor, MethodCallRecommender, ModelStore};

#[derive(Parser)]
#[command(name = "completion-eval")]
#[command(about = "Evaluate a method-call completion recommender against recorded IDE events")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Directory holding the recommender model (*.json)
    model_dir: Option<PathBuf>,

    /// Directory holding event archives (*.jsonl)
    event_dir: Option<PathBuf>,

    /// Report destination
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Row layout for results shorter than the header
    #[arg(long, value_enum)]
    layout: Option<RowLayout>,

    /// Field quoting policy
    #[arg(long, value_enum)]
    quote: Option<Quoting>,

    /// Log and skip unreadable archives instead of aborting
    #[arg(long)]
    skip_bad_archives: bool,

    /// Print the summary as JSON
    #[arg(long)]
    json: bool,

    /// Suppress progress output
    #[arg(short, long)]
    quiet: bool,

    /// Show debug info (sets RUST_LOG=debug)
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a recommender model from the contexts in event archives
    Mine {
        /// Directory holding event archives (*.jsonl)
        event_dir: PathBuf,
        /// Directory the model files are written to
        model_dir: PathBuf,
    },
}

/// Handle for changing the log filter after the subscriber is installed
pub type LogFilter = reload::Handle<EnvFilter, Registry>;

/// Run CLI with pre-parsed arguments
///
/// Config is loaded here, after main has installed the subscriber, so config
/// warnings reach stderr.
pub fn run_with(mut cli: Cli, log_filter: &LogFilter) -> Result<()> {
    let config = Config::load(&std::env::current_dir()?);
    let verbose_before = cli.verbose;
    apply_config_defaults(&mut cli, &config);
    if cli.verbose && !verbose_before {
        if let Err(e) = log_filter.reload(EnvFilter::new("debug")) {
            tracing::warn!("Failed to raise log level from config: {}", e);
        }
    }

    match cli.command {
        Some(Commands::Mine {
            ref event_dir,
            ref model_dir,
        }) => cmd_mine(&cli, event_dir, model_dir),
        None => cmd_evaluate(&cli, &config),
    }
}

// === Commands ===

/// Replay every archive under the event directory and write the report
fn cmd_evaluate(cli: &Cli, config: &Config) -> Result<()> {
    let (Some(model_dir), Some(event_dir)) = (&cli.model_dir, &cli.event_dir) else {
        tracing::error!("Not enough arguments provided");
        bail!("Not enough arguments provided! Usage: completion-eval <MODEL_DIR> <EVENT_DIR>");
    };
    tracing::info!(
        model_dir = %model_dir.display(),
        event_dir = %event_dir.display(),
        "Starting evaluation"
    );

    let model = ModelStore::load(model_dir)
        .with_context(|| format!("Failed to load model from {}", model_dir.display()))?;
    let recommender = MethodCallRecommender::new(model).with_weights(config.weights_or_default());
    let evaluator = Evaluator::new(ContextProcessor::new(), recommender);

    let archives = discover_archives(event_dir)
        .with_context(|| format!("Failed to list archives in {}", event_dir.display()))?;

    let print_table = !cli.quiet && !cli.json;
    if print_table {
        display::print_header();
    }

    let progress = progress_bar(cli.quiet, archives.len());
    let report = evaluator
        .evaluate_archives(&archives, cli.skip_bad_archives, |_| progress.inc(1))
        .context("Evaluation aborted")?;
    progress.finish_and_clear();

    if print_table {
        display::print_top_candidates(report.scorecard.records());
    }

    let output = cli
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(Config::DEFAULT_OUTPUT));
    let options = ExportOptions {
        layout: cli.layout.unwrap_or_default(),
        quoting: cli.quote.unwrap_or_default(),
    };
    write_csv_file(&output, report.scorecard.records(), &options)
        .with_context(|| format!("Failed to write report {}", output.display()))?;

    let summary = report.scorecard.summary();
    if cli.json {
        display::print_summary_json(&summary, &report, &output)?;
    } else if !cli.quiet {
        display::print_summary(&summary, &report, &output);
    }
    Ok(())
}

/// Build a model from archive contexts and save it
fn cmd_mine(cli: &Cli, event_dir: &std::path::Path, model_dir: &std::path::Path) -> Result<()> {
    let archives = discover_archives(event_dir)
        .with_context(|| format!("Failed to list archives in {}", event_dir.display()))?;

    let mut store = ModelStore::new();
    let stats = mine_archives(&ContextProcessor::new(), &archives, &mut store)
        .context("Mining aborted")?;
    let files = store
        .save(model_dir)
        .with_context(|| format!("Failed to save model to {}", model_dir.display()))?;

    if !cli.quiet {
        display::print_mine_summary(&stats, files, model_dir);
    }
    Ok(())
}

fn progress_bar(quiet: bool, total: usize) -> ProgressBar {
    if quiet {
        return ProgressBar::hidden();
    }
    let pb = ProgressBar::new(total as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} archives")
            .unwrap_or_else(|e| {
                tracing::warn!("Progress template error: {}, using default", e);
                ProgressStyle::default_bar()
            }),
    );
    pb
}
