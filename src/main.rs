use anyhow::Result;
use clap::Parser;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, reload, EnvFilter};

mod cli;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    // Reloadable so `verbose = true` in a config file can raise the level later
    let (filter, log_filter) = reload::Layer::new(filter);
    // Log to stderr to keep stdout clean for the report table and JSON summary
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();

    cli::run_with(cli, &log_filter)
}
