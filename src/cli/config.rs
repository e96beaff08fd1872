//! Config file application
//!
//! CLI flags always override config values.

use completion_eval::config::Config;

use super::Cli;

/// Fill options the user did not pass on the command line from config
pub(crate) fn apply_config_defaults(cli: &mut Cli, config: &Config) {
    if cli.output.is_none() {
        cli.output = config.output.clone();
    }
    if cli.layout.is_none() {
        cli.layout = config.row_layout;
    }
    if cli.quote.is_none() {
        cli.quote = config.quoting;
    }
    // Boolean flags can only be switched on by config, never off
    if !cli.skip_bad_archives {
        cli.skip_bad_archives = config.skip_bad_archives_or_default();
    }
    if !cli.quiet {
        if let Some(true) = config.quiet {
            cli.quiet = true;
        }
    }
    if !cli.verbose {
        if let Some(true) = config.verbose {
            cli.verbose = true;
        }
    }
}
