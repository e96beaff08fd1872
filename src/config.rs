//! Configuration file support
//!
//! Config files are loaded in order (later overrides earlier):
//! 1. `~/.config/completion-eval/config.toml` (user defaults)
//! 2. `.completion-eval.toml` in the working directory (project overrides)
//!
//! CLI flags override all config file values.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::export::{ExportOptions, Quoting, RowLayout};
use crate::recommender::FactorWeights;

/// Project config file name
pub const PROJECT_CONFIG_FILE: &str = ".completion-eval.toml";

/// Configuration options loaded from config files
///
/// # Example
///
/// ```toml
/// output = "reports/evaluation.csv"
/// row_layout = "padded"     # or "ragged"
/// quoting = "necessary"     # or "never"
/// skip_bad_archives = true
/// quiet = false
/// verbose = false
///
/// [weights]
/// required_type = 0.3
/// object_origin = 0.1
/// ```
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Report destination (overridden by -o)
    pub output: Option<PathBuf>,
    pub row_layout: Option<RowLayout>,
    pub quoting: Option<Quoting>,
    /// Drop unreadable archives instead of aborting
    pub skip_bad_archives: Option<bool>,
    pub quiet: Option<bool>,
    pub verbose: Option<bool>,
    /// Factor weights for the bundled recommender
    pub weights: Option<FactorWeights>,
}

impl Config {
    /// Default report file, relative to the working directory
    pub const DEFAULT_OUTPUT: &'static str = "completion_evaluation.csv";

    /// Load configuration from user and project config files
    pub fn load(project_root: &Path) -> Self {
        let user_config = dirs::config_dir()
            .map(|d| d.join("completion-eval/config.toml"))
            .and_then(|p| Self::load_file(&p))
            .unwrap_or_default();

        let project_config =
            Self::load_file(&project_root.join(PROJECT_CONFIG_FILE)).unwrap_or_default();

        let merged = user_config.override_with(project_config);
        tracing::debug!(
            output = ?merged.output,
            row_layout = ?merged.row_layout,
            quoting = ?merged.quoting,
            skip_bad_archives = ?merged.skip_bad_archives,
            custom_weights = merged.weights.is_some(),
            "Effective config after merge"
        );
        merged
    }

    /// Load configuration from a specific file
    pub fn load_file(path: &Path) -> Option<Self> {
        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
            Err(e) => {
                tracing::warn!("Failed to read config {}: {}", path.display(), e);
                return None;
            }
        };

        match toml::from_str::<Self>(&content) {
            Ok(config) => {
                tracing::debug!(path = %path.display(), "Loaded config");
                Some(config)
            }
            Err(e) => {
                tracing::warn!("Failed to parse config {}: {}", path.display(), e);
                None
            }
        }
    }

    /// Layer another config on top (other overrides self where present)
    fn override_with(self, other: Self) -> Self {
        Config {
            output: other.output.or(self.output),
            row_layout: other.row_layout.or(self.row_layout),
            quoting: other.quoting.or(self.quoting),
            skip_bad_archives: other.skip_bad_archives.or(self.skip_bad_archives),
            quiet: other.quiet.or(self.quiet),
            verbose: other.verbose.or(self.verbose),
            weights: other.weights.or(self.weights),
        }
    }

    // ===== Accessors with defaults =====

    pub fn output_or_default(&self) -> PathBuf {
        self.output
            .clone()
            .unwrap_or_else(|| PathBuf::from(Self::DEFAULT_OUTPUT))
    }

    pub fn export_options(&self) -> ExportOptions {
        ExportOptions {
            layout: self.row_layout.unwrap_or_default(),
            quoting: self.quoting.unwrap_or_default(),
        }
    }

    pub fn skip_bad_archives_or_default(&self) -> bool {
        self.skip_bad_archives.unwrap_or(false)
    }

    pub fn weights_or_default(&self) -> FactorWeights {
        self.weights.unwrap_or_default()
    }
}
