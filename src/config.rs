//! Configuration file handling.
//!
//! The configuration file is stored at `$HOME/.treasurer-report` and holds `key=value` lines.
//! Lines starting with `#` are comments. The only setting today is `submitted_line`, the
//! attribution printed at the bottom of every report, e.g.
//!
//! ```text
//! # treasurer report settings
//! submitted_line=Respectfully submitted by Pat Doe, Treasurer
//! ```
//!
//! A missing or unreadable file is not an error. The report is simply produced without the
//! signature line.

use crate::error::Res;
use anyhow::Context;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// The name of the configuration file in the user's home directory.
pub const CONFIG_FILE: &str = ".treasurer-report";

const SUBMITTED_LINE: &str = "submitted_line";

/// The settings that shape a report beyond its ledger and balances.
#[derive(Debug, Default, Clone, Eq, PartialEq)]
pub struct Config {
    submitted_line: Option<String>,
}

impl Config {
    pub fn new(submitted_line: Option<String>) -> Self {
        Self { submitted_line }
    }

    /// Loads the configuration at `path`. Problems are logged and yield the default `Config`.
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match read(path) {
            Ok(config) => config,
            Err(e) => {
                warn!("Ignoring configuration: {e:#}");
                Config::default()
            }
        }
    }

    /// The line naming who submitted the report, if one is configured.
    pub fn submitted_line(&self) -> Option<&str> {
        self.submitted_line.as_deref()
    }

    /// Parses configuration text.
    pub fn parse(text: &str) -> Self {
        let mut config = Config::default();
        for (ix, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let Some((key, value)) = line.split_once('=') else {
                warn!("Ignoring configuration line {} without '='", ix + 1);
                continue;
            };
            match key.trim() {
                SUBMITTED_LINE => {
                    let value = value.trim();
                    config.submitted_line = if value.is_empty() {
                        None
                    } else {
                        Some(value.to_string())
                    };
                }
                unknown => debug!("Ignoring unknown configuration key '{unknown}'"),
            }
        }
        config
    }
}

/// The default location of the configuration file, `$HOME/.treasurer-report`.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(CONFIG_FILE))
}

fn read(path: &Path) -> Res<Config> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file at {}", path.display()))?;
    debug!("Loaded configuration from {}", path.display());
    Ok(Config::parse(&text))
}
