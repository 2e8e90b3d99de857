//! Runtime configuration.
//!
//! Values come from an optional TOML file and are then overridden by CLI
//! flags.  Every field has a default, so an empty file (or no file) gives the
//! stock two-source setup.
//!
//! ```toml
//! timeout_secs = 10
//! refresh_secs = 0
//!
//! [[sources]]
//! url = "https://meme-api.com/gimme"
//! shape = "reddit_style"
//!
//! [[sources]]
//! url = "https://api.imgflip.com/get_memes"
//! shape = "imgflip_style"
//! ```

use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use serde::Deserialize;

use crate::fetcher::DEFAULT_TIMEOUT;
use crate::source::SourceDescriptor;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
    /// Auto-refresh interval for the TUI in seconds; 0 disables it.
    pub refresh_secs: u64,
    /// Sources in fallback order.
    pub sources: Vec<SourceDescriptor>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            timeout_secs: DEFAULT_TIMEOUT.as_secs(),
            refresh_secs: 0,
            sources: SourceDescriptor::defaults(),
        }
    }
}

impl Config {
    /// Load from `path`, or return the defaults when no path is given.
    ///
    /// Not validated here: CLI overrides still apply on top, so call
    /// [`Config::validate`] once they have been.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => {
                let text = fs::read_to_string(path)
                    .with_context(|| format!("reading config {}", path.display()))?;
                Self::from_toml(&text)
                    .with_context(|| format!("parsing config {}", path.display()))
            }
            None => Ok(Self::default()),
        }
    }

    pub fn from_toml(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    pub fn validate(&self) -> Result<()> {
        if self.timeout_secs == 0 {
            bail!("timeout_secs must be greater than zero");
        }
        if self.sources.is_empty() {
            tracing::warn!("no meme sources configured, every fetch will return the placeholder");
        }
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// `None` when auto-refresh is off.
    pub fn refresh_interval(&self) -> Option<Duration> {
        (self.refresh_secs > 0).then(|| Duration::from_secs(self.refresh_secs))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
