use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use crate::config::Config;

/// Show memes from public meme APIs, falling back through sources in order.
#[derive(Debug, Parser)]
#[command(name = "memescroll", version)]
#[command(about = "A terminal meme viewer with multi-source fallback", long_about = None)]
pub struct Cli {
    /// TOML config file with the source list and timeouts
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Per-request timeout in seconds (overrides the config file)
    #[arg(short, long)]
    pub timeout: Option<u64>,

    /// Auto-refresh interval in seconds, 0 to disable (overrides the config file)
    #[arg(long)]
    pub refresh: Option<u64>,

    /// Fetch a single meme, print it as JSON and exit
    #[arg(long)]
    pub once: bool,

    /// Write logs to this file while the TUI is running
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

impl Cli {
    /// Load the config file, apply flag overrides, then validate the result.
    pub fn resolve_config(&self) -> Result<Config> {
        let mut config = Config::load(self.config.as_deref())?;
        self.apply(&mut config);
        config.validate()?;
        Ok(config)
    }

    /// Apply flag overrides on top of file/default config.
    pub fn apply(&self, config: &mut Config) {
        if let Some(timeout) = self.timeout {
            config.timeout_secs = timeout;
        }
        if let Some(refresh) = self.refresh {
            config.refresh_secs = refresh;
        }
    }
}
