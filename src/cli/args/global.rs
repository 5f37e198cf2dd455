//! Global CLI options shared across all commands

use std::path::{Path, PathBuf};

use crate::cli::{Cli, OutputFormat};
use crate::config::Config;
use crate::error::Result;

/// Global CLI options passed to all command handlers.
///
/// # Precedence
///
/// CLI flag > environment variable > config file > default. This struct
/// captures the CLI/env layer; [`GlobalOptions::resolve_config`] folds it
/// over the config file.
#[derive(Debug, Clone, Default)]
pub struct GlobalOptions {
    /// Output format (table, json)
    pub format: OutputFormat,

    /// Custom config file path (defaults to ~/.riskop/config.yaml)
    pub config: Option<PathBuf>,

    /// Backend base URL override
    pub api_url: Option<String>,

    /// Offline store directory override
    pub data_dir: Option<PathBuf>,

    /// Request timeout override, in seconds
    pub timeout: Option<u64>,

    /// Disable the in-memory Request Cache
    pub no_cache: bool,

    /// Start in the OFFLINE state; writes go straight to the queue
    pub offline: bool,
}

impl GlobalOptions {
    /// Create GlobalOptions from a parsed CLI struct.
    pub fn from_cli(cli: &Cli) -> Self {
        Self {
            format: cli.format,
            config: cli.config.clone(),
            api_url: cli.api_url.clone(),
            data_dir: cli.data_dir.clone(),
            timeout: cli.timeout,
            no_cache: cli.no_cache,
            offline: cli.offline,
        }
    }

    pub fn config_ref(&self) -> Option<&Path> {
        self.config.as_deref()
    }

    /// Load the config file and apply flag overrides on top
    pub fn resolve_config(&self) -> Result<Config> {
        let mut config = Config::load(self.config_ref())?;
        self.apply(&mut config);
        config.validate()?;
        Ok(config)
    }

    fn apply(&self, config: &mut Config) {
        if let Some(url) = &self.api_url {
            config.api_url = url.clone();
        }
        if let Some(dir) = &self.data_dir {
            config.offline.data_dir = Some(dir.clone());
        }
        if let Some(secs) = self.timeout {
            config.timeout_secs = secs;
        }
        if self.no_cache {
            config.cache.max_entries = 0;
        }
    }
}
