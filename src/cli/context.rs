//! Command execution context
//!
//! Resolves configuration and builds the data service once, so command
//! handlers only deal with their own operation.

use std::path::PathBuf;
use std::sync::Arc;

use serde::Serialize;
use tabled::Tabled;

use crate::cache::RequestCache;
use crate::cli::{GlobalOptions, OutputFormat};
use crate::client::{HttpClient, WriteResponse};
use crate::config::Config;
use crate::error::{Error, Result, StoreError};
use crate::offline::OfflineStore;
use crate::output::{formatters, json, table};
use crate::service::DataService;
use crate::sync::{Connectivity, NetworkState};

/// Context for command execution containing config, service, and output options.
pub struct CommandContext {
    /// Effective configuration (file plus flag overrides)
    pub config: Config,
    /// Data service over the HTTP backend (Arc-wrapped for the sync coordinator)
    pub service: Arc<DataService<HttpClient>>,
    /// Output format preference
    pub format: OutputFormat,
}

impl CommandContext {
    /// Create a new command context.
    ///
    /// An offline store that cannot be opened is logged and skipped; the
    /// service then runs without offline fallback or write queueing.
    ///
    /// # Errors
    /// Returns error if the config cannot be loaded or the HTTP client
    /// cannot be built.
    pub fn new(opts: &GlobalOptions) -> Result<Self> {
        let config = opts.resolve_config()?;

        let client = HttpClient::new(&config.api_url, config.timeout())?;
        log::debug!("Using backend at {}", client.base_url());
        let cache = RequestCache::new(config.cache.max_entries);

        let store = if config.offline.enabled {
            let dir = store_dir(&config);
            DataService::<HttpClient>::open_store(|| OfflineStore::open_at(&dir?))
        } else {
            log::debug!("Offline store disabled by configuration");
            None
        };

        let initial = if opts.offline {
            NetworkState::Offline
        } else {
            NetworkState::Online
        };

        let service = DataService::new(client, cache, store, Connectivity::new(initial));

        Ok(Self {
            config,
            service: Arc::new(service),
            format: opts.format,
        })
    }

    /// Print rows as a table, or as a JSON envelope carrying the network state
    pub fn print_rows<T: Tabled + Serialize>(&self, rows: &[T]) -> Result<()> {
        match self.format {
            OutputFormat::Table => println!("{}", table::format_table(rows)),
            OutputFormat::Json => self.print_json(rows)?,
        }
        Ok(())
    }

    /// Print a single JSON value
    pub fn print_value<T: Serialize + ?Sized>(&self, data: &T) -> Result<()> {
        match self.format {
            OutputFormat::Table => println!("{}", serde_json::to_string_pretty(data)?),
            OutputFormat::Json => self.print_json(data)?,
        }
        Ok(())
    }

    fn print_json<T: Serialize + ?Sized>(&self, data: &T) -> Result<()> {
        let state = self.service.connectivity().state();
        println!("{}", json::format_json_with_network(data, state)?);
        Ok(())
    }

    /// Report a write outcome. A write that neither succeeded nor got
    /// queued is returned as an error so the process exits non-zero.
    pub fn finish_write(&self, what: &str, resp: WriteResponse) -> Result<()> {
        match self.format {
            OutputFormat::Table => {
                if resp.ok || resp.queued {
                    println!("{}", formatters::write_status(what, &resp));
                }
            }
            OutputFormat::Json => self.print_json(&resp)?,
        }

        if resp.ok || resp.queued {
            Ok(())
        } else {
            Err(Error::Other(format!(
                "{} failed: {}",
                what,
                resp.error.as_deref().unwrap_or("unknown error")
            )))
        }
    }
}

/// Offline store directory: configured, or the platform cache dir
pub fn store_dir(config: &Config) -> std::result::Result<PathBuf, StoreError> {
    match &config.offline.data_dir {
        Some(dir) => Ok(dir.clone()),
        None => OfflineStore::default_dir(),
    }
}
