//! CLI command definitions and handlers

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub mod args;
pub mod config;
pub mod context;
pub mod offline;
pub mod records;
pub mod regions;
pub mod sync;

pub use args::{GlobalOptions, JsonArg, OutputFormat};
pub use context::CommandContext;

use crate::client::Resource;

/// riskop - Risk Index data layer client with offline support
#[derive(Parser, Debug)]
#[command(name = "riskop")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Output format (table, json)
    #[arg(
        long,
        global = true,
        env = "RISKOP_FORMAT",
        default_value = "table",
        hide_env = true
    )]
    pub format: OutputFormat,

    /// Backend base URL
    #[arg(long, global = true, env = "RISKOP_API_URL", hide_env = true)]
    pub api_url: Option<String>,

    /// Override config file location
    #[arg(long, global = true, env = "RISKOP_CONFIG", hide_env = true)]
    pub config: Option<PathBuf>,

    /// Offline store directory
    #[arg(long, global = true, env = "RISKOP_DATA_DIR", hide_env = true)]
    pub data_dir: Option<PathBuf>,

    /// Request timeout in seconds
    #[arg(long, global = true, env = "RISKOP_TIMEOUT", hide_env = true)]
    pub timeout: Option<u64>,

    /// Enable debug logging
    #[arg(long, global = true, env = "RISKOP_DEBUG", hide_env = true)]
    pub debug: bool,

    /// Bypass the in-memory request cache
    #[arg(long, global = true, env = "RISKOP_NO_CACHE", hide_env = true)]
    pub no_cache: bool,

    /// Start offline: writes are queued without contacting the backend
    #[arg(long, global = true, env = "RISKOP_OFFLINE", hide_env = true)]
    pub offline: bool,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Display version information
    Version,

    /// Read and edit map regions and their risk history
    #[command(subcommand)]
    Regions(RegionsCommands),

    /// List records of a resource group
    Get {
        /// Resource group
        resource: Resource,
    },

    /// Create a record in a resource group
    Create {
        /// Resource group
        resource: Resource,

        /// Record as a JSON object
        #[arg(long)]
        data: JsonArg,
    },

    /// Delete a record from a resource group
    Delete {
        /// Resource group
        resource: Resource,

        /// Record ID
        id: i64,
    },

    /// Conscience voting buttons
    #[command(subcommand)]
    Conscience(ConscienceCommands),

    /// Application settings
    #[command(subcommand)]
    Settings(SettingsCommands),

    /// Send a notification
    Notify {
        /// Notification payload as JSON
        #[arg(long)]
        data: JsonArg,
    },

    /// Per-user widget layouts
    #[command(subcommand)]
    Layout(LayoutCommands),

    /// Replay queued writes and warm the offline store
    #[command(subcommand)]
    Sync(SyncCommands),

    /// Inspect or wipe the offline store
    #[command(subcommand)]
    Offline(OfflineCommands),

    /// Show effective configuration
    #[command(subcommand)]
    Config(ConfigCommands),
}

/// Region subcommands
#[derive(Subcommand, Debug)]
pub enum RegionsCommands {
    /// List all regions
    List,

    /// Show a region with its history
    Show {
        /// Region ID
        id: i64,
    },

    /// Add a region
    Add {
        #[arg(long)]
        name: String,

        #[arg(long, allow_hyphen_values = true)]
        lat: String,

        #[arg(long, allow_hyphen_values = true)]
        lng: String,

        #[arg(long, default_value = "10")]
        zoom: String,
    },

    /// Delete a region
    Delete {
        /// Region ID
        id: i64,
    },

    /// Set a region's current risk index
    SetIndex {
        /// Region ID
        id: i64,

        /// New index value
        #[arg(allow_hyphen_values = true)]
        value: f64,
    },

    /// Replace a region's history
    SetHistory {
        /// Region ID
        id: i64,

        /// History as a JSON array of {date, value}
        #[arg(long)]
        data: JsonArg,
    },

    /// Delete one day from a region's history
    DeleteDay {
        /// Region ID
        id: i64,

        /// Day to delete (YYYY-MM-DD)
        date: String,
    },

    /// Roll a region's history forward by one day
    ShiftDay {
        /// Region ID
        id: i64,
    },
}

/// Conscience subcommands
#[derive(Subcommand, Debug)]
pub enum ConscienceCommands {
    /// Toggle a conscience button
    Toggle {
        /// Button payload as JSON
        #[arg(long)]
        data: JsonArg,
    },
}

/// Settings subcommands
#[derive(Subcommand, Debug)]
pub enum SettingsCommands {
    /// Show current settings
    Show,

    /// Save settings
    Save {
        /// Settings object as JSON
        #[arg(long)]
        data: JsonArg,
    },
}

/// Widget layout subcommands
#[derive(Subcommand, Debug)]
pub enum LayoutCommands {
    /// Show a user's widget layout
    Get {
        /// User ID
        user_id: String,
    },

    /// Save a user's widget layout
    Save {
        /// User ID
        user_id: String,

        /// Layout as JSON
        #[arg(long)]
        data: JsonArg,
    },
}

/// Sync subcommands
#[derive(Subcommand, Debug)]
pub enum SyncCommands {
    /// Show connectivity and the pending-write queue
    Status,

    /// Replay pending writes once
    Run,

    /// Probe the backend and replay pending writes whenever it comes back
    Watch,

    /// Fetch every cacheable resource so it is available offline
    Prefetch,
}

/// Offline store subcommands
#[derive(Subcommand, Debug)]
pub enum OfflineCommands {
    /// Show offline store statistics
    Stats,

    /// Delete all cached responses and pending writes
    Clear {
        /// Skip the confirmation requirement
        #[arg(long)]
        yes: bool,
    },

    /// Print the offline store directory
    Path,
}

/// Config subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Print the effective configuration
    Show,

    /// Print the config file path
    Path,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_create_with_json() {
        let cli = Cli::parse_from([
            "riskop",
            "create",
            "markers",
            "--data",
            r#"{"lat": 55.7}"#,
            "--format",
            "json",
        ]);

        assert_eq!(cli.format, OutputFormat::Json);
        match cli.command {
            Commands::Create { resource, data } => {
                assert_eq!(resource, Resource::Markers);
                assert_eq!(data.0["lat"], 55.7);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_negative_index() {
        let cli = Cli::parse_from(["riskop", "regions", "set-index", "3", "-1.5"]);
        match cli.command {
            Commands::Regions(RegionsCommands::SetIndex { id, value }) => {
                assert_eq!(id, 3);
                assert_eq!(value, -1.5);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_resource_names_are_kebab_case() {
        let cli = Cli::parse_from(["riskop", "get", "conscience-history"]);
        assert!(matches!(
            cli.command,
            Commands::Get {
                resource: Resource::ConscienceHistory
            }
        ));
    }
}
