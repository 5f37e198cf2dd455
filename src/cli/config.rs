//! Configuration inspection commands

use crate::cli::{GlobalOptions, OutputFormat};
use crate::config::Config;
use crate::error::{ConfigError, Result};
use crate::output::json::format_json;

/// Print the effective configuration, flag overrides applied
pub fn show(opts: &GlobalOptions) -> Result<()> {
    let config = opts.resolve_config()?;
    match opts.format {
        OutputFormat::Json => println!("{}", format_json(&config)?),
        OutputFormat::Table => {
            let yaml = serde_yaml::to_string(&config).map_err(ConfigError::from)?;
            print!("{}", yaml);
        }
    }
    Ok(())
}

/// Print the config file path in use
pub fn path(opts: &GlobalOptions) -> Result<()> {
    let path = match opts.config_ref() {
        Some(path) => path.to_path_buf(),
        None => Config::default_path()?,
    };
    println!("{}", path.display());
    Ok(())
}
