//! Offline store management commands

use colored::Colorize;
use serde_json::json;

use crate::cli::context::store_dir;
use crate::cli::{CommandContext, GlobalOptions, OutputFormat};
use crate::error::{Error, Result};
use crate::output::{formatters::format_size, table};

/// Show offline store statistics
pub fn stats(ctx: &CommandContext) -> Result<()> {
    let stats = ctx.service.offline_stats()?;
    let path = store_dir(&ctx.config)?.display().to_string();

    match ctx.format {
        OutputFormat::Json => ctx.print_value(&json!({
            "path": path,
            "count_cached": stats.count_cached,
            "count_pending_unsynced": stats.count_pending_unsynced,
            "approximate_byte_size": stats.approximate_byte_size,
            "approximate_size_human": format_size(stats.approximate_byte_size as u64),
        })),
        OutputFormat::Table => {
            println!(
                "{}",
                table::format_fields(&[
                    ("Location", path),
                    ("Cached responses", stats.count_cached.to_string()),
                    ("Pending writes", stats.count_pending_unsynced.to_string()),
                    (
                        "Approximate size",
                        format_size(stats.approximate_byte_size as u64)
                    ),
                ])
            );
            Ok(())
        }
    }
}

/// Wipe cached responses and pending writes
pub fn clear(ctx: &CommandContext, yes: bool) -> Result<()> {
    if !yes {
        return Err(Error::Other(
            "Refusing to clear the offline store without --yes; pending writes would be lost"
                .to_string(),
        ));
    }

    let removed = ctx.service.clear_sensitive_data()?;

    match ctx.format {
        OutputFormat::Json => ctx.print_value(&json!({
            "responses_removed": removed.count_cached,
            "pending_removed": removed.count_pending_unsynced,
            "success": true,
        })),
        OutputFormat::Table => {
            if removed == Default::default() {
                println!("Offline store was already empty");
            } else {
                println!(
                    "{} Cleared {} cached response(s) and {} pending write(s)",
                    "✓".green(),
                    removed.count_cached,
                    removed.count_pending_unsynced
                );
            }
            Ok(())
        }
    }
}

/// Print the store directory; needs no backend or open store
pub fn path(opts: &GlobalOptions) -> Result<()> {
    let config = opts.resolve_config()?;
    println!("{}", store_dir(&config)?.display());
    Ok(())
}
