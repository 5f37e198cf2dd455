//! Reusable formatting utilities for CLI output

use chrono::{DateTime, Local};
use colored::Colorize;

use crate::client::WriteResponse;

/// Format a Unix timestamp in milliseconds as local `YYYY-MM-DD HH:MM`.
///
/// Returns "N/A" for zero or out-of-range values.
pub fn format_timestamp_millis(millis: i64) -> String {
    if millis == 0 {
        return "N/A".to_string();
    }
    DateTime::from_timestamp_millis(millis)
        .map(|dt| dt.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| "N/A".to_string())
}

/// Format bytes as human-readable size
pub fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.2} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} bytes", bytes)
    }
}

/// One status line describing a write outcome
pub fn write_status(what: &str, resp: &WriteResponse) -> String {
    if resp.ok {
        match resp.id {
            Some(id) => format!("{} {} (id {})", "✓".green(), what, id),
            None => format!("{} {}", "✓".green(), what),
        }
    } else if resp.queued {
        format!(
            "{} {} queued for sync: {}",
            "…".yellow(),
            what,
            resp.error.as_deref().unwrap_or("offline")
        )
    } else {
        format!(
            "{} {} failed: {}",
            "✗".red(),
            what,
            resp.error.as_deref().unwrap_or("unknown error")
        )
    }
}
