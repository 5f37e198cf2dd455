//! Display models for CLI output
//!
//! Converts backend and offline-store types into CLI-friendly rows.

pub mod display;

pub use display::{HistoryDisplay, PendingActionDisplay, RecordDisplay, RegionDisplay};
