//! Output formatting for CLI results
//!
//! Table mode renders rows with `tabled`; JSON mode wraps data in an
//! envelope with `meta` (timestamp, version, network state).

pub mod formatters;
pub mod json;
pub mod table;
