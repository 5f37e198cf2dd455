//! Display model implementations for table and JSON output
//!
//! Display models transform API response types into CLI-friendly formats
//! with appropriate column names and serialization.

mod common;
mod pending;
mod record;
mod region;

pub use pending::PendingActionDisplay;
pub use record::RecordDisplay;
pub use region::{HistoryDisplay, RegionDisplay};
