//! Offline store
//!
//! Durable last-known-good responses plus the queue of writes waiting for
//! connectivity. Survives restarts; wiped only by an explicit clear.

pub mod store;

use serde::Serialize;
use serde_json::Value;

pub use store::OfflineStore;

/// Last-known-good payload for one URL
#[derive(Debug, Clone, Serialize)]
pub struct OfflineRecord {
    pub url: String,
    pub data: Value,
    /// Unix epoch milliseconds when the payload was captured
    pub timestamp: i64,
}

/// A write queued for replay once the backend is reachable again
#[derive(Debug, Clone, Serialize)]
pub struct PendingAction {
    /// Auto-assigned sequence number; replay order follows it
    pub id: i64,
    /// Symbolic operation name, e.g. `update_region_index`
    pub action: String,
    /// Payload needed to replay the operation
    pub data: Value,
    /// Unix epoch milliseconds when the action was queued
    pub timestamp: i64,
    pub synced: bool,
}

/// Informational store statistics
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StoreStats {
    pub count_cached: usize,
    pub count_pending_unsynced: usize,
    /// Sum of stored payload sizes in bytes
    pub approximate_byte_size: usize,
}
