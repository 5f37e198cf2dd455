//! riskop - offline-capable data layer for the Risk Index backend
//!
//! [`service::DataService`] is the entry point: it wraps a [`client::RiskApi`]
//! transport with a TTL request cache, a SQLite offline store, and a
//! connectivity signal that [`sync::SyncCoordinator`] watches to replay
//! queued writes.

pub mod cache;
pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod offline;
pub mod output;
pub mod service;
pub mod sync;
