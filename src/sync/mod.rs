//! Connectivity tracking and pending-write sync

pub mod connectivity;
pub mod coordinator;

pub use connectivity::{Connectivity, NetworkState};
pub use coordinator::{DrainOutcome, DrainReport, SyncCoordinator};
