//! Connectivity state shared between the data service and the coordinator

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::watch;

/// Whether the backend is believed reachable
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum NetworkState {
    Online,
    Offline,
}

impl std::fmt::Display for NetworkState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NetworkState::Online => f.write_str("ONLINE"),
            NetworkState::Offline => f.write_str("OFFLINE"),
        }
    }
}

/// Connectivity signal backed by a watch channel.
///
/// Clones share the same state. Subscribers see every transition; setting
/// the current state again is not a transition.
#[derive(Clone)]
pub struct Connectivity {
    tx: Arc<watch::Sender<NetworkState>>,
}

impl Connectivity {
    pub fn new(initial: NetworkState) -> Self {
        let (tx, _rx) = watch::channel(initial);
        Self { tx: Arc::new(tx) }
    }

    pub fn state(&self) -> NetworkState {
        *self.tx.borrow()
    }

    pub fn is_offline(&self) -> bool {
        self.state() == NetworkState::Offline
    }

    /// Update the state; returns true when this was a transition
    pub fn set(&self, state: NetworkState) -> bool {
        let changed = self.tx.send_if_modified(|current| {
            if *current == state {
                false
            } else {
                *current = state;
                true
            }
        });
        if changed {
            log::info!("Connectivity changed: {}", state);
        }
        changed
    }

    pub fn set_online(&self) -> bool {
        self.set(NetworkState::Online)
    }

    pub fn set_offline(&self) -> bool {
        self.set(NetworkState::Offline)
    }

    pub fn subscribe(&self) -> watch::Receiver<NetworkState> {
        self.tx.subscribe()
    }
}
