//! Drains the pending-write queue when connectivity returns

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use serde::Serialize;

use super::NetworkState;
use crate::client::RiskApi;
use crate::error::Result;
use crate::service::DataService;

/// Result of one drain pass
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DrainReport {
    /// IDs replayed and marked synced, in replay order
    pub replayed: Vec<i64>,
    /// The action that stopped the pass, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failed: Option<FailedReplay>,
    /// Unsynced actions left for the next pass
    pub remaining: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailedReplay {
    pub id: i64,
    pub action: String,
    pub error: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DrainOutcome {
    Completed(DrainReport),
    /// Another pass was already running; nothing was done
    AlreadyRunning,
}

/// Clears the in-flight flag however the drain ends
struct InFlightGuard<'a>(&'a AtomicBool);

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Replays queued writes in insertion order, one pass at a time
pub struct SyncCoordinator<C: RiskApi> {
    service: Arc<DataService<C>>,
    in_flight: AtomicBool,
}

impl<C: RiskApi> SyncCoordinator<C> {
    pub fn new(service: Arc<DataService<C>>) -> Self {
        Self {
            service,
            in_flight: AtomicBool::new(false),
        }
    }

    pub fn service(&self) -> &DataService<C> {
        &self.service
    }

    pub fn is_draining(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Replay every unsynced action in order, stopping at the first failure.
    ///
    /// Not transactional: a pass interrupted midway leaves earlier actions
    /// synced and the rest pending, and the next pass picks up from there.
    pub async fn drain(&self) -> Result<DrainOutcome> {
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            log::debug!("Drain already in flight, skipping");
            return Ok(DrainOutcome::AlreadyRunning);
        }
        let _guard = InFlightGuard(&self.in_flight);

        let pending: Vec<_> = self
            .service
            .pending_actions()?
            .into_iter()
            .filter(|a| !a.synced)
            .collect();

        let mut report = DrainReport::default();
        if pending.is_empty() {
            return Ok(DrainOutcome::Completed(report));
        }
        log::info!("Draining {} pending action(s)", pending.len());

        for (i, action) in pending.iter().enumerate() {
            let outcome = match self.service.replay(action).await {
                Ok(_) => self.service.mark_synced(action.id),
                Err(err) => Err(err),
            };

            match outcome {
                Ok(()) => {
                    log::debug!("Replayed pending action {} ({})", action.id, action.action);
                    report.replayed.push(action.id);
                }
                Err(err) => {
                    log::warn!(
                        "Replay of pending action {} ({}) failed: {}",
                        action.id,
                        action.action,
                        err
                    );
                    report.failed = Some(FailedReplay {
                        id: action.id,
                        action: action.action.clone(),
                        error: err.to_string(),
                    });
                    report.remaining = pending.len() - i;
                    break;
                }
            }
        }

        Ok(DrainOutcome::Completed(report))
    }

    async fn drain_logged(&self) {
        if let Err(e) = self.drain().await {
            log::warn!("Drain failed: {}", e);
        }
    }

    /// React to connectivity transitions for the lifetime of the session.
    ///
    /// Every OFFLINE → ONLINE transition triggers a drain pass.
    pub async fn run(&self) {
        let mut rx = self.service.connectivity().subscribe();
        let mut previous = *rx.borrow_and_update();

        while rx.changed().await.is_ok() {
            let current = *rx.borrow_and_update();
            if previous == NetworkState::Offline && current == NetworkState::Online {
                self.drain_logged().await;
            }
            previous = current;
        }
    }
}
