//! Data service: the boundary the UI layer talks to
//!
//! Composes the Request Cache, the offline store, and the connectivity
//! signal around a backend transport. Internally everything returns
//! `Result`; the per-resource functions in [`resources`] turn failures into
//! sentinel values so callers never handle errors.

pub mod resources;

use std::sync::{Arc, Mutex};

use reqwest::Method;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::cache::{RequestCache, TtlClass, request_key};
use crate::client::{RiskApi, WriteAction, WriteResponse};
use crate::error::{ApiError, Result, StoreError};
use crate::offline::{OfflineRecord, OfflineStore, PendingAction, StoreStats};
use crate::sync::{Connectivity, NetworkState};

/// Data access layer over any `RiskApi` transport
pub struct DataService<C: RiskApi> {
    inner: Arc<C>,
    cache: Mutex<RequestCache>,
    offline: Option<Mutex<OfflineStore>>,
    connectivity: Connectivity,
}

impl<C: RiskApi> DataService<C> {
    /// Build a service. Pass `offline: None` to run in cache-only mode.
    pub fn new(
        inner: C,
        cache: RequestCache,
        offline: Option<OfflineStore>,
        connectivity: Connectivity,
    ) -> Self {
        Self {
            inner: Arc::new(inner),
            cache: Mutex::new(cache),
            offline: offline.map(Mutex::new),
            connectivity,
        }
    }

    /// Open the offline store, logging a failure once and degrading to
    /// cache-only mode instead of failing startup.
    pub fn open_store(
        open: impl FnOnce() -> std::result::Result<OfflineStore, StoreError>,
    ) -> Option<OfflineStore> {
        match open() {
            Ok(store) => Some(store),
            Err(e) => {
                log::warn!(
                    "Offline store unavailable, running without offline fallback: {}",
                    e
                );
                None
            }
        }
    }

    pub fn inner(&self) -> &C {
        &self.inner
    }

    pub fn connectivity(&self) -> &Connectivity {
        &self.connectivity
    }

    pub fn has_offline_store(&self) -> bool {
        self.offline.is_some()
    }

    // ========================================================================
    // Reads
    // ========================================================================

    /// Read `path` through the cache, the network, and the offline fallback.
    ///
    /// `ttl: None` bypasses the Request Cache. A successful fetch always
    /// refreshes the offline copy. The offline copy is served only when the
    /// fetch failed and connectivity is down.
    pub async fn read(&self, path: &str, ttl: Option<TtlClass>) -> Result<Value> {
        let key = request_key(&Method::GET, path, &[]);
        if ttl.is_some()
            && let Some(hit) = self.cache_get(&key)
        {
            log::debug!("Cache hit: {}", key);
            return Ok(hit);
        }

        let generation = self.cache_generation();
        let result = self.inner.get(path).await;
        self.observe(&result);

        match result {
            Ok(data) => {
                if let Some(class) = ttl {
                    self.cache_put(&key, &data, class, generation);
                }
                self.with_store(|store| store.save_response(path, &data));
                Ok(data)
            }
            Err(err) => {
                if self.connectivity.is_offline()
                    && let Some(record) = self.load_offline(path)
                {
                    log::info!("Serving offline copy of {} ({})", path, err);
                    return Ok(record.data);
                }
                Err(err)
            }
        }
    }

    /// `read` and decode into `T`
    pub async fn fetch<T: DeserializeOwned>(
        &self,
        path: &str,
        ttl: Option<TtlClass>,
    ) -> Result<T> {
        let data = self.read(path, ttl).await?;
        serde_json::from_value(data).map_err(|e| ApiError::Parse(e.to_string()).into())
    }

    // ========================================================================
    // Writes
    // ========================================================================

    /// Perform a write, queueing it when the backend is unreachable.
    ///
    /// While OFFLINE the write goes straight to the queue, and so does any
    /// write made while older actions are still unsynced, so the backend
    /// always sees writes in the order they were made. Otherwise it is sent;
    /// a connectivity failure flips the state to OFFLINE and queues it.
    /// Server rejections and parse failures are returned, never queued.
    pub async fn write(&self, action: WriteAction) -> WriteResponse {
        if self.connectivity.is_offline() {
            return self.queue_or_fail(&action, "Network Error: offline");
        }

        let backlog = self.unsynced_count();
        if backlog > 0 {
            log::debug!(
                "{} waits behind {} pending action(s)",
                action.name(),
                backlog
            );
            return self.queue_or_fail(
                &action,
                &format!("{} earlier action(s) not yet synced", backlog),
            );
        }

        match self.execute(&action).await {
            Ok(resp) => {
                if !resp.ok {
                    log::warn!(
                        "{} rejected: {}",
                        action.name(),
                        resp.error.as_deref().unwrap_or("no reason given")
                    );
                }
                resp
            }
            Err(err) if err.is_connectivity() => self.queue_or_fail(&action, &err.to_string()),
            Err(err) => {
                log::warn!("{} failed: {}", action.name(), err);
                WriteResponse::failed(err.to_string())
            }
        }
    }

    /// Send a write and, on success, invalidate the cache keys it affects
    /// before returning.
    pub async fn execute(&self, action: &WriteAction) -> Result<WriteResponse> {
        let (method, path, body) = action.request();
        let result = self.inner.send(method, &path, body.as_ref()).await;
        self.observe(&result);

        let resp = parse_write_response(result?)?;
        if resp.ok {
            self.invalidate(&action.invalidates());
        }
        Ok(resp)
    }

    /// Replay one queued action. A `{ok: false}` answer counts as failure.
    pub async fn replay(&self, pending: &PendingAction) -> Result<WriteResponse> {
        let action = WriteAction::from_parts(&pending.action, pending.data.clone())?;
        let resp = self.execute(&action).await?;
        if !resp.ok {
            return Err(ApiError::Rejected(
                resp.error
                    .clone()
                    .unwrap_or_else(|| format!("{} rejected", pending.action)),
            )
            .into());
        }
        Ok(resp)
    }

    /// GET `path` only to learn whether the backend is reachable
    pub async fn probe(&self, path: &str) -> NetworkState {
        let result = self.inner.get(path).await;
        self.observe(&result);
        self.connectivity.state()
    }

    /// Feed a request outcome into the connectivity signal. Any answer from
    /// the server, even an error status, means the backend is reachable.
    fn observe<T>(&self, result: &Result<T>) {
        match result {
            Err(err) if err.is_connectivity() => self.connectivity.set_offline(),
            _ => self.connectivity.set_online(),
        };
    }

    fn queue_or_fail(&self, action: &WriteAction, reason: &str) -> WriteResponse {
        let queued = action
            .to_parts()
            .ok()
            .and_then(|(name, data)| self.with_store(|store| store.enqueue(&name, &data)));

        match queued {
            Some(id) => {
                log::info!("Queued {} as pending action {}", action.name(), id);
                WriteResponse::queued(format!("{}; queued for sync", reason))
            }
            None => WriteResponse::failed(reason),
        }
    }

    // ========================================================================
    // Request Cache
    // ========================================================================

    fn cache_get(&self, key: &str) -> Option<Value> {
        self.cache.lock().ok()?.get(key)
    }

    fn cache_generation(&self) -> u64 {
        self.cache.lock().map(|c| c.generation()).unwrap_or(0)
    }

    /// Cache a fetched response unless a write invalidated the cache while
    /// the request was in flight
    fn cache_put(&self, key: &str, data: &Value, class: TtlClass, generation: u64) {
        if let Ok(mut cache) = self.cache.lock() {
            cache.put_if_generation(key, data.clone(), class, generation);
        }
    }

    /// Drop the given cache keys along with their query-string variants
    pub fn invalidate(&self, keys: &[String]) {
        if let Ok(mut cache) = self.cache.lock() {
            for key in keys {
                let dropped = usize::from(cache.invalidate(key))
                    + cache.invalidate_prefix(&format!("{}?", key));
                if dropped > 0 {
                    log::debug!("Invalidated {} cache entries for {}", dropped, key);
                }
            }
        }
    }

    pub fn invalidate_all(&self) {
        if let Ok(mut cache) = self.cache.lock() {
            cache.invalidate_all();
        }
    }

    /// Number of entries in the Request Cache
    pub fn cached_entries(&self) -> usize {
        self.cache.lock().map(|c| c.len()).unwrap_or(0)
    }

    // ========================================================================
    // Offline store
    // ========================================================================

    /// Run `f` against the store; failures are logged and read as "no data"
    fn with_store<T>(
        &self,
        f: impl FnOnce(&OfflineStore) -> std::result::Result<T, StoreError>,
    ) -> Option<T> {
        let store = self.offline.as_ref()?.lock().ok()?;
        match f(&store) {
            Ok(value) => Some(value),
            Err(e) => {
                log::warn!("Offline store error: {}", e);
                None
            }
        }
    }

    fn load_offline(&self, url: &str) -> Option<OfflineRecord> {
        self.with_store(|store| store.load_response(url)).flatten()
    }

    /// Run `f` against the store, reporting failures to the caller
    fn try_store<T>(
        &self,
        f: impl FnOnce(&OfflineStore) -> std::result::Result<T, StoreError>,
    ) -> Result<T> {
        let store = self
            .offline
            .as_ref()
            .ok_or(StoreError::Unavailable)?
            .lock()
            .map_err(|_| StoreError::Unavailable)?;
        Ok(f(&store)?)
    }

    /// All queued actions in insertion order
    pub fn pending_actions(&self) -> Result<Vec<PendingAction>> {
        self.try_store(|store| store.list_pending())
    }

    /// Unsynced queued actions; 0 without a store
    pub fn unsynced_count(&self) -> usize {
        self.with_store(|store| store.count_unsynced()).unwrap_or(0)
    }

    pub fn mark_synced(&self, id: i64) -> Result<()> {
        self.try_store(|store| store.mark_synced(id))
    }

    pub fn offline_stats(&self) -> Result<StoreStats> {
        self.try_store(|store| store.stats())
    }

    /// Privacy action: wipe the offline store and the Request Cache
    pub fn clear_sensitive_data(&self) -> Result<StoreStats> {
        self.invalidate_all();
        self.try_store(|store| store.clear_all())
    }
}

/// Decode a write endpoint's body; an empty 2xx body means success
fn parse_write_response(raw: Value) -> Result<WriteResponse> {
    if raw.is_null() {
        return Ok(WriteResponse::success());
    }
    serde_json::from_value(raw).map_err(|e| ApiError::Parse(e.to_string()).into())
}
