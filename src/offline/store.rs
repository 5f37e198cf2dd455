//! SQLite-backed offline store with file blob support
//!
//! Keeps the last-known-good response per URL and the queue of writes that
//! could not reach the backend. Small payloads live inline in SQLite, large
//! ones (>10KB) as files named by the SHA-256 of their URL.

use chrono::Utc;
use rusqlite::{Connection, OptionalExtension, params};
use serde_json::Value;
use std::path::{Path, PathBuf};

use super::{OfflineRecord, PendingAction, StoreStats};
use crate::cache::key::blob_name;
use crate::error::StoreError;

/// Schema version - increment to trigger nuke-and-rebuild
const SCHEMA_VERSION: i32 = 1;

/// Responses larger than this are stored as external blobs
const INLINE_THRESHOLD: usize = 10 * 1024; // 10KB

type Result<T> = std::result::Result<T, StoreError>;

/// Persistent store for offline fallback data and pending writes
pub struct OfflineStore {
    conn: Connection,
    blobs_dir: PathBuf,
}

impl OfflineStore {
    /// Default store directory (~/.cache/riskop on Linux)
    pub fn default_dir() -> Result<PathBuf> {
        let cache_base = dirs::cache_dir().ok_or(StoreError::NoHome)?;
        Ok(cache_base.join("riskop"))
    }

    /// Open the store in a specific directory
    pub fn open_at(dir: &Path) -> Result<Self> {
        std::fs::create_dir_all(dir)
            .map_err(|e| StoreError::Io(format!("Failed to create store dir: {}", e)))?;

        let db_path = dir.join("offline.db");
        let blobs_dir = dir.join("blobs");
        std::fs::create_dir_all(&blobs_dir)
            .map_err(|e| StoreError::Io(format!("Failed to create blobs dir: {}", e)))?;

        let conn = Connection::open(&db_path)?;

        let version: i32 = conn
            .pragma_query_value(None, "user_version", |r| r.get(0))
            .unwrap_or(0);

        if version != 0 && version != SCHEMA_VERSION {
            log::info!(
                "Offline store schema version mismatch ({} != {}), rebuilding",
                version,
                SCHEMA_VERSION
            );
            drop(conn);
            Self::nuke(&db_path, &blobs_dir)?;
            return Self::open_at(dir);
        }

        let store = Self { conn, blobs_dir };
        store.init()?;
        Ok(store)
    }

    /// Create the tables if they do not exist yet. Safe to call repeatedly.
    pub fn init(&self) -> Result<()> {
        self.conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS responses (
                url TEXT PRIMARY KEY NOT NULL,
                data TEXT,
                blob_path TEXT,
                saved_at INTEGER NOT NULL,
                size_bytes INTEGER NOT NULL
            );

            CREATE TABLE IF NOT EXISTS pending_actions (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                action TEXT NOT NULL,
                data TEXT NOT NULL,
                queued_at INTEGER NOT NULL,
                synced INTEGER NOT NULL DEFAULT 0
            );

            CREATE INDEX IF NOT EXISTS idx_pending_synced ON pending_actions(synced);
            "#,
        )?;

        self.conn
            .pragma_update(None, "user_version", SCHEMA_VERSION)?;
        Ok(())
    }

    /// Upsert the last-known-good payload for `url`
    pub fn save_response(&self, url: &str, data: &Value) -> Result<()> {
        let json = serde_json::to_string(data)?;
        let now = Utc::now().timestamp_millis();

        // Drop a blob left over from a previous large payload
        let old_blob: Option<Option<String>> = self
            .conn
            .query_row(
                "SELECT blob_path FROM responses WHERE url = ?1",
                [url],
                |r| r.get(0),
            )
            .optional()?;

        if json.len() <= INLINE_THRESHOLD {
            self.conn.execute(
                "INSERT OR REPLACE INTO responses (url, data, blob_path, saved_at, size_bytes)
                 VALUES (?1, ?2, NULL, ?3, ?4)",
                params![url, json, now, json.len()],
            )?;
            if let Some(Some(path)) = old_blob {
                self.remove_blob(&path);
            }
        } else {
            let blob_path = self.write_blob(url, json.as_bytes())?;
            self.conn.execute(
                "INSERT OR REPLACE INTO responses (url, data, blob_path, saved_at, size_bytes)
                 VALUES (?1, NULL, ?2, ?3, ?4)",
                params![url, blob_path, now, json.len()],
            )?;
        }
        Ok(())
    }

    /// Load the stored payload for `url`, if any
    pub fn load_response(&self, url: &str) -> Result<Option<OfflineRecord>> {
        let row: Option<(Option<String>, Option<String>, i64)> = self
            .conn
            .query_row(
                "SELECT data, blob_path, saved_at FROM responses WHERE url = ?1",
                [url],
                |r| Ok((r.get(0)?, r.get(1)?, r.get(2)?)),
            )
            .optional()?;

        let (raw, saved_at) = match row {
            Some((Some(data), None, saved_at)) => (data.into_bytes(), saved_at),
            Some((None, Some(blob_path), saved_at)) => {
                match std::fs::read(self.blobs_dir.join(&blob_path)) {
                    Ok(bytes) => (bytes, saved_at),
                    Err(e) => {
                        log::warn!("Failed to read blob {}: {}", blob_path, e);
                        let _ = self
                            .conn
                            .execute("DELETE FROM responses WHERE url = ?1", [url]);
                        return Ok(None);
                    }
                }
            }
            _ => return Ok(None),
        };

        Ok(Some(OfflineRecord {
            url: url.to_string(),
            data: serde_json::from_slice(&raw)?,
            timestamp: saved_at,
        }))
    }

    /// Append a write to the pending queue, returning its id
    pub fn enqueue(&self, action: &str, data: &Value) -> Result<i64> {
        self.conn.execute(
            "INSERT INTO pending_actions (action, data, queued_at, synced)
             VALUES (?1, ?2, ?3, 0)",
            params![action, serde_json::to_string(data)?, Utc::now().timestamp_millis()],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Queued actions not yet replayed
    pub fn count_unsynced(&self) -> Result<usize> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM pending_actions WHERE synced = 0",
            [],
            |r| r.get(0),
        )?;
        Ok(count as usize)
    }

    /// All queued actions, synced or not, in insertion order
    pub fn list_pending(&self) -> Result<Vec<PendingAction>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, action, data, queued_at, synced FROM pending_actions ORDER BY id ASC",
        )?;

        let rows = stmt.query_map([], |r| {
            Ok((
                r.get::<_, i64>(0)?,
                r.get::<_, String>(1)?,
                r.get::<_, String>(2)?,
                r.get::<_, i64>(3)?,
                r.get::<_, bool>(4)?,
            ))
        })?;

        let mut actions = Vec::new();
        for row in rows {
            let (id, action, data, timestamp, synced) = row?;
            actions.push(PendingAction {
                id,
                action,
                data: serde_json::from_str(&data)?,
                timestamp,
                synced,
            });
        }
        Ok(actions)
    }

    /// Flag an action as replayed. Idempotent.
    pub fn mark_synced(&self, id: i64) -> Result<()> {
        self.conn.execute(
            "UPDATE pending_actions SET synced = 1 WHERE id = ?1",
            [id],
        )?;
        Ok(())
    }

    /// Wipe cached responses, the pending queue, and every blob. Irreversible.
    pub fn clear_all(&self) -> Result<StoreStats> {
        let before = self.stats()?;

        self.conn.execute_batch(
            "DELETE FROM responses; DELETE FROM pending_actions;",
        )?;

        if self.blobs_dir.exists() {
            if let Err(e) = std::fs::remove_dir_all(&self.blobs_dir) {
                log::warn!("Failed to clear blobs directory: {}", e);
            }
            std::fs::create_dir_all(&self.blobs_dir)
                .map_err(|e| StoreError::Io(format!("Failed to recreate blobs dir: {}", e)))?;
        }

        Ok(before)
    }

    /// Counts and approximate size, for display only
    pub fn stats(&self) -> Result<StoreStats> {
        let count_cached: i64 =
            self.conn
                .query_row("SELECT COUNT(*) FROM responses", [], |r| r.get(0))?;

        let count_pending_unsynced = self.count_unsynced()?;

        let response_bytes: i64 = self.conn.query_row(
            "SELECT COALESCE(SUM(size_bytes), 0) FROM responses",
            [],
            |r| r.get(0),
        )?;

        let pending_bytes: i64 = self.conn.query_row(
            "SELECT COALESCE(SUM(LENGTH(data)), 0) FROM pending_actions",
            [],
            |r| r.get(0),
        )?;

        Ok(StoreStats {
            count_cached: count_cached as usize,
            count_pending_unsynced,
            approximate_byte_size: (response_bytes + pending_bytes) as usize,
        })
    }

    /// Write a blob file, sharded by the first 2 chars of its name
    fn write_blob(&self, url: &str, data: &[u8]) -> Result<String> {
        let name = blob_name(url);
        let shard = &name[..2];
        let shard_dir = self.blobs_dir.join(shard);
        std::fs::create_dir_all(&shard_dir)
            .map_err(|e| StoreError::Io(format!("Failed to create shard dir: {}", e)))?;

        let filename = format!("{}.json", name);
        let rel_path = format!("{}/{}", shard, filename);

        std::fs::write(shard_dir.join(&filename), data)
            .map_err(|e| StoreError::Io(format!("Failed to write blob: {}", e)))?;

        Ok(rel_path)
    }

    fn remove_blob(&self, rel_path: &str) {
        if let Err(e) = std::fs::remove_file(self.blobs_dir.join(rel_path)) {
            log::debug!("Failed to remove blob {}: {}", rel_path, e);
        }
    }

    /// Delete the database and all blobs
    fn nuke(db_path: &Path, blobs_dir: &Path) -> Result<()> {
        if db_path.exists() {
            std::fs::remove_file(db_path)
                .map_err(|e| StoreError::Io(format!("Failed to remove store DB: {}", e)))?;
        }
        if blobs_dir.exists() {
            std::fs::remove_dir_all(blobs_dir)
                .map_err(|e| StoreError::Io(format!("Failed to remove blobs dir: {}", e)))?;
        }
        Ok(())
    }
}
