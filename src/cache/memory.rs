//! Bounded TTL map for decoded responses

use std::collections::{HashMap, VecDeque};
use std::time::{Duration, Instant};

use serde_json::Value;

use super::TtlClass;

/// Default number of entries kept before FIFO eviction kicks in
pub const DEFAULT_MAX_ENTRIES: usize = 100;

#[derive(Debug, Clone)]
struct CacheEntry {
    data: Value,
    timestamp: Instant,
    ttl: Duration,
}

impl CacheEntry {
    fn is_fresh(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.timestamp) < self.ttl
    }
}

/// In-memory request cache.
///
/// Entries past `timestamp + ttl` are never returned and are dropped on the
/// next access to their key. When full, the oldest-inserted entry is evicted
/// first; reads do not refresh recency.
///
/// Every explicit invalidation bumps a generation counter. A fetch that
/// started before an invalidation stores its result with
/// [`put_if_generation`](Self::put_if_generation), so a response read before
/// a write cannot land back in the cache after that write.
#[derive(Debug)]
pub struct RequestCache {
    entries: HashMap<String, CacheEntry>,
    order: VecDeque<String>,
    max_entries: usize,
    generation: u64,
}

impl Default for RequestCache {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ENTRIES)
    }
}

impl RequestCache {
    /// Create a cache holding at most `max_entries` responses (0 disables caching)
    pub fn new(max_entries: usize) -> Self {
        Self {
            entries: HashMap::new(),
            order: VecDeque::new(),
            max_entries,
            generation: 0,
        }
    }

    pub fn get(&mut self, key: &str) -> Option<Value> {
        self.get_at(key, Instant::now())
    }

    /// Look up `key` as of `now`
    pub fn get_at(&mut self, key: &str, now: Instant) -> Option<Value> {
        let entry = self.entries.get(key)?;
        if entry.is_fresh(now) {
            return Some(entry.data.clone());
        }

        log::debug!("Cache entry expired: {}", key);
        self.remove(key);
        None
    }

    pub fn put(&mut self, key: &str, data: Value, class: TtlClass) {
        self.put_at(key, data, class.duration(), Instant::now());
    }

    /// Store `data` under `key` with an explicit TTL and write time
    pub fn put_at(&mut self, key: &str, data: Value, ttl: Duration, now: Instant) {
        if self.max_entries == 0 {
            return;
        }

        // Re-putting a key counts as a new insertion
        self.remove(key);

        while self.entries.len() >= self.max_entries {
            match self.order.pop_front() {
                Some(oldest) => {
                    log::debug!("Cache full, evicting: {}", oldest);
                    self.entries.remove(&oldest);
                }
                None => break,
            }
        }

        self.order.push_back(key.to_string());
        self.entries.insert(
            key.to_string(),
            CacheEntry {
                data,
                timestamp: now,
                ttl,
            },
        );
    }

    /// Store `data` only if nothing was invalidated since `generation` was read
    pub fn put_if_generation(
        &mut self,
        key: &str,
        data: Value,
        class: TtlClass,
        generation: u64,
    ) -> bool {
        if self.generation != generation {
            log::debug!("Discarding stale response for {}", key);
            return false;
        }
        self.put(key, data, class);
        true
    }

    /// Bumped by every invalidation
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Remove one entry; returns whether it was present
    pub fn invalidate(&mut self, key: &str) -> bool {
        self.generation += 1;
        self.remove(key)
    }

    fn remove(&mut self, key: &str) -> bool {
        if self.entries.remove(key).is_some() {
            self.order.retain(|k| k != key);
            true
        } else {
            false
        }
    }

    /// Remove every entry whose key starts with `prefix`
    pub fn invalidate_prefix(&mut self, prefix: &str) -> usize {
        self.generation += 1;
        let before = self.entries.len();
        self.entries.retain(|k, _| !k.starts_with(prefix));
        self.order.retain(|k| !k.starts_with(prefix));
        before - self.entries.len()
    }

    pub fn invalidate_all(&mut self) {
        self.generation += 1;
        self.entries.clear();
        self.order.clear();
    }

    /// Number of stored entries, expired ones included until they are touched
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_fresh_entry_is_hit() {
        let mut cache = RequestCache::new(10);
        let t0 = Instant::now();
        cache.put_at("/api/buttons", json!([1, 2]), TtlClass::SHORT, t0);

        let hit = cache.get_at("/api/buttons", t0 + Duration::from_secs(29));
        assert_eq!(hit, Some(json!([1, 2])));
    }

    #[test]
    fn test_entry_expires_at_ttl_boundary() {
        let mut cache = RequestCache::new(10);
        let t0 = Instant::now();
        cache.put_at("/api/buttons", json!([1]), TtlClass::SHORT, t0);

        assert!(cache.get_at("/api/buttons", t0 + TtlClass::SHORT).is_none());
        // Lazily evicted on that access
        assert!(!cache.contains("/api/buttons"));
        assert!(cache.is_empty());
    }

    #[test]
    fn test_eviction_bound_drops_first_inserted() {
        let mut cache = RequestCache::new(3);
        let now = Instant::now();
        for i in 0..4 {
            cache.put_at(&format!("/api/k{}", i), json!(i), TtlClass::LONG, now);
        }

        assert_eq!(cache.len(), 3);
        assert!(!cache.contains("/api/k0"));
        assert!(cache.contains("/api/k1"));
        assert!(cache.contains("/api/k3"));
    }

    #[test]
    fn test_reads_do_not_refresh_recency() {
        let mut cache = RequestCache::new(2);
        let now = Instant::now();
        cache.put_at("a", json!(1), TtlClass::LONG, now);
        cache.put_at("b", json!(2), TtlClass::LONG, now);

        assert!(cache.get_at("a", now).is_some());
        cache.put_at("c", json!(3), TtlClass::LONG, now);

        assert!(!cache.contains("a"));
        assert!(cache.contains("b"));
    }

    #[test]
    fn test_reput_moves_key_to_back() {
        let mut cache = RequestCache::new(2);
        let now = Instant::now();
        cache.put_at("a", json!(1), TtlClass::LONG, now);
        cache.put_at("b", json!(2), TtlClass::LONG, now);
        cache.put_at("a", json!(10), TtlClass::LONG, now);
        cache.put_at("c", json!(3), TtlClass::LONG, now);

        assert_eq!(cache.get_at("a", now), Some(json!(10)));
        assert!(!cache.contains("b"));
    }

    #[test]
    fn test_invalidate_and_prefix() {
        let mut cache = RequestCache::new(10);
        cache.put("/api/regions", json!([]), TtlClass::Medium);
        cache.put("/api/region_data/1", json!({}), TtlClass::Short);
        cache.put("/api/region_data/2", json!({}), TtlClass::Short);

        assert!(cache.invalidate("/api/regions"));
        assert!(!cache.invalidate("/api/regions"));
        assert_eq!(cache.invalidate_prefix("/api/region_data/"), 2);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_invalidate_all() {
        let mut cache = RequestCache::new(10);
        cache.put("a", json!(1), TtlClass::Long);
        cache.put("b", json!(2), TtlClass::Long);
        cache.invalidate_all();
        assert!(cache.get("a").is_none());
        assert_eq!(cache.len(), 0);
    }

    #[test]
    fn test_put_after_invalidation_is_discarded() {
        let mut cache = RequestCache::new(10);
        let before = cache.generation();

        // A write lands while the fetch is in flight; the key was never cached
        assert!(!cache.invalidate("/api/region_data/1"));
        assert!(!cache.put_if_generation(
            "/api/region_data/1",
            json!({"index": 1}),
            TtlClass::Short,
            before
        ));
        assert!(cache.get("/api/region_data/1").is_none());

        let current = cache.generation();
        assert!(cache.put_if_generation(
            "/api/region_data/1",
            json!({"index": 2}),
            TtlClass::Short,
            current
        ));
        assert_eq!(cache.get("/api/region_data/1"), Some(json!({"index": 2})));
    }

    #[test]
    fn test_expiry_and_reput_keep_generation() {
        let mut cache = RequestCache::new(10);
        let t0 = Instant::now();
        let generation = cache.generation();

        cache.put_at("a", json!(1), TtlClass::SHORT, t0);
        cache.put_at("a", json!(2), TtlClass::SHORT, t0);
        assert!(cache.get_at("a", t0 + TtlClass::SHORT).is_none());
        assert_eq!(cache.generation(), generation);
    }

    #[test]
    fn test_zero_capacity_disables_cache() {
        let mut cache = RequestCache::new(0);
        cache.put("a", json!(1), TtlClass::Long);
        assert!(cache.get("a").is_none());
    }
}
