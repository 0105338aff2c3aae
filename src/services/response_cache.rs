use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use log::debug;
use parking_lot::Mutex;
use serde_json::Value;

/// Responses are served from the cache for five minutes.
pub const CACHE_TTL_MILLIS: i64 = 5 * 60 * 1000;
pub const DEFAULT_SWEEP_THRESHOLD: usize = 256;

pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

#[derive(Debug, Clone)]
struct CacheEntry {
    payload: Value,
    fetched_at: DateTime<Utc>,
}

/// Raw upstream payloads keyed by the exact request URL.
///
/// Entries older than [`CACHE_TTL_MILLIS`] are never returned. Once the map
/// holds `sweep_threshold` entries, a `put` first drops every expired entry,
/// so keys that are no longer requested do not pin memory forever.
pub struct ResponseCache {
    entries: Mutex<HashMap<String, CacheEntry>>,
    clock: Arc<dyn Clock>,
    sweep_threshold: usize,
}

impl ResponseCache {
    pub fn new(clock: Arc<dyn Clock>) -> ResponseCache {
        ResponseCache::with_sweep_threshold(clock, DEFAULT_SWEEP_THRESHOLD)
    }

    pub fn with_sweep_threshold(clock: Arc<dyn Clock>, sweep_threshold: usize) -> ResponseCache {
        ResponseCache {
            entries: Mutex::new(HashMap::new()),
            clock,
            sweep_threshold: sweep_threshold.max(1),
        }
    }

    pub fn get(&self, key: &str) -> Option<Value> {
        let now = self.clock.now();
        let entries = self.entries.lock();

        entries
            .get(key)
            .filter(|entry| is_fresh(entry, now))
            .map(|entry| entry.payload.clone())
    }

    pub fn put(&self, key: &str, payload: Value) {
        let now = self.clock.now();
        let mut entries = self.entries.lock();

        if entries.len() >= self.sweep_threshold {
            let before = entries.len();
            entries.retain(|_, entry| is_fresh(entry, now));
            debug!("Swept {} expired cache entries", before - entries.len());
        }

        entries.insert(
            key.to_string(),
            CacheEntry {
                payload,
                fetched_at: now,
            },
        );
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

fn is_fresh(entry: &CacheEntry, now: DateTime<Utc>) -> bool {
    (now - entry.fetched_at).num_milliseconds() < CACHE_TTL_MILLIS
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use serde_json::json;

    /// Clock that only moves when told to.
    pub(crate) struct ManualClock {
        now: Mutex<DateTime<Utc>>,
    }

    impl ManualClock {
        pub(crate) fn new() -> Arc<ManualClock> {
            Arc::new(ManualClock {
                now: Mutex::new(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()),
            })
        }

        pub(crate) fn advance(&self, millis: i64) {
            let mut now = self.now.lock();
            *now = *now + Duration::milliseconds(millis);
        }
    }

    impl Clock for ManualClock {
        fn now(&self) -> DateTime<Utc> {
            *self.now.lock()
        }
    }

    #[test]
    fn get_within_ttl_returns_stored_payload() {
        let clock = ManualClock::new();
        let cache = ResponseCache::new(clock.clone());
        let payload = json!({ "items": [{ "id": "UC1" }] });

        cache.put("https://example.test/channels?id=UC1", payload.clone());
        clock.advance(CACHE_TTL_MILLIS - 1);

        assert_eq!(cache.get("https://example.test/channels?id=UC1"), Some(payload));
    }

    #[test]
    fn get_after_ttl_is_a_miss() {
        let clock = ManualClock::new();
        let cache = ResponseCache::new(clock.clone());

        cache.put("key", json!({ "items": [] }));
        clock.advance(CACHE_TTL_MILLIS);

        assert_eq!(cache.get("key"), None);
    }

    #[test]
    fn unknown_key_is_a_miss() {
        let cache = ResponseCache::new(Arc::new(SystemClock));
        assert_eq!(cache.get("nothing"), None);
    }

    #[test]
    fn put_overwrites_and_restarts_ttl() {
        let clock = ManualClock::new();
        let cache = ResponseCache::new(clock.clone());

        cache.put("key", json!(1));
        clock.advance(CACHE_TTL_MILLIS - 10);
        cache.put("key", json!(2));
        clock.advance(100);

        assert_eq!(cache.get("key"), Some(json!(2)));
    }

    #[test]
    fn sweep_drops_only_expired_entries() {
        let clock = ManualClock::new();
        let cache = ResponseCache::with_sweep_threshold(clock.clone(), 2);

        cache.put("old", json!("old"));
        clock.advance(CACHE_TTL_MILLIS + 1);
        cache.put("fresh", json!("fresh"));
        assert_eq!(cache.len(), 2);

        cache.put("newest", json!("newest"));

        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get("fresh"), Some(json!("fresh")));
        assert_eq!(cache.get("newest"), Some(json!("newest")));
    }
}
