use super::WeatherSnapshot;
use log::debug;
use std::collections::HashMap;
use std::time::Duration;
use tokio::time::Instant;

/// Key for a coordinate, rounded to two decimals (about 1 km)
pub fn cache_key(latitude: f64, longitude: f64) -> String {
    format!("{:.2},{:.2}", latitude, longitude)
}

#[derive(Debug, Clone)]
struct CacheEntry {
    stored_at: Instant,
    snapshot: WeatherSnapshot,
}

/// Snapshots per coordinate with a fixed time-to-live
#[derive(Debug)]
pub struct WeatherCache {
    ttl: Duration,
    entries: HashMap<String, CacheEntry>,
}

impl WeatherCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: HashMap::new(),
        }
    }

    /// Fresh snapshot for `key`, if any
    pub fn get(&self, key: &str) -> Option<WeatherSnapshot> {
        self.entries
            .get(key)
            .filter(|entry| entry.stored_at.elapsed() < self.ttl)
            .map(|entry| entry.snapshot.clone())
    }

    /// Store `snapshot`, dropping every expired entry first
    pub fn insert(&mut self, key: String, snapshot: WeatherSnapshot) {
        let ttl = self.ttl;
        let before = self.entries.len();
        self.entries.retain(|_, entry| entry.stored_at.elapsed() < ttl);
        if self.entries.len() != before {
            debug!("Purged {} expired weather entries", before - self.entries.len());
        }
        self.entries.insert(
            key,
            CacheEntry {
                stored_at: Instant::now(),
                snapshot,
            },
        );
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
