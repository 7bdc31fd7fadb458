// crates/travelmap-core/src/cache.rs
//! # Location-geocode cache
//!
//! Memoizes location-string → coordinates lookups in the persisted
//! `locationCache` object. Entries never expire on their own; a log's entry
//! is deleted explicitly when the log is deleted. Only successful lookups
//! are cached, so a failed resolution is retried the next time around.

use crate::common::Coordinates;
use crate::geocode::Geocoder;
use crate::storage::{KeyValueStore, KEY_LOCATION_CACHE};
use std::collections::HashMap;
use tracing::{debug, warn};

#[derive(Debug, Clone, Default)]
pub struct LocationCache {
    entries: HashMap<String, Coordinates>,
}

impl LocationCache {
    /// Loads the cache from storage; undecodable or absent data yields an
    /// empty cache.
    pub fn load(store: &dyn KeyValueStore) -> Self {
        let entries = store
            .get(KEY_LOCATION_CACHE)
            .and_then(|raw| serde_json::from_str(&raw).ok())
            .unwrap_or_default();
        Self { entries }
    }

    /// Writes the cache back to storage. Best effort.
    pub fn persist(&self, store: &mut dyn KeyValueStore) {
        match serde_json::to_string(&self.entries) {
            Ok(json) => {
                if let Err(e) = store.set(KEY_LOCATION_CACHE, &json) {
                    warn!("could not persist location cache: {e}");
                }
            }
            Err(e) => warn!("could not encode location cache: {e}"),
        }
    }

    pub fn get(&self, location: &str) -> Option<Coordinates> {
        self.entries.get(location).copied()
    }

    pub fn insert(&mut self, location: &str, coords: Coordinates) {
        self.entries.insert(location.to_string(), coords);
    }

    /// Removes the exact-match entry for a deleted log's location.
    pub fn remove(&mut self, location: &str) -> bool {
        self.entries.remove(location).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Resolves one location: cache hit first, network on miss.
    ///
    /// Empty results and network failures are logged and yield `None`;
    /// callers tolerate absent coordinates.
    pub fn resolve(&mut self, geocoder: &dyn Geocoder, location: &str) -> Option<Coordinates> {
        if let Some(coords) = self.get(location) {
            debug!(location, "location cache hit");
            return Some(coords);
        }

        debug!(location, "location cache miss");
        let coords = lookup_uncached(geocoder, location)?;
        self.insert(location, coords);
        Some(coords)
    }

    /// Resolves a batch of locations, joining all cache-miss lookups before
    /// returning.
    ///
    /// Misses are deduplicated so identical in-flight queries coalesce into
    /// one request, and issued in parallel; completion order is irrelevant
    /// since nothing is reported until every lookup has settled.
    pub fn resolve_all<'a>(
        &mut self,
        geocoder: &dyn Geocoder,
        locations: impl IntoIterator<Item = &'a str>,
    ) -> HashMap<String, Option<Coordinates>> {
        let mut resolved: HashMap<String, Option<Coordinates>> = HashMap::new();
        let mut misses: Vec<String> = Vec::new();

        for location in locations {
            if resolved.contains_key(location) {
                continue;
            }
            match self.get(location) {
                Some(coords) => {
                    debug!(location, "location cache hit");
                    resolved.insert(location.to_string(), Some(coords));
                }
                None => {
                    debug!(location, "location cache miss");
                    resolved.insert(location.to_string(), None);
                    misses.push(location.to_string());
                }
            }
        }

        if misses.is_empty() {
            return resolved;
        }

        // All-complete barrier: every lookup settles before any result is
        // visible to the caller. A panicking lookup counts as a miss.
        let outcomes: Vec<Option<Coordinates>> = std::thread::scope(|s| {
            let handles: Vec<_> = misses
                .iter()
                .map(|location| {
                    let location = location.as_str();
                    s.spawn(move || lookup_uncached(geocoder, location))
                })
                .collect();
            handles
                .into_iter()
                .map(|h| h.join().unwrap_or(None))
                .collect()
        });

        for (location, outcome) in misses.into_iter().zip(outcomes) {
            if let Some(coords) = outcome {
                self.insert(&location, coords);
                resolved.insert(location, Some(coords));
            }
        }

        resolved
    }
}

/// One network lookup, no cache involved. First candidate wins.
fn lookup_uncached(geocoder: &dyn Geocoder, location: &str) -> Option<Coordinates> {
    match geocoder.search(location, false) {
        Ok(hits) => match hits.first().and_then(|hit| hit.coordinates()) {
            Some(coords) => Some(coords),
            None => {
                warn!(location, "no geocoding result");
                None
            }
        },
        Err(e) => {
            warn!(location, "geocoding request failed: {e}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geocode::testing::ScriptedGeocoder;
    use crate::storage::MemoryStore;

    #[test]
    fn second_resolve_hits_cache_without_network() {
        let geocoder = ScriptedGeocoder::new().answer("上海、中国", 31.2, 121.5, None);
        let mut cache = LocationCache::default();

        let first = cache.resolve(&geocoder, "上海、中国").unwrap();
        let second = cache.resolve(&geocoder, "上海、中国").unwrap();

        assert_eq!(first, second);
        assert_eq!(geocoder.call_count(), 1);
    }

    #[test]
    fn failed_resolution_is_not_cached() {
        let geocoder = ScriptedGeocoder::new(); // answers nothing
        let mut cache = LocationCache::default();

        assert_eq!(cache.resolve(&geocoder, "どこか"), None);
        assert_eq!(cache.resolve(&geocoder, "どこか"), None);
        // No negative caching: both attempts went to the network.
        assert_eq!(geocoder.call_count(), 2);
        assert!(cache.is_empty());
    }

    #[test]
    fn resolve_all_coalesces_identical_queries() {
        let geocoder = ScriptedGeocoder::new()
            .answer("上海、中国", 31.2, 121.5, None)
            .answer("東京、日本", 35.7, 139.7, None);
        let mut cache = LocationCache::default();

        let resolved =
            cache.resolve_all(&geocoder, ["上海、中国", "東京、日本", "上海、中国"]);

        assert_eq!(resolved.len(), 2);
        assert_eq!(geocoder.calls_for("上海、中国"), 1);
        assert_eq!(geocoder.calls_for("東京、日本"), 1);
    }

    #[test]
    fn resolve_all_mixes_hits_and_misses() {
        let geocoder = ScriptedGeocoder::new().answer("東京、日本", 35.7, 139.7, None);
        let mut cache = LocationCache::default();
        cache.insert("上海、中国", Coordinates::new(31.2, 121.5));

        let resolved = cache.resolve_all(&geocoder, ["上海、中国", "東京、日本", "どこか"]);

        assert_eq!(
            resolved["上海、中国"],
            Some(Coordinates::new(31.2, 121.5))
        );
        assert_eq!(resolved["東京、日本"], Some(Coordinates::new(35.7, 139.7)));
        assert_eq!(resolved["どこか"], None);
        // The cached entry issued no request.
        assert_eq!(geocoder.calls_for("上海、中国"), 0);
        // Successful misses are now cached.
        assert_eq!(cache.get("東京、日本"), Some(Coordinates::new(35.7, 139.7)));
    }

    #[test]
    fn persist_and_reload() {
        let mut store = MemoryStore::new();
        let mut cache = LocationCache::default();
        cache.insert("上海、中国", Coordinates::new(31.2, 121.5));
        cache.persist(&mut store);

        let reloaded = LocationCache::load(&store);
        assert_eq!(
            reloaded.get("上海、中国"),
            Some(Coordinates::new(31.2, 121.5))
        );
    }

    #[test]
    fn remove_targets_exactly_one_entry() {
        let mut cache = LocationCache::default();
        cache.insert("上海、中国", Coordinates::new(31.2, 121.5));
        cache.insert("東京、日本", Coordinates::new(35.7, 139.7));

        assert!(cache.remove("上海、中国"));
        assert!(!cache.remove("上海、中国"));
        assert_eq!(cache.get("東京、日本"), Some(Coordinates::new(35.7, 139.7)));
    }
}
