// crates/travelmap-core/src/app.rs
//! # Application assembly
//!
//! Ties the stores and static tables together behind one explicitly
//! constructed object with a load-once lifecycle: codes and the city
//! mapping are read at [`App::open`] and passed down from there; nothing is
//! kept in process-globals.

use crate::cache::LocationCache;
use crate::codes::CountryCodeMap;
use crate::common::{Coordinates, StoreStats};
use crate::error::Result;
use crate::geocode::Geocoder;
use crate::mapping::CityProvinceMapping;
use crate::model::TravelLog;
use crate::storage::{JsonFileStore, KeyValueStore};
use crate::store::TravelLogStore;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Locations of the bundled static assets.
#[derive(Debug, Clone)]
pub struct AssetPaths {
    /// JSON array of `[alpha2, alpha3]` pairs.
    pub codes: PathBuf,
    /// City/province reference CSV.
    pub china_cities_csv: PathBuf,
    /// World boundaries, feature id = alpha-3 code.
    pub world_geojson: PathBuf,
    /// China province boundaries, `properties.name` = English name.
    pub china_geojson: PathBuf,
}

impl AssetPaths {
    /// Conventional file names under one assets directory.
    pub fn under(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            codes: dir.join("codes.json"),
            china_cities_csv: dir.join("china_cities.csv"),
            world_geojson: dir.join("world-110m.geojson"),
            china_geojson: dir.join("china-province.geojson"),
        }
    }
}

/// Where persisted state and static assets live.
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory for the key-value store files.
    pub data_dir: PathBuf,
    pub assets: AssetPaths,
}

impl Config {
    pub fn new(data_dir: impl AsRef<Path>, assets_dir: impl AsRef<Path>) -> Self {
        Self {
            data_dir: data_dir.as_ref().to_path_buf(),
            assets: AssetPaths::under(assets_dir),
        }
    }
}

/// The assembled application state.
///
/// Operations live in `impl App` blocks next to their concern:
/// registration flows in `register.rs`, map rendering in `render.rs`.
pub struct App<S: KeyValueStore> {
    pub(crate) storage: S,
    pub(crate) codes: CountryCodeMap,
    pub(crate) mapping: CityProvinceMapping,
    pub(crate) cache: LocationCache,
    pub(crate) logs: TravelLogStore,
    pub(crate) assets: AssetPaths,
}

impl App<JsonFileStore> {
    /// Opens the file-backed app: storage directory, code table, mapping
    /// cache (building it from CSV on first run), location cache, log store.
    ///
    /// A missing code table or CSV degrades the affected lookups rather
    /// than failing the open.
    pub fn open(config: &Config) -> Result<Self> {
        let storage = JsonFileStore::open(&config.data_dir)?;
        Ok(Self::assemble(storage, config.assets.clone()))
    }
}

impl<S: KeyValueStore> App<S> {
    /// Assembles an app over any storage backend (in-memory for tests and
    /// the WASM bindings).
    pub fn assemble(mut storage: S, assets: AssetPaths) -> Self {
        let codes = CountryCodeMap::load(&assets.codes).unwrap_or_else(|e| {
            warn!("country code table unavailable: {e}");
            CountryCodeMap::default()
        });
        let mapping = CityProvinceMapping::load(&mut storage, &assets.china_cities_csv);
        let cache = LocationCache::load(&storage);
        let logs = TravelLogStore::load(&storage);

        Self {
            storage,
            codes,
            mapping,
            cache,
            logs,
            assets,
        }
    }

    /// Assembles an app from pre-parsed tables instead of asset files.
    ///
    /// The WASM bindings use this: the host page fetches the asset text and
    /// parses it up front, and the file-loading render paths stay unused.
    pub fn from_parts(storage: S, codes: CountryCodeMap, mapping: CityProvinceMapping) -> Self {
        let cache = LocationCache::load(&storage);
        let logs = TravelLogStore::load(&storage);
        Self {
            storage,
            codes,
            mapping,
            cache,
            logs,
            assets: AssetPaths::under("assets"),
        }
    }

    pub fn logs(&self) -> &TravelLogStore {
        &self.logs
    }

    pub fn mapping(&self) -> &CityProvinceMapping {
        &self.mapping
    }

    pub fn cache(&self) -> &LocationCache {
        &self.cache
    }

    pub fn codes(&self) -> &CountryCodeMap {
        &self.codes
    }

    /// Record lookup for the detail page; `None` is the caller's
    /// "no such record" page.
    pub fn find_log(&self, id: i64) -> Option<&TravelLog> {
        self.logs.get(id)
    }

    /// Cache-backed coordinates for one location string, for the detail
    /// page's map pin. A fresh lookup is persisted into the cache.
    pub fn locate(
        &mut self,
        location: &str,
        geocoder: &dyn Geocoder,
    ) -> Option<Coordinates> {
        let found = self.cache.resolve(geocoder, location);
        self.cache.persist(&mut self.storage);
        found
    }

    /// Raw stored value for one key.
    ///
    /// Hosts that own the real persistence (browser `localStorage`) mirror
    /// these values back after mutating calls.
    pub fn raw_state(&self, key: &str) -> Option<String> {
        self.storage.get(key)
    }

    pub fn stats(&self) -> StoreStats {
        StoreStats {
            logs: self.logs.len(),
            mapped_cities: self.mapping.len(),
            cached_locations: self.cache.len(),
            country_codes: self.codes.len(),
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    #[test]
    fn assemble_degrades_on_missing_assets() {
        let app = App::assemble(MemoryStore::new(), AssetPaths::under("/nonexistent"));
        let stats = app.stats();
        assert_eq!(stats.logs, 0);
        assert_eq!(stats.mapped_cities, 0);
        assert_eq!(stats.country_codes, 0);
    }

    #[test]
    fn open_builds_mapping_from_assets() {
        let dir = tempfile::tempdir().unwrap();
        let assets_dir = dir.path().join("assets");
        std::fs::create_dir_all(&assets_dir).unwrap();
        std::fs::write(assets_dir.join("codes.json"), r#"[["CN","CHN"]]"#).unwrap();
        std::fs::write(
            assets_dir.join("china_cities.csv"),
            "city_name_zh,city_name_zh2,province_name_zh,province_name_en,Latitude,Longitude\n\
             北京,北京市,北京,Beijing,39.9,116.4\n",
        )
        .unwrap();

        let config = Config::new(dir.path().join("data"), &assets_dir);
        let app = App::open(&config).unwrap();
        let stats = app.stats();
        assert_eq!(stats.country_codes, 1);
        assert_eq!(stats.mapped_cities, 2);

        // The parsed mapping was persisted for the next open.
        let reopened = App::open(&config).unwrap();
        assert_eq!(reopened.stats().mapped_cities, 2);
    }
}
