// crates/travelmap-core/src/mapping.rs
//! # City/province mapping cache
//!
//! Builds the city → province/coordinates reference table from the bundled
//! CSV dataset, persisting the parsed result so later startups skip the
//! parse entirely. Load failures degrade to an empty mapping: city lookups
//! simply miss.

use crate::assets;
use crate::model::CityInfo;
use crate::storage::{KeyValueStore, KEY_CITY_MAPPING};
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, warn};

// Column names expected in the header row of the CSV source.
const COL_CITY_ZH: &str = "city_name_zh";
const COL_CITY_ZH2: &str = "city_name_zh2";
const COL_PROVINCE_ZH: &str = "province_name_zh";
const COL_PROVINCE_EN: &str = "province_name_en";
const COL_LATITUDE: &str = "Latitude";
const COL_LONGITUDE: &str = "Longitude";

#[derive(Debug, Clone, Default)]
pub struct CityProvinceMapping {
    entries: HashMap<String, CityInfo>,
}

impl CityProvinceMapping {
    /// Loads the mapping: persisted cache first, CSV source on cache miss.
    ///
    /// A freshly parsed mapping overwrites any previous cache. When the CSV
    /// cannot be read or decoded the mapping stays empty.
    pub fn load(store: &mut dyn KeyValueStore, csv_path: &Path) -> Self {
        if let Some(raw) = store.get(KEY_CITY_MAPPING) {
            match serde_json::from_str::<HashMap<String, CityInfo>>(&raw) {
                Ok(entries) => {
                    debug!(cities = entries.len(), "city mapping cache hit");
                    return Self { entries };
                }
                Err(e) => warn!("discarding undecodable city mapping cache: {e}"),
            }
        }

        let text = match assets::read_text(csv_path) {
            Ok(text) => text,
            Err(e) => {
                warn!("city CSV unavailable, mapping stays empty: {e}");
                return Self::default();
            }
        };

        let mapping = Self::parse_csv(&text);
        mapping.persist(store);
        mapping
    }

    /// Parses the CSV source. Column order comes from the header row; rows
    /// whose column count does not match the header are skipped silently.
    pub fn parse_csv(text: &str) -> Self {
        let mut lines = text.lines();
        let headers: Vec<&str> = match lines.next() {
            Some(header) => header.split(',').map(str::trim).collect(),
            None => return Self::default(),
        };

        let col = |name: &str| headers.iter().position(|h| *h == name);
        let (city1, city2, prov_zh, prov_en, lat_col, lon_col) = match (
            col(COL_CITY_ZH),
            col(COL_CITY_ZH2),
            col(COL_PROVINCE_ZH),
            col(COL_PROVINCE_EN),
            col(COL_LATITUDE),
            col(COL_LONGITUDE),
        ) {
            (Some(a), Some(b), Some(c), Some(d), Some(e), Some(f)) => (a, b, c, d, e, f),
            _ => {
                warn!("city CSV header is missing expected columns");
                return Self::default();
            }
        };

        let mut entries = HashMap::new();
        for line in lines {
            let row: Vec<&str> = line.split(',').map(str::trim).collect();
            if row.len() != headers.len() {
                continue;
            }

            let (lat, lon) = match (row[lat_col].parse::<f64>(), row[lon_col].parse::<f64>()) {
                (Ok(lat), Ok(lon)) => (lat, lon),
                _ => {
                    debug!(row = line, "skipping city row with unparseable coordinates");
                    continue;
                }
            };

            let info = CityInfo {
                province_zh: row[prov_zh].to_string(),
                province_en: row[prov_en].to_string(),
                lat,
                lon,
            };

            // Primary and secondary spellings alias the same entry.
            if !row[city1].is_empty() {
                entries.insert(row[city1].to_string(), info.clone());
            }
            if !row[city2].is_empty() {
                entries.insert(row[city2].to_string(), info);
            }
        }

        Self { entries }
    }

    /// Persists the complete mapping, replacing any previous cache.
    /// Best effort: storage failure is logged, not propagated.
    pub fn persist(&self, store: &mut dyn KeyValueStore) {
        match serde_json::to_string(&self.entries) {
            Ok(json) => {
                if let Err(e) = store.set(KEY_CITY_MAPPING, &json) {
                    warn!("could not persist city mapping cache: {e}");
                }
            }
            Err(e) => warn!("could not encode city mapping cache: {e}"),
        }
    }

    pub fn lookup(&self, city: &str) -> Option<&CityInfo> {
        self.entries.get(city)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
