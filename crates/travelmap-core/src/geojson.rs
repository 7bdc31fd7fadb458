// crates/travelmap-core/src/geojson.rs
//! Minimal view of the boundary GeoJSON sources.
//!
//! Only the identifying properties are decoded — the geometry itself is an
//! opaque payload consumed by the external rendering engine. World features
//! carry a 3-letter country code in `id`; province features carry an English
//! name in `properties.name`.

use crate::assets;
use crate::error::Result;
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Clone, Deserialize)]
pub struct FeatureCollection {
    #[serde(default)]
    pub features: Vec<Feature>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Feature {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub properties: FeatureProperties,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FeatureProperties {
    #[serde(default)]
    pub name: Option<String>,
}

impl FeatureCollection {
    pub fn load(path: &Path) -> Result<Self> {
        assets::load_json(path)
    }
}

impl Feature {
    /// The property used for style/match lookups: `id` for world features,
    /// `properties.name` for provinces.
    pub fn key(&self) -> Option<&str> {
        self.id.as_deref().or(self.properties.name.as_deref())
    }
}
