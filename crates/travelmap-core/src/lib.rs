// crates/travelmap-core/src/lib.rs

pub mod app;
pub mod assets;
pub mod cache;
pub mod codes;
pub mod common;
pub mod error;
pub mod geocode;
pub mod geojson;
pub mod mapping;
pub mod model;
pub mod popup;
pub mod register;
pub mod render;
pub mod storage;
pub mod store;
pub mod text;

// Re-exports
pub use crate::error::{Result, TravelMapError};
pub use crate::app::{App, AssetPaths, Config};
pub use crate::common::{Bounds, Coordinates, StoreStats};
pub use crate::model::{
    CityInfo, LogChanges, RegistrationForm, TravelLog, UNKNOWN_COUNTRY,
};
pub use crate::register::{EditOutcome, SubmitOutcome, UserPrompt};
pub use crate::popup::InfoPopup;
pub use crate::render::{FeatureStyle, MapCanvas, MarkerStyle, Mode};
// Export the storage seam (crucial for host integrations!)
pub use crate::storage::{JsonFileStore, KeyValueStore, MemoryStore};
pub use crate::geocode::Geocoder;
#[cfg(feature = "geocode")]
pub use crate::geocode::Nominatim;
