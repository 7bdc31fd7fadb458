// crates/travelmap-core/src/common.rs
use serde::{Deserialize, Serialize};

/// A plain latitude/longitude pair.
///
/// This is both the value stored in the location cache and the unit the
/// render orchestrator hands to the map canvas.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinates {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

/// A lat/lon bounding box, grown point by point.
///
/// Mirrors the bounds object of the external map library: starts invalid,
/// `extend` grows it, `pad` widens it by a ratio before fitting the view.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    min: Option<Coordinates>,
    max: Option<Coordinates>,
}

impl Bounds {
    pub fn new() -> Self {
        Self {
            min: None,
            max: None,
        }
    }

    /// A bounds without any points is not valid and must not be fitted.
    pub fn is_valid(&self) -> bool {
        self.min.is_some()
    }

    pub fn extend(&mut self, point: Coordinates) {
        match (&mut self.min, &mut self.max) {
            (Some(min), Some(max)) => {
                min.lat = min.lat.min(point.lat);
                min.lon = min.lon.min(point.lon);
                max.lat = max.lat.max(point.lat);
                max.lon = max.lon.max(point.lon);
            }
            _ => {
                self.min = Some(point);
                self.max = Some(point);
            }
        }
    }

    /// Widen each side by `ratio` of the current span.
    pub fn pad(&self, ratio: f64) -> Self {
        match (self.min, self.max) {
            (Some(min), Some(max)) => {
                let dlat = (max.lat - min.lat) * ratio;
                let dlon = (max.lon - min.lon) * ratio;
                Self {
                    min: Some(Coordinates::new(min.lat - dlat, min.lon - dlon)),
                    max: Some(Coordinates::new(max.lat + dlat, max.lon + dlon)),
                }
            }
            _ => *self,
        }
    }

    pub fn min(&self) -> Option<Coordinates> {
        self.min
    }

    pub fn max(&self) -> Option<Coordinates> {
        self.max
    }

    pub fn center(&self) -> Option<Coordinates> {
        match (self.min, self.max) {
            (Some(min), Some(max)) => Some(Coordinates::new(
                (min.lat + max.lat) / 2.0,
                (min.lon + max.lon) / 2.0,
            )),
            _ => None,
        }
    }
}

impl Default for Bounds {
    fn default() -> Self {
        Self::new()
    }
}

/// Simple aggregate statistics for the persisted state.
///
/// Reflects the materialized in-memory stores after [`crate::App::open`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct StoreStats {
    pub logs: usize,
    pub mapped_cities: usize,
    pub cached_locations: usize,
    pub country_codes: usize,
}
