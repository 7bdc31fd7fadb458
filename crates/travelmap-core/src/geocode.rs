// crates/travelmap-core/src/geocode.rs
//! # Geocoding
//!
//! The seam to the third-party geocoding service. Callers depend on the
//! [`Geocoder`] trait; the Nominatim-backed client behind the `geocode`
//! feature is the production implementation. Responses are an array of
//! candidates; only the first candidate is ever used.

use crate::codes::CountryCodeMap;
use crate::common::Coordinates;
use crate::error::Result;
use crate::model::UNKNOWN_COUNTRY;
use serde::Deserialize;
use tracing::warn;

/// One candidate in a geocoding response. Nominatim serializes coordinates
/// as strings.
#[derive(Debug, Clone, Deserialize)]
pub struct GeocodeHit {
    pub lat: String,
    pub lon: String,
    #[serde(default)]
    pub address: Option<GeocodeAddress>,
}

/// Address decomposition, present when requested with `addressdetails`.
#[derive(Debug, Clone, Deserialize)]
pub struct GeocodeAddress {
    #[serde(default)]
    pub country_code: Option<String>,
}

impl GeocodeHit {
    /// Parses the candidate's coordinates; `None` when they do not parse.
    pub fn coordinates(&self) -> Option<Coordinates> {
        let lat = self.lat.trim().parse::<f64>().ok()?;
        let lon = self.lon.trim().parse::<f64>().ok()?;
        Some(Coordinates::new(lat, lon))
    }
}

/// Forward geocoding by free-text query.
///
/// `Sync` so cache-miss lookups can be issued from the parallel join in
/// [`crate::cache::LocationCache::resolve_all`].
pub trait Geocoder: Sync {
    /// Searches for a location; `addressdetails` requests address
    /// decomposition (needed for country resolution).
    fn search(&self, query: &str, addressdetails: bool) -> Result<Vec<GeocodeHit>>;
}

/// Resolves a location string to a 3-letter country code.
///
/// Reverse path: full location → first candidate's `country_code` (alpha-2)
/// → alpha-3 via the static table, keeping the alpha-2 when the table has no
/// entry. Every failure mode (network, empty result, missing address)
/// resolves to `"UNK"`; a failed resolution never aborts the caller.
pub fn resolve_country(
    geocoder: &dyn Geocoder,
    codes: &CountryCodeMap,
    location: &str,
) -> String {
    let hits = match geocoder.search(location, true) {
        Ok(hits) => hits,
        Err(e) => {
            warn!(location, "country resolution failed: {e}");
            return UNKNOWN_COUNTRY.to_string();
        }
    };

    let alpha2 = hits
        .first()
        .and_then(|hit| hit.address.as_ref())
        .and_then(|addr| addr.country_code.as_deref())
        .map(str::to_uppercase);

    match alpha2 {
        Some(alpha2) => codes
            .alpha3_for(&alpha2)
            .map(str::to_string)
            .unwrap_or(alpha2),
        None => UNKNOWN_COUNTRY.to_string(),
    }
}

#[cfg(feature = "geocode")]
pub use nominatim::Nominatim;

#[cfg(feature = "geocode")]
mod nominatim {
    use super::{GeocodeHit, Geocoder};
    use crate::error::{Result, TravelMapError};

    const DEFAULT_BASE_URL: &str = "https://nominatim.openstreetmap.org";
    const USER_AGENT: &str = concat!("travelmap-rs/", env!("CARGO_PKG_VERSION"));

    /// Blocking Nominatim client.
    ///
    /// No retry, no rate limiting, no request deduplication; a request that
    /// fails is a miss for its caller.
    pub struct Nominatim {
        client: reqwest::blocking::Client,
        base_url: String,
    }

    impl Nominatim {
        pub fn new() -> Result<Self> {
            Self::with_base_url(DEFAULT_BASE_URL)
        }

        /// Points the client at a different endpoint (self-hosted instances,
        /// test servers).
        pub fn with_base_url(base_url: impl Into<String>) -> Result<Self> {
            let client = reqwest::blocking::Client::builder()
                .user_agent(USER_AGENT)
                .build()
                .map_err(|e| TravelMapError::Geocode(e.to_string()))?;
            Ok(Self {
                client,
                base_url: base_url.into(),
            })
        }
    }

    impl Geocoder for Nominatim {
        fn search(&self, query: &str, addressdetails: bool) -> Result<Vec<GeocodeHit>> {
            let url = format!("{}/search", self.base_url);
            let details = if addressdetails { "1" } else { "0" };

            let response = self
                .client
                .get(&url)
                .query(&[("format", "json"), ("q", query), ("addressdetails", details)])
                .send()
                .map_err(|e| TravelMapError::Geocode(e.to_string()))?;

            response
                .json::<Vec<GeocodeHit>>()
                .map_err(|e| TravelMapError::Geocode(e.to_string()))
        }
    }
}
