// crates/travelmap-core/src/error.rs
use thiserror::Error;

/// Crate-wide error type.
///
/// The taxonomy is deliberately small: things that are missing, things that
/// failed on the wire, and things that failed to decode. Network and parse
/// failures are usually caught near where they happen and degrade the
/// affected feature instead of propagating.
#[derive(Debug, Error)]
pub enum TravelMapError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("geocoding failed: {0}")]
    Geocode(String),

    #[error("invalid data: {0}")]
    InvalidData(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, TravelMapError>;
