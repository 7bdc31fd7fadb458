// crates/travelmap-core/src/assets.rs
//! # Static asset loading
//!
//! Handles the physical layer for the bundled reference data (country code
//! table, city CSV, boundary GeoJSON). Files ending in `.gz` are
//! transparently decompressed when the `compact` feature is enabled.

use crate::error::{Result, TravelMapError};
use serde::de::DeserializeOwned;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// Opens a buffered reader over an asset file, decompressing `.gz` inputs.
pub fn open_stream(path: &Path) -> Result<Box<dyn Read>> {
    let file = File::open(path).map_err(|e| {
        TravelMapError::NotFound(format!("Asset not found at {}: {}", path.display(), e))
    })?;

    let reader = BufReader::new(file);

    #[cfg(feature = "compact")]
    if path.extension().is_some_and(|ext| ext == "gz") {
        use flate2::read::GzDecoder;
        return Ok(Box::new(GzDecoder::new(reader)));
    }

    #[cfg(not(feature = "compact"))]
    if path.extension().is_some_and(|ext| ext == "gz") {
        return Err(TravelMapError::InvalidData(format!(
            "{} is gzipped but the 'compact' feature is disabled",
            path.display()
        )));
    }

    Ok(Box::new(reader))
}

/// Reads an asset file to a string.
pub fn read_text(path: &Path) -> Result<String> {
    let mut out = String::new();
    open_stream(path)?.read_to_string(&mut out)?;
    Ok(out)
}

/// Reads and deserializes a JSON asset.
pub fn load_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let reader = open_stream(path)?;
    Ok(serde_json::from_reader(BufReader::new(reader))?)
}
