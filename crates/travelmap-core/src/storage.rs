// crates/travelmap-core/src/storage.rs
//! # Key-value storage
//!
//! The persistence seam. The original data lives in browser local storage as
//! JSON strings under three well-known keys; this module keeps that layout
//! behind a minimal get/set/delete trait so the backend can be swapped
//! (files for the CLI, a plain map for tests and WASM) without touching the
//! stores built on top.

use crate::error::Result;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Storage key for the travel-log array.
pub const KEY_TRAVEL_LOGS: &str = "travelLogs";
/// Storage key for the city → province/coordinates mapping object.
pub const KEY_CITY_MAPPING: &str = "cityProvinceLocationMapping";
/// Storage key for the location → coordinates cache object.
pub const KEY_LOCATION_CACHE: &str = "locationCache";

/// String-keyed, string-valued persistence.
///
/// Values are JSON-encoded by the callers; the store itself is agnostic.
/// There is no locking and no transaction: concurrent writers race, exactly
/// as concurrent browser tabs did upstream.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
    fn delete(&mut self, key: &str) -> Result<()>;
}

/// In-memory store for tests and the WASM bindings.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn delete(&mut self, key: &str) -> Result<()> {
        self.entries.remove(key);
        Ok(())
    }
}

/// File-backed store: one `<key>.json` file per key under a data directory.
///
/// The CLI's stand-in for browser local storage.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    /// Opens a store rooted at `dir`, creating the directory if needed.
    pub fn open(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Option<String> {
        fs::read_to_string(self.path_for(key)).ok()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        fs::write(self.path_for(key), value)?;
        Ok(())
    }

    fn delete(&mut self, key: &str) -> Result<()> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
