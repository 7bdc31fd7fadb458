// crates/travelmap-core/src/codes.rs
//! Alpha-2 → alpha-3 country code table.

use crate::assets;
use crate::error::Result;
use std::collections::HashMap;
use std::path::Path;

/// Static ISO country code lookup, immutable after load.
///
/// Loaded once from an asset file containing an array of
/// `["alpha2", "alpha3"]` pairs and passed down to whoever resolves
/// countries; there is no process-global copy.
#[derive(Debug, Clone, Default)]
pub struct CountryCodeMap {
    table: HashMap<String, String>,
}

impl CountryCodeMap {
    /// Loads the table from a JSON asset (an array of two-element arrays).
    pub fn load(path: &Path) -> Result<Self> {
        let pairs: Vec<(String, String)> = assets::load_json(path)?;
        Ok(Self::from_pairs(pairs))
    }

    pub fn from_pairs(pairs: impl IntoIterator<Item = (String, String)>) -> Self {
        let table = pairs
            .into_iter()
            .map(|(a2, a3)| (a2.to_uppercase(), a3))
            .collect();
        Self { table }
    }

    /// Converts a 2-letter code to a 3-letter code, case-insensitive.
    pub fn alpha3_for(&self, alpha2: &str) -> Option<&str> {
        self.table.get(&alpha2.to_uppercase()).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> CountryCodeMap {
        CountryCodeMap::from_pairs([
            ("CN".to_string(), "CHN".to_string()),
            ("JP".to_string(), "JPN".to_string()),
        ])
    }

    #[test]
    fn alpha3_lookup_is_case_insensitive() {
        let codes = sample();
        assert_eq!(codes.alpha3_for("CN"), Some("CHN"));
        assert_eq!(codes.alpha3_for("jp"), Some("JPN"));
        assert_eq!(codes.alpha3_for("XX"), None);
    }

    #[test]
    fn load_from_asset() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("codes.json");
        std::fs::write(&path, r#"[["CN","CHN"],["JP","JPN"],["DE","DEU"]]"#).unwrap();
        let codes = CountryCodeMap::load(&path).unwrap();
        assert_eq!(codes.len(), 3);
        assert_eq!(codes.alpha3_for("de"), Some("DEU"));
    }
}
