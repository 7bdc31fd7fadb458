// crates/travelmap-core/src/model.rs
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One user-entered visited-place record.
///
/// Serialized into the `travelLogs` array with the upstream field layout;
/// unknown fields in stored data are ignored, optional enrichments are
/// omitted when absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TravelLog {
    /// Unique within the store; assigned from the creation timestamp in
    /// milliseconds, bumped on collision.
    pub id: i64,
    pub date: NaiveDate,
    pub title: String,
    /// Free-text location string, e.g. `上海、中国`.
    pub location: String,
    pub memo: String,
    /// 3-letter country code, `"UNK"` when resolution failed.
    pub country: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub province_zh: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub province_en: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lat: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lon: Option<f64>,
}

/// Country code recorded when resolution fails.
pub const UNKNOWN_COUNTRY: &str = "UNK";

/// City → province/coordinates reference entry.
///
/// Two city spellings may alias the same entry; the mapping is rebuilt
/// wholesale from the CSV source and never partially mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CityInfo {
    pub province_zh: String,
    pub province_en: String,
    pub lat: f64,
    pub lon: f64,
}

/// Input captured from the registration form.
#[derive(Debug, Clone)]
pub struct RegistrationForm {
    pub date: NaiveDate,
    pub title: String,
    pub location: String,
    pub memo: String,
}

/// Field changes collected from the edit modal; `None` keeps the stored
/// value.
#[derive(Debug, Clone, Default)]
pub struct LogChanges {
    pub date: Option<NaiveDate>,
    pub title: Option<String>,
    pub location: Option<String>,
    pub memo: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_json_layout_matches_storage_contract() {
        let log = TravelLog {
            id: 1700000000000,
            date: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
            title: "出張".to_string(),
            location: "上海、中国".to_string(),
            memo: "".to_string(),
            country: "CHN".to_string(),
            province_zh: None,
            province_en: None,
            lat: None,
            lon: None,
        };
        let json = serde_json::to_value(&log).unwrap();
        assert_eq!(json["id"], 1700000000000i64);
        assert_eq!(json["date"], "2024-05-01");
        assert_eq!(json["country"], "CHN");
        // Absent enrichments are omitted, not nulled.
        assert!(json.get("province_en").is_none());
    }

    #[test]
    fn unknown_stored_fields_are_tolerated() {
        let raw = r#"{
            "id": 42, "date": "2023-01-02", "title": "t",
            "location": "東京、日本", "memo": "", "country": "JPN",
            "futureField": true
        }"#;
        let log: TravelLog = serde_json::from_str(raw).unwrap();
        assert_eq!(log.id, 42);
        assert_eq!(log.country, "JPN");
        assert_eq!(log.lat, None);
    }
}
