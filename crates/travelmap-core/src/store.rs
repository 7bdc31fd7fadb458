// crates/travelmap-core/src/store.rs
//! # Travel-log store
//!
//! The list of user-entered records, persisted as a JSON array under the
//! `travelLogs` key.

use crate::error::{Result, TravelMapError};
use crate::model::TravelLog;
use crate::storage::{KeyValueStore, KEY_TRAVEL_LOGS};
use chrono::Utc;
use std::collections::BTreeSet;

#[derive(Debug, Clone, Default)]
pub struct TravelLogStore {
    logs: Vec<TravelLog>,
}

impl TravelLogStore {
    /// Loads the record list; absent or undecodable data yields an empty
    /// store.
    pub fn load(store: &dyn KeyValueStore) -> Self {
        let logs = store
            .get(KEY_TRAVEL_LOGS)
            .and_then(|raw| serde_json::from_str(&raw).ok())
            .unwrap_or_default();
        Self { logs }
    }

    /// Writes the record list back to storage.
    pub fn persist(&self, store: &mut dyn KeyValueStore) -> Result<()> {
        let json = serde_json::to_string(&self.logs)?;
        store.set(KEY_TRAVEL_LOGS, &json)
    }

    /// Next unique record id: the current timestamp in milliseconds, bumped
    /// past any collision with an existing id.
    pub fn next_id(&self) -> i64 {
        let mut id = Utc::now().timestamp_millis();
        while self.get(id).is_some() {
            id += 1;
        }
        id
    }

    pub fn append(&mut self, log: TravelLog) {
        self.logs.push(log);
    }

    /// Replaces the record with the same id in place.
    pub fn update(&mut self, log: TravelLog) -> Result<()> {
        match self.logs.iter_mut().find(|l| l.id == log.id) {
            Some(slot) => {
                *slot = log;
                Ok(())
            }
            None => Err(TravelMapError::NotFound(format!("log id {}", log.id))),
        }
    }

    pub fn remove(&mut self, id: i64) -> Option<TravelLog> {
        let idx = self.logs.iter().position(|l| l.id == id)?;
        Some(self.logs.remove(idx))
    }

    pub fn get(&self, id: i64) -> Option<&TravelLog> {
        self.logs.iter().find(|l| l.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &TravelLog> {
        self.logs.iter()
    }

    pub fn len(&self) -> usize {
        self.logs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.logs.is_empty()
    }

    /// Records newest-first, for the list view.
    pub fn sorted_by_date_desc(&self) -> Vec<&TravelLog> {
        let mut out: Vec<&TravelLog> = self.logs.iter().collect();
        out.sort_by(|a, b| b.date.cmp(&a.date));
        out
    }

    /// Distinct uppercased country codes across all records.
    pub fn visited_countries(&self) -> BTreeSet<String> {
        self.logs
            .iter()
            .filter(|l| !l.country.is_empty())
            .map(|l| l.country.to_uppercase())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use chrono::NaiveDate;

    fn log(id: i64, date: &str, location: &str, country: &str) -> TravelLog {
        TravelLog {
            id,
            date: date.parse::<NaiveDate>().unwrap(),
            title: format!("trip {id}"),
            location: location.to_string(),
            memo: String::new(),
            country: country.to_string(),
            province_zh: None,
            province_en: None,
            lat: None,
            lon: None,
        }
    }

    #[test]
    fn append_then_load_preserves_fields() {
        let mut kv = MemoryStore::new();
        let mut store = TravelLogStore::default();
        store.append(log(1, "2024-05-01", "上海、中国", "CHN"));
        store.persist(&mut kv).unwrap();

        let reloaded = TravelLogStore::load(&kv);
        let record = reloaded.get(1).unwrap();
        assert_eq!(record.title, "trip 1");
        assert_eq!(record.location, "上海、中国");
        assert_eq!(record.country, "CHN");
    }

    #[test]
    fn update_replaces_in_place_and_requires_existing_id() {
        let mut store = TravelLogStore::default();
        store.append(log(1, "2024-05-01", "上海、中国", "CHN"));
        store.append(log(2, "2024-06-01", "東京、日本", "JPN"));

        let mut edited = store.get(1).unwrap().clone();
        edited.memo = "updated".to_string();
        store.update(edited).unwrap();

        // Position preserved, untouched record intact.
        let ids: Vec<i64> = store.iter().map(|l| l.id).collect();
        assert_eq!(ids, vec![1, 2]);
        assert_eq!(store.get(1).unwrap().memo, "updated");
        assert_eq!(store.get(1).unwrap().location, "上海、中国");
        assert_eq!(store.get(2).unwrap().memo, "");

        let missing = store.update(log(99, "2024-01-01", "x", "UNK"));
        assert!(matches!(missing, Err(TravelMapError::NotFound(_))));
    }

    #[test]
    fn next_id_bumps_past_collisions() {
        let mut store = TravelLogStore::default();
        let now = Utc::now().timestamp_millis();
        // Occupy a run of ids around "now".
        for offset in 0..3 {
            store.append(log(now + offset, "2024-05-01", "x", "UNK"));
        }
        let id = store.next_id();
        assert!(store.get(id).is_none());
        assert!(id > now + 2 || id < now);
    }

    #[test]
    fn sorted_by_date_desc_is_newest_first() {
        let mut store = TravelLogStore::default();
        store.append(log(1, "2023-03-01", "a", "UNK"));
        store.append(log(2, "2024-07-15", "b", "UNK"));
        store.append(log(3, "2024-01-01", "c", "UNK"));

        let ids: Vec<i64> = store.sorted_by_date_desc().iter().map(|l| l.id).collect();
        assert_eq!(ids, vec![2, 3, 1]);
    }

    #[test]
    fn visited_countries_is_distinct_and_uppercased() {
        let mut store = TravelLogStore::default();
        store.append(log(1, "2024-05-01", "上海、中国", "chn"));
        store.append(log(2, "2024-06-01", "北京、中国", "CHN"));
        store.append(log(3, "2024-07-01", "東京、日本", "JPN"));

        let visited = store.visited_countries();
        assert_eq!(
            visited.iter().cloned().collect::<Vec<_>>(),
            vec!["CHN".to_string(), "JPN".to_string()]
        );
    }
}
