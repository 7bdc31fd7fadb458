//! travelmap-wasm — WebAssembly bindings for travelmap-core
//!
//! This crate exposes a small JS/WASM API on top of `travelmap-core`. The
//! host page keeps ownership of everything browser-shaped: it reads and
//! writes `localStorage`, fetches assets and geocoding responses over the
//! network, and drives the tile map. The bindings hold the parsed state
//! and make all the decisions: which countries count as visited, which
//! records match a clicked feature, where the info popup goes.
//!
//! What it provides
//! ----------------
//! - `init_state(codes, csv, logs, cache)` — parse host-fetched text
//! - Queries: `get_stats()`, `list_logs()`, `get_log(id)`,
//!   `visited_countries()`, `china_visits()`, `matching_logs(mode, key)`
//! - Interaction: `feature_click(...)` returning popup layout or `null`
//! - Mutations: `register_log(...)`, `edit_log(...)`, `delete_log(id)`;
//!   after each, read `export_state(key)` and mirror it to `localStorage`
//!
//! Quick start (browser)
//! ---------------------
//! ```javascript
//! import init, { init_state, register_log, export_state } from 'travelmap-wasm';
//!
//! async function main() {
//!   await init();
//!   init_state(codesJson, chinaCitiesCsv,
//!     localStorage.getItem('travelLogs') ?? '[]',
//!     localStorage.getItem('locationCache') ?? '{}');
//!
//!   const resp = await fetch(nominatimUrl).then(r => r.text());
//!   const outcome = register_log('2024-05-01', '出張', '上海、中国', '', resp, true);
//!   if (outcome.saved) {
//!     localStorage.setItem('travelLogs', export_state('travelLogs'));
//!   }
//! }
//! main();
//! ```
//!
//! Notes
//! -----
//! - Record ids are `Date.now()`-scale integers and cross the boundary as
//!   JS numbers; they stay well inside the exact-integer range of an f64.
//! - All exported functions are `wasm_bindgen` bindings and return plain
//!   types or `JsValue` containing JSON-serializable arrays/objects.
use std::sync::{Mutex, OnceLock};
use wasm_bindgen::prelude::*;

// Core Imports
use serde_json::json;
use serde_wasm_bindgen::to_value;
use travelmap_core::codes::CountryCodeMap;
use travelmap_core::geocode::{GeocodeHit, Geocoder};
use travelmap_core::mapping::CityProvinceMapping;
use travelmap_core::popup::{Point, Size};
use travelmap_core::storage::{KEY_LOCATION_CACHE, KEY_TRAVEL_LOGS};
use travelmap_core::{
    App, EditOutcome, FeatureStyle, KeyValueStore, LogChanges, MarkerStyle, MemoryStore, Mode,
    RegistrationForm, SubmitOutcome, UserPrompt,
};

// Static Instance
// The browser runtime is single threaded; the Mutex only satisfies the
// OnceLock bound and never contends.
static APP: OnceLock<Mutex<App<MemoryStore>>> = OnceLock::new();

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    web_sys::console::log_1(&"Initializing travelmap WASM module...".into());
}

fn with_app<T>(f: impl FnOnce(&mut App<MemoryStore>) -> Result<T, JsValue>) -> Result<T, JsValue> {
    let mutex = APP
        .get()
        .ok_or_else(|| JsValue::from_str("init_state has not been called"))?;
    let mut guard = mutex
        .lock()
        .map_err(|_| JsValue::from_str("state lock poisoned"))?;
    f(&mut guard)
}

fn parse_mode(mode: &str) -> Result<Mode, JsValue> {
    mode.parse::<Mode>()
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

/* --------------------------------------------------------------------------
   Initialization
-------------------------------------------------------------------------- */

/// Parses host-fetched asset text and stored state into the static app.
///
/// `travel_logs` and `location_cache` are the raw `localStorage` values
/// (pass `"[]"` / `"{}"` when absent). Calling again replaces the state.
#[wasm_bindgen]
pub fn init_state(
    codes_json: &str,
    china_cities_csv: &str,
    travel_logs: &str,
    location_cache: &str,
) -> Result<(), JsValue> {
    let pairs: Vec<(String, String)> = serde_json::from_str(codes_json)
        .map_err(|e| JsValue::from_str(&format!("codes table: {e}")))?;
    let codes = CountryCodeMap::from_pairs(pairs);
    let mapping = CityProvinceMapping::parse_csv(china_cities_csv);

    let mut storage = MemoryStore::new();
    storage
        .set(KEY_TRAVEL_LOGS, travel_logs)
        .and_then(|()| storage.set(KEY_LOCATION_CACHE, location_cache))
        .map_err(|e| JsValue::from_str(&e.to_string()))?;

    let app = App::from_parts(storage, codes, mapping);
    match APP.get() {
        Some(mutex) => {
            let mut guard = mutex
                .lock()
                .map_err(|_| JsValue::from_str("state lock poisoned"))?;
            *guard = app;
        }
        None => {
            let _ = APP.set(Mutex::new(app));
        }
    }

    let stats = with_app(|app| Ok(app.stats()))?;
    web_sys::console::log_1(
        &format!(
            "✓ Loaded {} records, {} mapped cities",
            stats.logs, stats.mapped_cities
        )
        .into(),
    );
    Ok(())
}

/// Raw stored value for one key, for mirroring back to `localStorage`.
#[wasm_bindgen]
pub fn export_state(key: &str) -> Result<Option<String>, JsValue> {
    with_app(|app| Ok(app.raw_state(key)))
}

/* --------------------------------------------------------------------------
   Queries
-------------------------------------------------------------------------- */

#[wasm_bindgen]
pub fn get_stats() -> Result<JsValue, JsValue> {
    with_app(|app| {
        let stats = app.stats();
        let stats = json!({
            "logs": stats.logs,
            "mappedCities": stats.mapped_cities,
            "cachedLocations": stats.cached_locations,
            "countryCodes": stats.country_codes,
        });
        to_value(&stats).map_err(Into::into)
    })
}

/// All records, newest first.
#[wasm_bindgen]
pub fn list_logs() -> Result<JsValue, JsValue> {
    with_app(|app| to_value(&app.logs().sorted_by_date_desc()).map_err(Into::into))
}

/// One record by id, or `null`.
#[wasm_bindgen]
pub fn get_log(id: f64) -> Result<JsValue, JsValue> {
    with_app(|app| match app.find_log(id as i64) {
        Some(log) => to_value(log).map_err(Into::into),
        None => Ok(JsValue::NULL),
    })
}

/// Distinct 3-letter country codes across all records.
#[wasm_bindgen]
pub fn visited_countries() -> Result<JsValue, JsValue> {
    with_app(|app| to_value(&app.logs().visited_countries()).map_err(Into::into))
}

/// Visited province names and city pins for China mode.
#[wasm_bindgen]
pub fn china_visits() -> Result<JsValue, JsValue> {
    with_app(|app| {
        let (provinces, pins) = app.china_visits();
        let pins: Vec<_> = pins
            .iter()
            .map(|pin| {
                json!({
                    "lat": pin.at.lat,
                    "lon": pin.at.lon,
                    "city": pin.city,
                    "provinceZh": pin.province_zh,
                })
            })
            .collect();
        to_value(&json!({ "provinces": provinces, "pins": pins })).map_err(Into::into)
    })
}

/// Records matching a clicked feature key in the given mode.
#[wasm_bindgen]
pub fn matching_logs(mode: &str, feature_key: &str) -> Result<JsValue, JsValue> {
    let mode = parse_mode(mode)?;
    with_app(|app| to_value(&app.matching_logs(mode, feature_key)).map_err(Into::into))
}

/// Feature and marker styles for the host's drawing layer.
#[wasm_bindgen]
pub fn get_styles() -> Result<JsValue, JsValue> {
    fn feature(style: &FeatureStyle) -> serde_json::Value {
        json!({
            "fillColor": style.fill_color,
            "color": style.color,
            "weight": style.weight,
            "fillOpacity": style.fill_opacity,
        })
    }
    fn marker(style: &MarkerStyle) -> serde_json::Value {
        json!({
            "radius": style.radius,
            "color": style.color,
            "fillColor": style.fill_color,
            "weight": style.weight,
            "opacity": style.opacity,
            "fillOpacity": style.fill_opacity,
        })
    }

    to_value(&json!({
        "visited": feature(&FeatureStyle::visited()),
        "unvisited": feature(&FeatureStyle::unvisited()),
        "cityPin": marker(&MarkerStyle::city_pin()),
        "logMarker": marker(&MarkerStyle::log_marker()),
    }))
    .map_err(Into::into)
}

/* --------------------------------------------------------------------------
   Interaction
-------------------------------------------------------------------------- */

/// Popup layout for a feature click, or `null` when the feature has no
/// matching records (nothing should open).
#[wasm_bindgen]
pub fn feature_click(
    mode: &str,
    feature_key: &str,
    click_x: f64,
    click_y: f64,
    viewport_width: f64,
    viewport_height: f64,
) -> Result<JsValue, JsValue> {
    let mode = parse_mode(mode)?;
    with_app(|app| {
        let popup = app.feature_click(
            mode,
            feature_key,
            Point::new(click_x, click_y),
            Size::new(viewport_width, viewport_height),
        );
        let Some(popup) = popup else {
            return Ok(JsValue::NULL);
        };
        let cards: Vec<_> = popup
            .cards
            .iter()
            .map(|card| json!({ "date": card.date, "place": card.place }))
            .collect();
        to_value(&json!({
            "x": popup.origin.x,
            "y": popup.origin.y,
            "width": popup.size.width,
            "height": popup.size.height,
            "cards": cards,
        }))
        .map_err(Into::into)
    })
}

/* --------------------------------------------------------------------------
   Mutations
-------------------------------------------------------------------------- */

/// Geocoder replaying a response the host page already fetched.
struct ReplayGeocoder {
    hits: Vec<GeocodeHit>,
}

impl Geocoder for ReplayGeocoder {
    fn search(&self, _query: &str, _addressdetails: bool) -> travelmap_core::Result<Vec<GeocodeHit>> {
        Ok(self.hits.clone())
    }
}

/// Prompt pre-answered by the host page (`window.confirm` already ran).
struct FixedPrompt {
    proceed: bool,
}

impl UserPrompt for FixedPrompt {
    fn confirm(&mut self, _message: &str) -> bool {
        self.proceed
    }

    fn alert(&mut self, message: &str) {
        web_sys::console::warn_1(&message.into());
    }
}

/// Registers a record. `geocode_response` is the raw Nominatim JSON the
/// host fetched for the location (pass `"[]"` when the fetch failed);
/// `proceed_without_mapping` is the host's answer to the unmapped-city
/// confirmation. Returns `{ saved, id? }`.
#[wasm_bindgen]
pub fn register_log(
    date: &str,
    title: &str,
    location: &str,
    memo: &str,
    geocode_response: &str,
    proceed_without_mapping: bool,
) -> Result<JsValue, JsValue> {
    let date = date
        .parse::<chrono::NaiveDate>()
        .map_err(|e| JsValue::from_str(&format!("date: {e}")))?;
    let hits: Vec<GeocodeHit> = serde_json::from_str(geocode_response).unwrap_or_default();

    with_app(|app| {
        let form = RegistrationForm {
            date,
            title: title.to_string(),
            location: location.to_string(),
            memo: memo.to_string(),
        };
        let geocoder = ReplayGeocoder { hits };
        let mut prompt = FixedPrompt {
            proceed: proceed_without_mapping,
        };
        let outcome = app
            .submit(form, &geocoder, &mut prompt)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        let out = match outcome {
            SubmitOutcome::Saved(id) => json!({ "saved": true, "id": id }),
            SubmitOutcome::Declined => json!({ "saved": false }),
        };
        to_value(&out).map_err(Into::into)
    })
}

/// Edits a record; `null` arguments keep the stored values. Returns
/// `{ saved }`; an unmapped new location city rejects the edit.
#[wasm_bindgen]
pub fn edit_log(
    id: f64,
    date: Option<String>,
    title: Option<String>,
    location: Option<String>,
    memo: Option<String>,
) -> Result<JsValue, JsValue> {
    let date = match date {
        Some(text) => Some(
            text.parse::<chrono::NaiveDate>()
                .map_err(|e| JsValue::from_str(&format!("date: {e}")))?,
        ),
        None => None,
    };

    with_app(|app| {
        let changes = LogChanges {
            date,
            title,
            location,
            memo,
        };
        let mut prompt = FixedPrompt { proceed: true };
        let outcome = app
            .edit(id as i64, changes, &mut prompt)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        let saved = matches!(outcome, EditOutcome::Saved);
        to_value(&json!({ "saved": saved })).map_err(Into::into)
    })
}

/// Deletes a record and its cached geocode entry. The host runs its own
/// confirmation first.
#[wasm_bindgen]
pub fn delete_log(id: f64) -> Result<bool, JsValue> {
    with_app(|app| {
        let mut prompt = FixedPrompt { proceed: true };
        app.delete(id as i64, &mut prompt, true)
            .map_err(|e| JsValue::from_str(&e.to_string()))
    })
}
