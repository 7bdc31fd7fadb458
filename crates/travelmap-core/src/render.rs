// crates/travelmap-core/src/render.rs
//! # Map-render orchestrator
//!
//! Drives the external geometry-rendering capability for the three display
//! modes. Entering a mode always clears every prior layer, adds the base
//! layer, applies the mode's view preset, draws mode-specific content, and
//! finally resolves and plots the per-log markers.

use crate::app::App;
use crate::common::{Bounds, Coordinates};
use crate::error::TravelMapError;
use crate::geocode::Geocoder;
use crate::geojson::FeatureCollection;
use crate::model::TravelLog;
use crate::popup::{InfoPopup, Point, Size};
use crate::storage::KeyValueStore;
use crate::text::{equals_folded, mentions_china, primary_city};
use std::collections::BTreeSet;
use std::str::FromStr;
use tracing::warn;

/// Attribution line of the base tile layer.
pub const TILE_ATTRIBUTION: &str = "© OpenStreetMap contributors, © CARTO";

/// The three map display states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    World,
    China,
    /// Stub state: recenters the view, draws no thematic content.
    Japan,
}

impl Mode {
    pub fn center(self) -> Coordinates {
        match self {
            Mode::World => Coordinates::new(20.0, 0.0),
            Mode::China => Coordinates::new(35.817, 104.1954),
            Mode::Japan => Coordinates::new(36.2048, 138.2539),
        }
    }

    pub fn zoom(self) -> u8 {
        match self {
            Mode::World => 2,
            Mode::China => 4,
            Mode::Japan => 5,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Mode::World => "world",
            Mode::China => "china",
            Mode::Japan => "japan",
        }
    }
}

impl FromStr for Mode {
    type Err = TravelMapError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "world" => Ok(Mode::World),
            "china" => Ok(Mode::China),
            "japan" => Ok(Mode::Japan),
            other => Err(TravelMapError::InvalidData(format!(
                "unknown display mode: {other}"
            ))),
        }
    }
}

/// Style for one boundary feature.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureStyle {
    pub fill_color: &'static str,
    pub color: &'static str,
    pub weight: f64,
    pub fill_opacity: f64,
}

impl FeatureStyle {
    pub fn visited() -> Self {
        Self {
            fill_color: "#4a90e2",
            color: "#3366cc",
            weight: 1.0,
            fill_opacity: 0.6,
        }
    }

    pub fn unvisited() -> Self {
        Self {
            fill_color: "#e0e0e0",
            color: "#cccccc",
            weight: 0.5,
            fill_opacity: 0.2,
        }
    }
}

/// Style for a point marker.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarkerStyle {
    pub radius: f64,
    pub color: &'static str,
    pub fill_color: &'static str,
    pub weight: f64,
    pub opacity: f64,
    pub fill_opacity: f64,
}

impl MarkerStyle {
    /// Pin for a mapped Chinese city.
    pub fn city_pin() -> Self {
        Self {
            radius: 6.0,
            color: "#3366cc",
            fill_color: "#4a90e2",
            weight: 1.0,
            opacity: 1.0,
            fill_opacity: 0.6,
        }
    }

    /// Marker for a geocoded log location.
    pub fn log_marker() -> Self {
        Self {
            radius: 5.0,
            color: "#3366cc",
            fill_color: "#4a90e2",
            weight: 1.0,
            opacity: 1.0,
            fill_opacity: 0.8,
        }
    }
}

/// A queued city pin for China mode.
#[derive(Debug, Clone, PartialEq)]
pub struct CityPin {
    pub at: Coordinates,
    pub city: String,
    pub province_zh: String,
}

/// The external map-rendering capability.
///
/// Implementations draw geometry and fire click events; they never decide
/// what is visited or which logs match — that stays here.
pub trait MapCanvas {
    /// Removes every tile layer and overlay drawn so far.
    fn clear_layers(&mut self);
    fn add_base_layer(&mut self, attribution: &str);
    fn set_view(&mut self, center: Coordinates, zoom: u8);
    /// Draws one boundary feature. `clickable` features report clicks back
    /// through the host page, which calls [`App::feature_click`].
    fn draw_feature(&mut self, key: &str, style: &FeatureStyle, clickable: bool);
    fn draw_marker(&mut self, at: Coordinates, style: &MarkerStyle, label: Option<&str>);
    fn fit_bounds(&mut self, bounds: &Bounds);
}

impl<S: KeyValueStore> App<S> {
    /// Renders one display mode from scratch.
    ///
    /// Failures along the way (missing GeoJSON, geocoding misses) degrade
    /// the affected content and are logged; the render itself always
    /// completes.
    pub fn render(&mut self, mode: Mode, canvas: &mut dyn MapCanvas, geocoder: &dyn Geocoder) {
        canvas.clear_layers();
        canvas.add_base_layer(TILE_ATTRIBUTION);
        canvas.set_view(mode.center(), mode.zoom());

        match mode {
            Mode::World => self.render_world(canvas),
            Mode::China => self.render_china(canvas),
            Mode::Japan => {} // recenter only
        }

        self.plot_log_markers(mode, canvas, geocoder);
    }

    fn render_world(&self, canvas: &mut dyn MapCanvas) {
        let collection = match FeatureCollection::load(&self.assets.world_geojson) {
            Ok(collection) => collection,
            Err(e) => {
                warn!("world GeoJSON unavailable: {e}");
                return;
            }
        };

        let visited = self.logs.visited_countries();
        for feature in &collection.features {
            let Some(key) = feature.key() else { continue };
            let code = key.to_uppercase();
            let is_visited = visited.contains(&code);
            let style = if is_visited {
                FeatureStyle::visited()
            } else {
                FeatureStyle::unvisited()
            };
            // Only features with at least one matching log take clicks.
            canvas.draw_feature(&code, &style, is_visited);
        }
    }

    fn render_china(&self, canvas: &mut dyn MapCanvas) {
        let (provinces, pins) = self.china_visits();

        match FeatureCollection::load(&self.assets.china_geojson) {
            Ok(collection) => {
                for feature in &collection.features {
                    let Some(name) = feature.key() else { continue };
                    let is_visited = provinces.iter().any(|p| equals_folded(p, name));
                    let style = if is_visited {
                        FeatureStyle::visited()
                    } else {
                        FeatureStyle::unvisited()
                    };
                    canvas.draw_feature(name, &style, is_visited);
                }
            }
            Err(e) => warn!("china GeoJSON unavailable: {e}"),
        }

        for pin in &pins {
            let label = format!("{} / {}", pin.city, pin.province_zh);
            canvas.draw_marker(pin.at, &MarkerStyle::city_pin(), Some(&label));
        }
    }

    /// Visited provinces (English names) and the pin queue for China mode.
    ///
    /// Logs whose derived city is not in the mapping are skipped silently.
    pub fn china_visits(&self) -> (BTreeSet<String>, Vec<CityPin>) {
        let mut provinces = BTreeSet::new();
        let mut pins = Vec::new();

        for log in self.logs.iter() {
            if !mentions_china(&log.location) {
                continue;
            }
            let city = primary_city(&log.location);
            let Some(info) = self.mapping.lookup(city) else {
                continue;
            };

            provinces.insert(info.province_en.clone());
            pins.push(CityPin {
                at: Coordinates::new(info.lat, info.lon),
                city: city.to_string(),
                province_zh: info.province_zh.clone(),
            });
        }

        (provinces, pins)
    }

    /// Resolves every log's coordinates (parallel join) and, outside world
    /// mode, plots them and fits the view around them.
    fn plot_log_markers(
        &mut self,
        mode: Mode,
        canvas: &mut dyn MapCanvas,
        geocoder: &dyn Geocoder,
    ) {
        let locations: Vec<String> =
            self.logs.iter().map(|l| l.location.clone()).collect();
        let resolved = self
            .cache
            .resolve_all(geocoder, locations.iter().map(String::as_str));
        self.cache.persist(&mut self.storage);

        if mode == Mode::World {
            return;
        }

        let mut bounds = Bounds::new();
        for location in &locations {
            if let Some(Some(coords)) = resolved.get(location) {
                canvas.draw_marker(*coords, &MarkerStyle::log_marker(), None);
                bounds.extend(*coords);
            }
        }

        if bounds.is_valid() {
            canvas.fit_bounds(&bounds.pad(0.3));
        }
    }

    /// Logs matching a clicked feature, recomputed at click time.
    pub fn matching_logs(&self, mode: Mode, feature_key: &str) -> Vec<&TravelLog> {
        match mode {
            Mode::World => self
                .logs
                .iter()
                .filter(|log| log.country.eq_ignore_ascii_case(feature_key))
                .collect(),
            Mode::China => self
                .logs
                .iter()
                .filter(|log| {
                    mentions_china(&log.location)
                        && self
                            .mapping
                            .lookup(primary_city(&log.location))
                            .is_some_and(|info| equals_folded(&info.province_en, feature_key))
                })
                .collect(),
            Mode::Japan => Vec::new(),
        }
    }

    /// Click on a rendered feature: builds the detail popup, or `None` when
    /// nothing matches.
    pub fn feature_click(
        &self,
        mode: Mode,
        feature_key: &str,
        click: Point,
        viewport: Size,
    ) -> Option<InfoPopup> {
        let matching = self.matching_logs(mode, feature_key);
        InfoPopup::build(click, viewport, &matching)
    }
}


#[cfg(test)]
mod tests {
    use super::testing::RecordingCanvas;
    use super::*;
    use crate::app::testing::memory_app;
    use crate::app::{App, AssetPaths};
    use crate::codes::CountryCodeMap;
    use crate::geocode::testing::ScriptedGeocoder;
    use crate::mapping::CityProvinceMapping;
    use crate::storage::MemoryStore;
    use chrono::NaiveDate;

    const CSV: &str = "city_name_zh,city_name_zh2,province_name_zh,province_name_en,Latitude,Longitude\n\
                       上海,上海市,上海,Shanghai,31.23,121.47\n\
                       北京,北京市,北京,Beijing,39.9,116.4\n";

    fn log(id: i64, location: &str, country: &str) -> crate::model::TravelLog {
        crate::model::TravelLog {
            id,
            date: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
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

    fn china_app() -> App<MemoryStore> {
        let mut app = memory_app(
            CountryCodeMap::default(),
            CityProvinceMapping::parse_csv(CSV),
        );
        app.logs.append(log(1, "上海、中国", "CHN"));
        app.logs.append(log(2, "東京、日本", "JPN"));
        app
    }

    /// App whose world GeoJSON asset exists on disk.
    fn world_app(dir: &std::path::Path) -> App<MemoryStore> {
        std::fs::write(
            dir.join("world-110m.geojson"),
            r#"{"features": [
                {"id": "CHN", "properties": {"name": "China"}},
                {"id": "JPN", "properties": {"name": "Japan"}},
                {"id": "DEU", "properties": {"name": "Germany"}}
            ]}"#,
        )
        .unwrap();

        let mut app = memory_app(CountryCodeMap::default(), CityProvinceMapping::default());
        app.assets = AssetPaths::under(dir);
        app.logs.append(log(1, "上海、中国", "CHN"));
        app.logs.append(log(2, "東京、日本", "JPN"));
        app
    }

    #[test]
    fn mode_presets_and_parsing() {
        assert_eq!("world".parse::<Mode>().unwrap(), Mode::World);
        assert_eq!("China".parse::<Mode>().unwrap(), Mode::China);
        assert!("mars".parse::<Mode>().is_err());
        assert_eq!(Mode::Japan.zoom(), 5);
        assert_eq!(Mode::World.center(), Coordinates::new(20.0, 0.0));
    }

    #[test]
    fn world_mode_styles_visited_countries_and_gates_clicks() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = world_app(dir.path());
        let mut canvas = RecordingCanvas::new();
        let geocoder = ScriptedGeocoder::new();

        app.render(Mode::World, &mut canvas, &geocoder);

        assert_eq!(canvas.base_layers, 1);
        let (_, style, clickable) = canvas.feature("CHN").unwrap();
        assert_eq!(*style, FeatureStyle::visited());
        assert!(*clickable);
        let (_, style, clickable) = canvas.feature("DEU").unwrap();
        assert_eq!(*style, FeatureStyle::unvisited());
        assert!(!clickable);
        // World mode plots no per-log markers.
        assert!(canvas.markers.is_empty());
        assert!(canvas.fitted.is_empty());
    }

    #[test]
    fn rendering_twice_leaves_one_base_layer_and_no_duplicates() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = world_app(dir.path());
        let mut canvas = RecordingCanvas::new();
        let geocoder = ScriptedGeocoder::new();

        app.render(Mode::World, &mut canvas, &geocoder);
        app.render(Mode::World, &mut canvas, &geocoder);

        assert_eq!(canvas.base_layers, 1);
        assert_eq!(
            canvas
                .features
                .iter()
                .filter(|(key, _, _)| key == "CHN")
                .count(),
            1
        );
    }

    #[test]
    fn china_visits_collects_provinces_and_pins() {
        let mut app = china_app();
        app.logs.append(log(3, "北京、中国", "CHN"));
        app.logs.append(log(4, "杭州、中国", "CHN")); // not in the mapping

        let (provinces, pins) = app.china_visits();
        assert_eq!(
            provinces.iter().cloned().collect::<Vec<_>>(),
            vec!["Beijing".to_string(), "Shanghai".to_string()]
        );
        assert_eq!(pins.len(), 2);
        assert_eq!(pins[0].city, "上海");
        assert_eq!(pins[0].at, Coordinates::new(31.23, 121.47));
    }

    #[test]
    fn china_mode_draws_pins_and_log_markers() {
        let mut app = china_app();
        let mut canvas = RecordingCanvas::new();
        let geocoder = ScriptedGeocoder::new()
            .answer("上海、中国", 31.23, 121.47, None)
            .answer("東京、日本", 35.68, 139.76, None);

        app.render(Mode::China, &mut canvas, &geocoder);

        // One city pin with its label plus two resolved log markers.
        let pins: Vec<_> = canvas
            .markers
            .iter()
            .filter(|(_, style, _)| *style == MarkerStyle::city_pin())
            .collect();
        assert_eq!(pins.len(), 1);
        assert_eq!(pins[0].2.as_deref(), Some("上海 / 上海"));

        let log_markers = canvas
            .markers
            .iter()
            .filter(|(_, style, _)| *style == MarkerStyle::log_marker())
            .count();
        assert_eq!(log_markers, 2);
        assert_eq!(canvas.fitted.len(), 1);
    }

    #[test]
    fn japan_mode_recenters_only() {
        let mut app = china_app();
        let mut canvas = RecordingCanvas::new();
        let geocoder = ScriptedGeocoder::new();

        app.render(Mode::Japan, &mut canvas, &geocoder);

        assert_eq!(canvas.base_layers, 1);
        assert_eq!(
            canvas.views.last(),
            Some(&(Coordinates::new(36.2048, 138.2539), 5))
        );
        assert!(canvas.features.is_empty());
    }

    #[test]
    fn world_click_matches_logs_by_country_code() {
        let app = china_app();
        let matching = app.matching_logs(Mode::World, "CHN");
        assert_eq!(matching.len(), 1);
        assert_eq!(matching[0].location, "上海、中国");

        let popup = app.feature_click(
            Mode::World,
            "CHN",
            Point::new(100.0, 100.0),
            Size::new(800.0, 600.0),
        );
        assert_eq!(popup.unwrap().cards[0].place, "上海");
    }

    #[test]
    fn china_click_matches_logs_by_province() {
        let app = china_app();
        let matching = app.matching_logs(Mode::China, "Shanghai");
        assert_eq!(matching.len(), 1);
        assert!(app.matching_logs(Mode::China, "Beijing").is_empty());
        // Japan features never match.
        assert!(app.matching_logs(Mode::Japan, "Tokyo").is_empty());
    }

    #[test]
    fn click_without_matches_yields_no_popup() {
        let app = china_app();
        let popup = app.feature_click(
            Mode::World,
            "DEU",
            Point::new(1.0, 1.0),
            Size::new(800.0, 600.0),
        );
        assert!(popup.is_none());
    }
}
