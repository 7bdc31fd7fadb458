// crates/travelmap-core/src/popup.rs
//! # Detail-info popup
//!
//! The ephemeral overlay listing logs that match a clicked map feature.
//! This module owns the pure part: card content and viewport-clamped
//! placement. The host page renders the result and dismisses it on the
//! first click that lands outside (see [`InfoPopup::contains`]).

use crate::model::TravelLog;
use crate::text::primary_city;

/// Minimum distance kept between the popup box and every viewport edge.
pub const EDGE_PADDING: f64 = 10.0;

/// Fixed popup width; height grows with the card count up to this cap.
pub const POPUP_WIDTH: f64 = 260.0;
pub const MAX_POPUP_HEIGHT: f64 = 300.0;

const BOX_PADDING: f64 = 10.0;
const CARD_HEIGHT: f64 = 44.0;
const CARD_GAP: f64 = 10.0;

/// A screen-space position in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A screen-space extent in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// One compact record line inside the popup.
#[derive(Debug, Clone, PartialEq)]
pub struct PopupCard {
    pub date: String,
    /// Primary segment of the record's location string.
    pub place: String,
}

/// A positioned popup, ready for the host page to render.
#[derive(Debug, Clone)]
pub struct InfoPopup {
    pub origin: Point,
    pub size: Size,
    pub cards: Vec<PopupCard>,
}

impl InfoPopup {
    /// Builds a popup for the logs matching a clicked feature.
    ///
    /// Returns `None` when `logs` is empty: clicking a feature without
    /// records shows nothing. The box is placed at the click point and then
    /// clamped so it stays fully inside the viewport minus [`EDGE_PADDING`].
    pub fn build(click: Point, viewport: Size, logs: &[&TravelLog]) -> Option<Self> {
        if logs.is_empty() {
            return None;
        }

        let cards: Vec<PopupCard> = logs
            .iter()
            .map(|log| PopupCard {
                date: log.date.to_string(),
                place: primary_city(&log.location).to_string(),
            })
            .collect();

        let size = box_size(cards.len());
        let origin = clamp_to_viewport(click, size, viewport);
        Some(Self {
            origin,
            size,
            cards,
        })
    }

    /// Whether a screen point lands inside the popup box. The host page
    /// keeps the popup on inside clicks and removes it otherwise.
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.origin.x
            && point.x <= self.origin.x + self.size.width
            && point.y >= self.origin.y
            && point.y <= self.origin.y + self.size.height
    }
}

fn box_size(card_count: usize) -> Size {
    let n = card_count as f64;
    let height = BOX_PADDING * 2.0 + n * CARD_HEIGHT + (n - 1.0).max(0.0) * CARD_GAP;
    Size::new(POPUP_WIDTH, height.min(MAX_POPUP_HEIGHT))
}

/// Clamp a box of `size` anchored at `anchor` so it stays fully inside the
/// viewport, at least [`EDGE_PADDING`] from every edge.
pub fn clamp_to_viewport(anchor: Point, size: Size, viewport: Size) -> Point {
    let max_x = viewport.width - EDGE_PADDING - size.width;
    let max_y = viewport.height - EDGE_PADDING - size.height;
    Point::new(
        anchor.x.min(max_x).max(EDGE_PADDING),
        anchor.y.min(max_y).max(EDGE_PADDING),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn log(date: &str, location: &str) -> TravelLog {
        TravelLog {
            id: 1,
            date: date.parse::<NaiveDate>().unwrap(),
            title: "t".to_string(),
            location: location.to_string(),
            memo: String::new(),
            country: "CHN".to_string(),
            province_zh: None,
            province_en: None,
            lat: None,
            lon: None,
        }
    }

    #[test]
    fn no_logs_no_popup() {
        let popup = InfoPopup::build(Point::new(100.0, 100.0), Size::new(800.0, 600.0), &[]);
        assert!(popup.is_none());
    }

    #[test]
    fn cards_show_date_and_primary_segment() {
        let a = log("2024-05-01", "上海、中国");
        let popup = InfoPopup::build(
            Point::new(100.0, 100.0),
            Size::new(800.0, 600.0),
            &[&a],
        )
        .unwrap();
        assert_eq!(popup.cards.len(), 1);
        assert_eq!(popup.cards[0].date, "2024-05-01");
        assert_eq!(popup.cards[0].place, "上海");
    }

    #[test]
    fn bottom_right_click_is_clamped_inside_viewport() {
        let a = log("2024-05-01", "上海、中国");
        let b = log("2024-06-01", "北京、中国");
        let viewport = Size::new(800.0, 600.0);

        let popup =
            InfoPopup::build(Point::new(795.0, 595.0), viewport, &[&a, &b]).unwrap();

        assert!(popup.origin.x >= EDGE_PADDING);
        assert!(popup.origin.y >= EDGE_PADDING);
        assert!(popup.origin.x + popup.size.width <= viewport.width - EDGE_PADDING);
        assert!(popup.origin.y + popup.size.height <= viewport.height - EDGE_PADDING);
    }

    #[test]
    fn unconstrained_click_keeps_its_anchor() {
        let a = log("2024-05-01", "上海、中国");
        let popup = InfoPopup::build(
            Point::new(100.0, 120.0),
            Size::new(800.0, 600.0),
            &[&a],
        )
        .unwrap();
        assert_eq!(popup.origin, Point::new(100.0, 120.0));
    }

    #[test]
    fn height_is_capped() {
        let logs: Vec<TravelLog> = (0..20).map(|_| log("2024-05-01", "上海、中国")).collect();
        let refs: Vec<&TravelLog> = logs.iter().collect();
        let popup = InfoPopup::build(
            Point::new(10.0, 10.0),
            Size::new(800.0, 600.0),
            &refs,
        )
        .unwrap();
        assert_eq!(popup.size.height, MAX_POPUP_HEIGHT);
    }

    #[test]
    fn outside_click_detection() {
        let a = log("2024-05-01", "上海、中国");
        let popup = InfoPopup::build(
            Point::new(100.0, 100.0),
            Size::new(800.0, 600.0),
            &[&a],
        )
        .unwrap();
        assert!(popup.contains(Point::new(110.0, 110.0)));
        assert!(!popup.contains(Point::new(500.0, 500.0)));
    }
}
