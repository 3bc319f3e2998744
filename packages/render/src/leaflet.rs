//! Interactive map rendering.
//!
//! Produces a single HTML page that loads Leaflet and the awesome-markers
//! plugin from their CDNs and plots one colored marker per resolved record.
//! Marker data is embedded in the page as a JSON array; popup content is
//! escaped before it is embedded.

use std::path::Path;

use fushinsha_map_incident_models::{JoinedRecord, MarkerColor};
use serde::Serialize;

use crate::{RenderError, ensure_parent_dir};

/// Maximum popup width in pixels.
const POPUP_MAX_WIDTH: u32 = 300;

/// Minimum popup width in pixels.
const POPUP_MIN_WIDTH: u32 = 150;

const TEMPLATE: &str = r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8" />
<meta name="viewport" content="width=device-width, initial-scale=1.0, maximum-scale=1.0, user-scalable=no" />
<title>{{TITLE}}</title>
<link rel="stylesheet" href="https://cdn.jsdelivr.net/npm/leaflet@1.9.4/dist/leaflet.css" />
<link rel="stylesheet" href="https://netdna.bootstrapcdn.com/bootstrap/3.0.0/css/bootstrap-glyphicons.css" />
<link rel="stylesheet" href="https://cdnjs.cloudflare.com/ajax/libs/Leaflet.awesome-markers/2.0.2/leaflet.awesome-markers.css" />
<script src="https://cdn.jsdelivr.net/npm/leaflet@1.9.4/dist/leaflet.js"></script>
<script src="https://cdnjs.cloudflare.com/ajax/libs/Leaflet.awesome-markers/2.0.2/leaflet.awesome-markers.js"></script>
<style>
html, body { width: 100%; height: 100%; margin: 0; padding: 0; }
#map { position: absolute; top: 0; bottom: 0; right: 0; left: 0; }
</style>
</head>
<body>
<div id="map"></div>
<script>
var map = L.map("map", { center: [{{CENTER_LAT}}, {{CENTER_LNG}}], zoom: {{ZOOM}} });
L.tileLayer("https://tile.openstreetmap.org/{z}/{x}/{y}.png", {
  maxZoom: 19,
  attribution: '&copy; <a href="https://www.openstreetmap.org/copyright">OpenStreetMap</a> contributors'
}).addTo(map);
var markers = {{MARKERS}};
markers.forEach(function (m) {
  L.marker([m.lat, m.lng], {
    icon: L.AwesomeMarkers.icon({ icon: "info-sign", prefix: "glyphicon", markerColor: m.color })
  })
    .bindPopup(m.popup, { maxWidth: {{POPUP_MAX_WIDTH}}, minWidth: {{POPUP_MIN_WIDTH}} })
    .addTo(map);
});
</script>
</body>
</html>
"#;

/// Initial map position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapView {
    /// Center latitude.
    pub latitude: f64,
    /// Center longitude.
    pub longitude: f64,
    /// Initial zoom level.
    pub zoom: u8,
}

/// A marker as embedded in the page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Marker {
    pub lat: f64,
    pub lng: f64,
    pub color: MarkerColor,
    /// Popup HTML, already escaped.
    pub popup: String,
}

impl Marker {
    /// Builds a marker for a resolved record. Returns `None` when the record
    /// has no coordinates.
    #[must_use]
    pub fn from_record(record: &JoinedRecord) -> Option<Self> {
        let (lat, lng) = record.coordinates()?;
        let parsed = &record.incident.parsed;

        let popup = [
            &parsed.jurisdiction,
            &parsed.category,
            &parsed.datetime,
            &parsed.location,
            &parsed.status,
        ]
        .iter()
        .map(|field| format!("<p>{}</p>", escape_html(field.as_deref().unwrap_or_default())))
        .collect::<String>();

        Some(Self {
            lat,
            lng,
            color: record.incident.color,
            popup,
        })
    }
}

/// Renders the map page for `records`. Records without coordinates are
/// skipped.
///
/// # Errors
///
/// Returns [`RenderError::Json`] if the marker data cannot be serialized.
pub fn render_map<'a>(
    title: &str,
    view: MapView,
    records: impl IntoIterator<Item = &'a JoinedRecord>,
) -> Result<String, RenderError> {
    let markers: Vec<Marker> = records.into_iter().filter_map(Marker::from_record).collect();

    log::debug!("Rendering {} markers", markers.len());

    // `</` would end the inline script early.
    let markers_json = serde_json::to_string(&markers)?.replace("</", "<\\/");

    Ok(TEMPLATE
        .replace("{{TITLE}}", &escape_html(title))
        .replace("{{CENTER_LAT}}", &view.latitude.to_string())
        .replace("{{CENTER_LNG}}", &view.longitude.to_string())
        .replace("{{ZOOM}}", &view.zoom.to_string())
        .replace("{{POPUP_MAX_WIDTH}}", &POPUP_MAX_WIDTH.to_string())
        .replace("{{POPUP_MIN_WIDTH}}", &POPUP_MIN_WIDTH.to_string())
        .replace("{{MARKERS}}", &markers_json))
}

/// Renders the map page and writes it to `path`, creating parent
/// directories as needed. Returns the number of markers written.
///
/// # Errors
///
/// Returns [`RenderError`] if rendering or writing fails.
pub fn save_map(
    path: &Path,
    title: &str,
    view: MapView,
    records: &[&JoinedRecord],
) -> Result<usize, RenderError> {
    let html = render_map(title, view, records.iter().copied())?;

    ensure_parent_dir(path)?;
    std::fs::write(path, html)?;

    let count = records.iter().filter(|r| r.coordinates().is_some()).count();
    log::info!("Wrote {} with {count} markers", path.display());

    Ok(count)
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
