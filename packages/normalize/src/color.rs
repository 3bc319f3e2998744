//! Category to marker color lookup.

use std::str::FromStr as _;

use fushinsha_map_incident_models::{IncidentCategory, MarkerColor};

/// Returns the marker color for a raw category label.
///
/// Missing and unrecognized labels fall back to [`MarkerColor::Black`].
#[must_use]
pub fn color_for_category(raw: Option<&str>) -> MarkerColor {
    raw.and_then(|label| IncidentCategory::from_str(label).ok())
        .map_or(MarkerColor::Black, IncidentCategory::marker_color)
}
