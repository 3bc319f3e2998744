#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Turns scraped notice summaries into joinable incidents.
//!
//! The summary is split into its five labeled segments ([`extract`]), the
//! location is cleaned and reduced to a `city + district` join key by
//! ordered rule chains ([`rules`]), and the category picks a marker color
//! ([`color`]).

pub mod color;
pub mod extract;
pub mod rules;

use fushinsha_map_incident_models::{NormalizedIncident, NoticeRow, ParsedIncident};

/// Cleans the location of a parsed incident and derives its join key and
/// marker color.
///
/// The cleaned location replaces `parsed.location`. The locality is the
/// cleaned location cut by [`rules::LOCALITY_RULES`], and the join key is
/// the locality run through [`rules::ADDRESS_RULES`]. All three stay `None`
/// when no location was extracted.
#[must_use]
pub fn normalize(mut parsed: ParsedIncident) -> NormalizedIncident {
    let location = parsed
        .location
        .as_deref()
        .map(|l| rules::apply_rules(rules::LOCATION_RULES, l));
    let locality = location
        .as_deref()
        .map(|l| rules::apply_rules(rules::LOCALITY_RULES, l));
    let address = locality
        .as_deref()
        .map(|l| rules::apply_rules(rules::ADDRESS_RULES, l));
    let color = color::color_for_category(parsed.category.as_deref());

    parsed.location = location;

    NormalizedIncident {
        parsed,
        locality,
        address,
        color,
    }
}

/// Extracts and normalizes a single scraped notice.
#[must_use]
pub fn normalize_notice(row: &NoticeRow) -> NormalizedIncident {
    let parsed = extract::extract_summary(&row.summary);

    if !parsed.is_complete() && !row.summary.is_empty() {
        log::warn!("Summary does not match the five-segment layout: {}", row.summary);
    }

    normalize(parsed)
}
