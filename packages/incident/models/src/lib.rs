#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Suspicious-person incident types shared across the fushinsha map
//! pipeline.
//!
//! Notices scraped from the prefectural police page flow through these
//! types in order: [`NoticeRow`] → [`ParsedIncident`] →
//! [`NormalizedIncident`] → [`JoinedRecord`]. The category taxonomy and the
//! marker palette are closed enums so the color lookup is a static table
//! rather than scattered string literals.

use serde::Serialize;
use strum_macros::{AsRefStr, Display, EnumString};

/// Incident category as published in the `種別` segment of a notice.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Display,
    EnumString,
    AsRefStr,
)]
pub enum IncidentCategory {
    /// Peeping combined with covert filming
    #[strum(serialize = "のぞき・盗撮")]
    PeepingVoyeurism,
    /// Indecent exposure
    #[strum(serialize = "身体露出")]
    IndecentExposure,
    /// Groping
    #[strum(serialize = "ちかん")]
    Groping,
    /// Suspicious person
    #[strum(serialize = "不審者")]
    SuspiciousPerson,
    /// Being called out to or approached
    #[strum(serialize = "声かけ")]
    Approach,
    /// Assault
    #[strum(serialize = "暴行")]
    Assault,
    /// Stalking or following
    #[strum(serialize = "つきまとい")]
    Stalking,
    /// Taking photographs
    #[strum(serialize = "写真撮影")]
    Photographing,
    /// Trespassing into a building
    #[strum(serialize = "建造物侵入")]
    BuildingIntrusion,
    /// Trespassing into a residence
    #[strum(serialize = "住居侵入")]
    HomeIntrusion,
    /// Peeping
    #[strum(serialize = "のぞき")]
    Peeping,
    /// Taking video
    #[strum(serialize = "動画撮影")]
    Filming,
}

impl IncidentCategory {
    /// Returns the marker color used to plot incidents of this category.
    #[must_use]
    pub const fn marker_color(self) -> MarkerColor {
        match self {
            Self::PeepingVoyeurism | Self::Peeping => MarkerColor::Pink,
            Self::IndecentExposure => MarkerColor::Orange,
            Self::Groping => MarkerColor::Gray,
            Self::SuspiciousPerson => MarkerColor::Purple,
            Self::Approach => MarkerColor::Green,
            Self::Assault => MarkerColor::Red,
            Self::Stalking => MarkerColor::Blue,
            Self::Photographing | Self::Filming => MarkerColor::LightRed,
            Self::BuildingIntrusion | Self::HomeIntrusion => MarkerColor::DarkRed,
        }
    }
}

/// Marker icon colors supported by the map's awesome-markers plugin.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Default,
    Serialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum MarkerColor {
    LightRed,
    DarkRed,
    DarkBlue,
    Pink,
    Gray,
    Green,
    Orange,
    Purple,
    LightGray,
    Blue,
    Beige,
    CadetBlue,
    DarkGreen,
    DarkPurple,
    LightBlue,
    /// Fallback for missing or unrecognized categories.
    #[default]
    Black,
    LightGreen,
    Red,
    White,
}

/// One row of the reference address table, already filtered to a single
/// prefecture.
#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceAddress {
    /// Prefecture name (`都道府県名`).
    pub prefecture: String,
    /// City, ward, town or village name (`市区町村名`).
    pub city: String,
    /// District or town block name (`大字町丁目名`).
    pub district: String,
    /// Latitude (WGS84).
    pub latitude: f64,
    /// Longitude (WGS84).
    pub longitude: f64,
}

impl ReferenceAddress {
    /// Returns the join key: city and district concatenated.
    #[must_use]
    pub fn address(&self) -> String {
        format!("{}{}", self.city, self.district)
    }
}

/// A single row of the published notices table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoticeRow {
    /// Free-text summary cell. Empty when the cell is missing.
    pub summary: String,
}

/// The five labeled segments of a notice summary.
///
/// Every field is `None` when the summary does not have the expected
/// five-segment shape.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedIncident {
    /// Police station with jurisdiction (`管轄署`).
    pub jurisdiction: Option<String>,
    /// Category label (`種別`).
    pub category: Option<String>,
    /// Free-text date and time (`日時`).
    pub datetime: Option<String>,
    /// Free-text location (`場所`).
    pub location: Option<String>,
    /// Free-text situation (`状況`).
    pub status: Option<String>,
}

impl ParsedIncident {
    /// Whether every segment was extracted.
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        self.jurisdiction.is_some()
            && self.category.is_some()
            && self.datetime.is_some()
            && self.location.is_some()
            && self.status.is_some()
    }
}

/// A parsed incident with a cleaned location, a join key and a marker
/// color.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedIncident {
    /// Parsed segments. `location` holds the cleaned location text.
    pub parsed: ParsedIncident,
    /// Cleaned location cut at the first venue word (`住所`).
    pub locality: Option<String>,
    /// Address reduced to `city + district`, used as the join key.
    pub address: Option<String>,
    /// Marker color derived from the category.
    pub color: MarkerColor,
}

/// A normalized incident after the left join against the reference table.
#[derive(Debug, Clone, PartialEq)]
pub struct JoinedRecord {
    /// The incident being plotted.
    pub incident: NormalizedIncident,
    /// Matched reference row, if the address resolved.
    pub reference: Option<ReferenceAddress>,
}

impl JoinedRecord {
    /// Returns `(latitude, longitude)` when the address resolved.
    #[must_use]
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        self.reference.as_ref().map(|r| (r.latitude, r.longitude))
    }

    /// Whether any output field is missing.
    ///
    /// Unresolved records are written to the review CSV and left off the
    /// map.
    #[must_use]
    pub const fn is_unresolved(&self) -> bool {
        !self.incident.parsed.is_complete()
            || self.incident.address.is_none()
            || self.reference.is_none()
    }
}
