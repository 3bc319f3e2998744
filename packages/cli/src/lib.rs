#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Scrapes suspicious-person notices, geocodes them against a reference
//! address table, and writes CSV and map artifacts.
//!
//! The run is a single linear pass: fetch, extract, normalize, join,
//! render. Constants for a prefecture live in an embedded TOML profile
//! ([`config`]); [`pipeline`] wires the stages together.

pub mod config;
pub mod pipeline;
