#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Output artifacts for joined incident records.
//!
//! [`csv_output`] writes the full and unresolved record tables for review;
//! [`leaflet`] renders resolved records as colored markers on a single
//! self-contained HTML map.

pub mod csv_output;
pub mod leaflet;

use std::path::Path;

/// Errors that can occur while writing output artifacts.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// An I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Writing CSV failed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Serializing marker data failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Creates the parent directory of `path` if it does not exist.
///
/// # Errors
///
/// Returns an I/O error if the directory cannot be created.
pub fn ensure_parent_dir(path: &Path) -> std::io::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
        && !parent.exists()
    {
        std::fs::create_dir_all(parent)?;
    }
    Ok(())
}
