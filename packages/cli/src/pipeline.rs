//! End-to-end run: fetch, extract, normalize, join, render.
//!
//! [`run`] performs the network fetches and hands the downloaded data to
//! [`process`] and [`write_outputs`], which do no network I/O.

use std::time::Instant;

use fushinsha_map_geocoder::{ReferenceIndex, left_join, resolved, unresolved};
use fushinsha_map_incident_models::{JoinedRecord, ReferenceAddress};
use fushinsha_map_normalize::normalize_notice;
use fushinsha_map_render::RenderError;
use fushinsha_map_render::{csv_output, leaflet};
use fushinsha_map_scraper::download::{fetch_file, fetch_text};
use fushinsha_map_scraper::html_table::HtmlTable;
use fushinsha_map_scraper::{ScrapeError, reference_csv};

use crate::config::PipelineProfile;

/// Errors that abort a run.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// Fetching or parsing source data failed.
    #[error(transparent)]
    Scrape(#[from] ScrapeError),

    /// Writing an artifact failed.
    #[error(transparent)]
    Render(#[from] RenderError),
}

/// Counts reported at the end of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    /// Records written to the full CSV, one per notice.
    pub records: usize,
    /// Records written to the unresolved CSV.
    pub unresolved: usize,
    /// Markers placed on the map.
    pub markers: usize,
}

/// Extracts notices from the page and joins them against the reference
/// rows.
///
/// # Errors
///
/// Returns [`ScrapeError::Parse`] if the page has no table with the
/// profile's summary column.
pub fn process(
    profile: &PipelineProfile,
    notices_html: &str,
    reference: Vec<ReferenceAddress>,
) -> Result<Vec<JoinedRecord>, ScrapeError> {
    let notices = HtmlTable::find(notices_html, &profile.summary_column)?
        .notice_rows(&profile.summary_column)?;
    log::info!("Found {} notices", notices.len());

    let incidents: Vec<_> = notices.iter().map(normalize_notice).collect();
    let index = ReferenceIndex::new(reference);

    Ok(left_join(incidents, &index))
}

/// Writes the full CSV, the unresolved CSV, and the map page.
///
/// # Errors
///
/// Returns [`RenderError`] if any artifact cannot be written.
pub fn write_outputs(
    profile: &PipelineProfile,
    records: &[JoinedRecord],
) -> Result<RunSummary, RenderError> {
    csv_output::write_csv(&profile.records_csv_path(), records.iter().enumerate())?;

    let unresolved = unresolved(records);
    csv_output::write_csv(&profile.unresolved_csv_path(), unresolved.iter().copied())?;
    if !unresolved.is_empty() {
        log::info!(
            "{} records need manual review in {}",
            unresolved.len(),
            profile.unresolved_csv_path().display()
        );
    }

    let plotted = resolved(records);
    let markers = leaflet::save_map(
        &profile.map_html_path(),
        &profile.title,
        profile.map_view(),
        &plotted,
    )?;

    Ok(RunSummary {
        records: records.len(),
        unresolved: unresolved.len(),
        markers,
    })
}

/// Runs the whole pipeline for `profile`.
///
/// # Errors
///
/// Returns [`PipelineError`] on any fetch, parse, or write failure. There
/// are no retries.
pub async fn run(profile: &PipelineProfile) -> Result<RunSummary, PipelineError> {
    let start = Instant::now();

    log::info!("[{}] Fetching reference addresses", profile.id);
    let reference_path = fetch_file(
        &profile.scrape_config(&profile.reference_url),
        &profile.cache_dir,
    )
    .await?;
    let reference = reference_csv::load_reference_table(&reference_path, &profile.prefecture)?;

    log::info!("[{}] Fetching notices from {}", profile.id, profile.notices_url);
    let html = fetch_text(&profile.scrape_config(&profile.notices_url)).await?;

    let records = process(profile, &html, reference)?;
    let summary = write_outputs(profile, &records)?;

    log::info!(
        "[{}] Done in {:.1}s: {} records, {} unresolved, {} markers",
        profile.id,
        start.elapsed().as_secs_f64(),
        summary.records,
        summary.unresolved,
        summary.markers
    );

    Ok(summary)
}
