//! Compile-time embedded pipeline profile.
//!
//! URLs, the prefecture filter, directories, artifact names and the map
//! view are defined in `config/ehime.toml` and embedded at compile time.

use std::path::{Path, PathBuf};

use fushinsha_map_render::leaflet::MapView;
use fushinsha_map_scraper::ScrapeConfig;
use serde::Deserialize;

const EHIME_TOML: &str = include_str!("../config/ehime.toml");

/// Everything a run needs to know about one prefecture's notices.
#[derive(Debug, Clone, Deserialize)]
pub struct PipelineProfile {
    /// Short identifier (e.g. `"ehime"`).
    pub id: String,
    /// Page title for the rendered map.
    pub title: String,
    /// Prefecture name used to filter the reference table.
    pub prefecture: String,
    /// URL of the reference address CSV.
    pub reference_url: String,
    /// URL of the notices page.
    pub notices_url: String,
    /// Header text of the notices table's summary column.
    pub summary_column: String,
    /// `User-Agent` sent with every request.
    pub user_agent: String,
    /// Directory the reference CSV is cached in.
    pub cache_dir: PathBuf,
    /// Directory the artifacts are written to.
    pub output_dir: PathBuf,
    /// Artifact file names.
    pub outputs: OutputNames,
    /// Initial map position.
    pub map: MapConfig,
}

/// File names of the artifacts written under the output directory.
#[derive(Debug, Clone, Deserialize)]
pub struct OutputNames {
    /// Every joined record.
    pub records_csv: String,
    /// Records with any missing field.
    pub unresolved_csv: String,
    /// Rendered map page.
    pub map_html: String,
}

/// Map center and zoom.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct MapConfig {
    pub latitude: f64,
    pub longitude: f64,
    pub zoom: u8,
}

impl PipelineProfile {
    /// Returns the map view for the renderer.
    #[must_use]
    pub const fn map_view(&self) -> MapView {
        MapView {
            latitude: self.map.latitude,
            longitude: self.map.longitude,
            zoom: self.map.zoom,
        }
    }

    /// Request configuration for `url` carrying the profile's headers.
    #[must_use]
    pub fn scrape_config(&self, url: &str) -> ScrapeConfig {
        ScrapeConfig::new(url).with_header("User-Agent", &self.user_agent)
    }

    /// Replaces the cache and output directories when overrides are given.
    #[must_use]
    pub fn with_dirs(mut self, cache_dir: Option<PathBuf>, output_dir: Option<PathBuf>) -> Self {
        if let Some(dir) = cache_dir {
            self.cache_dir = dir;
        }
        if let Some(dir) = output_dir {
            self.output_dir = dir;
        }
        self
    }

    /// Path of the full records CSV.
    #[must_use]
    pub fn records_csv_path(&self) -> PathBuf {
        self.output_path(&self.outputs.records_csv)
    }

    /// Path of the unresolved records CSV.
    #[must_use]
    pub fn unresolved_csv_path(&self) -> PathBuf {
        self.output_path(&self.outputs.unresolved_csv)
    }

    /// Path of the map page.
    #[must_use]
    pub fn map_html_path(&self) -> PathBuf {
        self.output_path(&self.outputs.map_html)
    }

    fn output_path(&self, name: impl AsRef<Path>) -> PathBuf {
        self.output_dir.join(name)
    }
}

/// Returns the embedded Ehime profile.
///
/// # Panics
///
/// Panics if the embedded TOML is malformed (checked by the tests, since
/// the file is embedded at compile time).
#[must_use]
pub fn ehime() -> PipelineProfile {
    toml::de::from_str(EHIME_TOML)
        .unwrap_or_else(|e| panic!("Failed to parse embedded profile 'ehime': {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_embedded_profile() {
        let profile = ehime();
        assert_eq!(profile.id, "ehime");
        assert_eq!(profile.prefecture, "愛媛県");
        assert_eq!(profile.summary_column, "概　要");
        assert!(profile.reference_url.ends_with("/latest.csv"));
    }

    #[test]
    fn artifacts_live_under_output_dir() {
        let profile = ehime();
        assert_eq!(profile.records_csv_path(), Path::new("map").join("ehime.csv"));
        assert_eq!(profile.unresolved_csv_path(), Path::new("map").join("nan.csv"));
        assert_eq!(profile.map_html_path(), Path::new("map").join("index.html"));
        assert_eq!(profile.cache_dir, Path::new("src"));
    }

    #[test]
    fn map_view_matches_profile() {
        let view = ehime().map_view();
        assert!((view.latitude - 34.066_043).abs() < f64::EPSILON);
        assert!((view.longitude - 132.997_658).abs() < f64::EPSILON);
        assert_eq!(view.zoom, 10);
    }

    #[test]
    fn requests_carry_profile_user_agent() {
        let profile = ehime();
        let config = profile.scrape_config(&profile.notices_url);
        assert_eq!(config.url, "http://www.police.pref.ehime.jp/fushinsha.htm");
        assert_eq!(
            config.headers.get("User-Agent"),
            Some(&profile.user_agent)
        );
        assert!(profile.user_agent.starts_with("fushinsha-map/"));
        assert!(config.build_client().is_ok());
    }

    #[test]
    fn overrides_directories() {
        let profile = ehime().with_dirs(None, Some(PathBuf::from("out")));
        assert_eq!(profile.cache_dir, Path::new("src"));
        assert_eq!(profile.map_html_path(), Path::new("out").join("index.html"));
    }
}
