//! Reference address table loading.
//!
//! The reference CSV lists every administrative district in Japan with a
//! representative coordinate. Only rows for a single prefecture are kept.
//! Columns other than prefecture, city, district, latitude and longitude
//! are ignored.

use std::io::Read;
use std::path::Path;

use fushinsha_map_incident_models::ReferenceAddress;
use serde::Deserialize;

use crate::ScrapeError;

/// A row as it appears in the CSV, before the prefecture filter.
///
/// Coordinates are optional here because rows outside the target
/// prefecture are not required to carry them.
#[derive(Debug, Deserialize)]
struct RawReferenceRow {
    #[serde(rename = "都道府県名")]
    prefecture: String,
    #[serde(rename = "市区町村名")]
    city: String,
    #[serde(rename = "大字町丁目名")]
    district: String,
    #[serde(rename = "緯度")]
    latitude: Option<f64>,
    #[serde(rename = "経度")]
    longitude: Option<f64>,
}

/// Reads reference rows for `prefecture` from CSV data.
///
/// Rows in the prefecture that lack a coordinate are skipped.
///
/// # Errors
///
/// Returns [`ScrapeError::Csv`] if the data is not valid CSV or a required
/// column is missing.
pub fn read_reference_table(
    reader: impl Read,
    prefecture: &str,
) -> Result<Vec<ReferenceAddress>, ScrapeError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut rows = Vec::new();
    let mut skipped = 0_usize;

    for result in reader.deserialize::<RawReferenceRow>() {
        let raw = result?;
        if raw.prefecture != prefecture {
            continue;
        }

        let (Some(latitude), Some(longitude)) = (raw.latitude, raw.longitude) else {
            skipped += 1;
            continue;
        };

        rows.push(ReferenceAddress {
            prefecture: raw.prefecture,
            city: raw.city,
            district: raw.district,
            latitude,
            longitude,
        });
    }

    if skipped > 0 {
        log::debug!("Skipped {skipped} {prefecture} reference rows without coordinates");
    }

    log::info!("Loaded {} reference addresses for {prefecture}", rows.len());

    Ok(rows)
}

/// Reads reference rows for `prefecture` from a CSV file on disk.
///
/// # Errors
///
/// Returns [`ScrapeError`] if the file cannot be opened or parsed.
pub fn load_reference_table(
    path: &Path,
    prefecture: &str,
) -> Result<Vec<ReferenceAddress>, ScrapeError> {
    let file = std::fs::File::open(path)?;
    read_reference_table(std::io::BufReader::new(file), prefecture)
}

#[cfg(test)]
mod tests {
    use std::io::Write as _;

    use super::*;

    const CSV: &str = "\
\"都道府県コード\",\"都道府県名\",\"市区町村名\",\"大字町丁目名\",\"小字・通称名\",\"緯度\",\"経度\"
\"38\",\"愛媛県\",\"西条市\",\"新田\",\"\",\"33.9\",\"133.1\"
\"38\",\"愛媛県\",\"松山市\",\"一番町一丁目\",\"\",\"33.84\",\"132.77\"
\"37\",\"香川県\",\"高松市\",\"番町一丁目\",\"\",\"34.34\",\"134.04\"
\"38\",\"愛媛県\",\"今治市\",\"座標なし\",\"\",\"\",\"\"
";

    #[test]
    fn keeps_only_target_prefecture() {
        let rows = read_reference_table(CSV.as_bytes(), "愛媛県").unwrap();
        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|r| r.prefecture == "愛媛県"));
    }

    #[test]
    fn parses_coordinates() {
        let rows = read_reference_table(CSV.as_bytes(), "愛媛県").unwrap();
        assert_eq!(rows[0].city, "西条市");
        assert_eq!(rows[0].district, "新田");
        assert!((rows[0].latitude - 33.9).abs() < f64::EPSILON);
        assert!((rows[0].longitude - 133.1).abs() < f64::EPSILON);
    }

    #[test]
    fn missing_column_is_an_error() {
        let csv = "都道府県名,市区町村名\n愛媛県,西条市\n";
        assert!(matches!(
            read_reference_table(csv.as_bytes(), "愛媛県"),
            Err(ScrapeError::Csv(_))
        ));
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(CSV.as_bytes()).unwrap();

        let rows = load_reference_table(file.path(), "香川県").unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].address(), "高松市番町一丁目");
    }
}
