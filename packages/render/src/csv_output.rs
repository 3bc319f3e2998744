//! CSV tables of joined records.
//!
//! Files are UTF-8 with a byte order mark so spreadsheet software picks
//! the encoding up. The first column is the record's row number in the full
//! table, so rows in the unresolved table can be traced back. Missing
//! values are written as empty cells.

use std::io::Write;
use std::path::Path;

use fushinsha_map_incident_models::JoinedRecord;

use crate::{RenderError, ensure_parent_dir};

/// UTF-8 byte order mark.
const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Column headers, index column first.
pub const HEADERS: [&str; 14] = [
    "",
    "管轄署",
    "種別",
    "日時",
    "場所",
    "状況",
    "住所",
    "address",
    "color",
    "都道府県名",
    "市区町村名",
    "大字町丁目名",
    "緯度",
    "経度",
];

/// Writes `(row index, record)` pairs as CSV, header row included.
///
/// # Errors
///
/// Returns [`RenderError`] if writing fails.
pub fn write_records<'a>(
    writer: impl Write,
    records: impl IntoIterator<Item = (usize, &'a JoinedRecord)>,
) -> Result<(), RenderError> {
    let mut writer = csv::Writer::from_writer(writer);
    writer.write_record(HEADERS)?;

    for (idx, record) in records {
        writer.write_record(row(idx, record))?;
    }

    writer.flush()?;
    Ok(())
}

/// Writes a BOM-prefixed CSV file at `path`, creating parent directories
/// as needed.
///
/// # Errors
///
/// Returns [`RenderError`] if the file cannot be created or written.
pub fn write_csv<'a>(
    path: &Path,
    records: impl IntoIterator<Item = (usize, &'a JoinedRecord)>,
) -> Result<(), RenderError> {
    ensure_parent_dir(path)?;

    let mut file = std::io::BufWriter::new(std::fs::File::create(path)?);
    file.write_all(UTF8_BOM)?;
    write_records(&mut file, records)?;
    file.flush()?;

    log::info!("Wrote {}", path.display());
    Ok(())
}

fn row(idx: usize, record: &JoinedRecord) -> [String; 14] {
    let parsed = &record.incident.parsed;
    let text = |v: Option<&String>| v.cloned().unwrap_or_default();
    let reference = record.reference.as_ref();

    [
        idx.to_string(),
        text(parsed.jurisdiction.as_ref()),
        text(parsed.category.as_ref()),
        text(parsed.datetime.as_ref()),
        text(parsed.location.as_ref()),
        text(parsed.status.as_ref()),
        text(record.incident.locality.as_ref()),
        text(record.incident.address.as_ref()),
        record.incident.color.to_string(),
        reference.map(|r| r.prefecture.clone()).unwrap_or_default(),
        reference.map(|r| r.city.clone()).unwrap_or_default(),
        reference.map(|r| r.district.clone()).unwrap_or_default(),
        reference.map(|r| r.latitude.to_string()).unwrap_or_default(),
        reference.map(|r| r.longitude.to_string()).unwrap_or_default(),
    ]
}
