//! HTML table extraction.
//!
//! Locates the first `<table>` whose header row contains a marker column
//! and flattens it into text cells. The first `<tr>` is the header; every
//! following `<tr>` is a body row.

use std::sync::LazyLock;

use fushinsha_map_incident_models::NoticeRow;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};

use crate::ScrapeError;

/// Line breaks, or runs of two or more whitespace characters, inside a
/// cell collapse to a single space.
static CELL_WHITESPACE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\r\n]+|\s{2,}").expect("valid regex"));

/// A table flattened to text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HtmlTable {
    /// Header cell text, in column order.
    pub headers: Vec<String>,
    /// Body rows, each padded to `headers.len()` with empty strings.
    pub rows: Vec<Vec<String>>,
}

impl HtmlTable {
    /// Parses `html` and returns the first table whose header row has a
    /// cell equal to `marker`.
    ///
    /// # Errors
    ///
    /// Returns [`ScrapeError::Parse`] if no table carries the marker column.
    pub fn find(html: &str, marker: &str) -> Result<Self, ScrapeError> {
        let document = Html::parse_document(html);

        let table_sel = parse_selector("table")?;
        let row_sel = parse_selector("tr")?;
        let cell_sel = parse_selector("th, td")?;

        for table in document.select(&table_sel) {
            let mut rows = table.select(&row_sel);

            let Some(header_row) = rows.next() else {
                continue;
            };
            let headers: Vec<String> = header_row.select(&cell_sel).map(cell_text).collect();

            if !headers.iter().any(|h| h == marker) {
                continue;
            }

            let rows: Vec<Vec<String>> = rows
                .map(|row| {
                    let mut cells: Vec<String> = row.select(&cell_sel).map(cell_text).collect();
                    if cells.len() < headers.len() {
                        cells.resize(headers.len(), String::new());
                    }
                    cells
                })
                .collect();

            log::debug!(
                "Found table with {} columns and {} rows for marker '{marker}'",
                headers.len(),
                rows.len()
            );

            return Ok(Self { headers, rows });
        }

        Err(ScrapeError::Parse(format!(
            "no table with a '{marker}' header column found"
        )))
    }

    /// Returns the index of the column titled `name`.
    #[must_use]
    pub fn column(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Returns one [`NoticeRow`] per body row, taking the summary from the
    /// `summary_column` column.
    ///
    /// # Errors
    ///
    /// Returns [`ScrapeError::Parse`] if the table has no such column.
    pub fn notice_rows(&self, summary_column: &str) -> Result<Vec<NoticeRow>, ScrapeError> {
        let idx = self.column(summary_column).ok_or_else(|| {
            ScrapeError::Parse(format!("table has no '{summary_column}' column"))
        })?;

        Ok(self
            .rows
            .iter()
            .map(|cells| NoticeRow {
                summary: cells.get(idx).cloned().unwrap_or_default(),
            })
            .collect())
    }
}

/// Parses a CSS selector string, returning a [`ScrapeError`] on failure.
fn parse_selector(selector: &str) -> Result<Selector, ScrapeError> {
    Selector::parse(selector)
        .map_err(|e| ScrapeError::Parse(format!("invalid CSS selector '{selector}': {e}")))
}

/// Concatenates a cell's text nodes and collapses its whitespace.
fn cell_text(el: ElementRef<'_>) -> String {
    let raw = el.text().collect::<String>();
    CELL_WHITESPACE_RE
        .replace_all(raw.trim(), " ")
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r"<html><body>
        <table><tr><td>お知らせ</td></tr><tr><td>概　要 は下表</td></tr></table>
        <table>
          <tr><th>番号</th><th>概　要</th></tr>
          <tr><td>1</td><td>(新居浜署)◆種別:不審者◆日時:1月1日
◆場所:西条市新田◆状況:声かけあり</td></tr>
          <tr><td>2</td></tr>
        </table>
    </body></html>";

    #[test]
    fn finds_table_by_header_marker() {
        let table = HtmlTable::find(PAGE, "概　要").unwrap();
        assert_eq!(table.headers, vec!["番号", "概　要"]);
        assert_eq!(table.rows.len(), 2);
    }

    #[test]
    fn collapses_line_breaks_in_cells() {
        let table = HtmlTable::find(PAGE, "概　要").unwrap();
        assert_eq!(
            table.rows[0][1],
            "(新居浜署)◆種別:不審者◆日時:1月1日 ◆場所:西条市新田◆状況:声かけあり"
        );
    }

    #[test]
    fn pads_missing_cells_with_empty_strings() {
        let table = HtmlTable::find(PAGE, "概　要").unwrap();
        assert_eq!(table.rows[1], vec!["2".to_owned(), String::new()]);
    }

    #[test]
    fn notice_rows_take_summary_column() {
        let rows = HtmlTable::find(PAGE, "概　要")
            .unwrap()
            .notice_rows("概　要")
            .unwrap();
        assert_eq!(rows.len(), 2);
        assert!(rows[0].summary.starts_with("(新居浜署)"));
        assert!(rows[1].summary.is_empty());
    }

    #[test]
    fn missing_marker_is_an_error() {
        assert!(matches!(
            HtmlTable::find(PAGE, "発生日"),
            Err(ScrapeError::Parse(_))
        ));
    }

    #[test]
    fn header_cells_may_be_td() {
        let html = "<table><tr><td>概　要</td></tr><tr><td>本文</td></tr></table>";
        let table = HtmlTable::find(html, "概　要").unwrap();
        assert_eq!(table.rows, vec![vec!["本文".to_owned()]]);
    }
}
