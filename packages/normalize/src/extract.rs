//! Summary segment extraction.
//!
//! A notice summary reads `(署名)◆種別:…◆日時:…◆場所:…◆状況:…`: a leading
//! jurisdiction followed by four `label:content` segments, each introduced
//! by `◆`. The text is NFKC-normalized first so full-width colons,
//! parentheses and digits match.

use std::sync::LazyLock;

use fushinsha_map_incident_models::ParsedIncident;
use regex::Regex;
use unicode_normalization::UnicodeNormalization as _;

/// Five capture groups: jurisdiction, category, datetime, location, status.
static SUMMARY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(.+)◆.+:(.+)◆.+:(.+)◆.+:(.+)◆.+:(.+)").expect("valid regex")
});

/// Characters stripped from both ends of the jurisdiction.
const JURISDICTION_BRACKETS: [char; 2] = ['(', ')'];

/// Splits a summary into its five segments.
///
/// Returns [`ParsedIncident::default`] (every field `None`) when the
/// summary does not have five `◆`-delimited segments.
#[must_use]
pub fn extract_summary(summary: &str) -> ParsedIncident {
    let text: String = summary.nfkc().collect();

    let Some(caps) = SUMMARY_RE.captures(&text) else {
        return ParsedIncident::default();
    };

    let field = |i: usize| caps.get(i).map(|m| m.as_str().trim().to_owned());

    ParsedIncident {
        jurisdiction: field(1).map(|s| s.trim_matches(JURISDICTION_BRACKETS).to_owned()),
        category: field(2),
        datetime: field(3),
        location: field(4),
        status: field(5),
    }
}
