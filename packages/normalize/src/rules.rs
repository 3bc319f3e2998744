//! Ordered location rewrite rules.
//!
//! Each rule is a pure string rewrite. Three chains run in sequence:
//! [`LOCATION_RULES`] produce the location shown on the map,
//! [`LOCALITY_RULES`] cut it at the first venue word, and [`ADDRESS_RULES`]
//! reduce the locality to the `city + district` granularity of the reference
//! address table. The trailing-character trim and the known-mismatch fix
//! only see the text left after qualifier truncation.

/// Kanji numerals indexed by digit value.
pub const KANJI_DIGITS: [char; 10] = ['〇', '一', '二', '三', '四', '五', '六', '七', '八', '九'];

/// Venue and location-type words. Everything from the first occurrence of
/// any of them to the end of the location is discarded.
pub const QUALIFIER_WORDS: &[&str] = &[
    "路上",
    "施設",
    "店舗",
    "付近",
    "一般住宅",
    "住宅",
    "アパート",
    "マンション",
    "公園",
    "屋外",
    "緑地",
    "駐輪場",
    "駐車場",
    "河川敷",
    "児童",
];

/// Ordinal markers and the possessive particle left dangling once a
/// qualifier is cut off.
pub const TRAILING_CHARS: &[char] = &['甲', '乙', '丙', 'の'];

/// A single location rewrite.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RewriteRule {
    /// Replaces every occurrence of `from` with `to`.
    Replace {
        /// Text to look for.
        from: &'static str,
        /// Replacement text.
        to: &'static str,
    },
    /// Maps ASCII and full-width digits to [`KANJI_DIGITS`].
    TranslateDigits,
    /// Truncates at the first [`QUALIFIER_WORDS`] occurrence.
    TruncateAtQualifier,
    /// Strips any run of the given characters from the end.
    TrimEnd(&'static [char]),
}

/// Rules producing the displayed location.
pub const LOCATION_RULES: &[RewriteRule] = &[
    // 常磐 is a misspelling of the 常盤 district names.
    RewriteRule::Replace {
        from: "常磐",
        to: "常盤",
    },
    RewriteRule::TranslateDigits,
];

/// Rules cutting a cleaned location down to its locality.
pub const LOCALITY_RULES: &[RewriteRule] = &[RewriteRule::TruncateAtQualifier];

/// Rules reducing a locality to a reference table join key.
pub const ADDRESS_RULES: &[RewriteRule] = &[
    RewriteRule::TrimEnd(TRAILING_CHARS),
    // The reference table has no 字北新田 entry under 新田.
    RewriteRule::Replace {
        from: "西条市新田字北新田",
        to: "西条市新田",
    },
];

impl RewriteRule {
    /// Applies this rule to `input`.
    #[must_use]
    pub fn apply(&self, input: &str) -> String {
        match self {
            Self::Replace { from, to } => input.replace(*from, to),
            Self::TranslateDigits => input.chars().map(translate_digit).collect(),
            Self::TruncateAtQualifier => truncate_at_qualifier(input).to_owned(),
            Self::TrimEnd(chars) => input.trim_end_matches(*chars).to_owned(),
        }
    }

    /// Short name used in trace logging.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Replace { .. } => "replace",
            Self::TranslateDigits => "translate_digits",
            Self::TruncateAtQualifier => "truncate_at_qualifier",
            Self::TrimEnd(_) => "trim_end",
        }
    }
}

/// Applies `rules` to `input` in order.
#[must_use]
pub fn apply_rules(rules: &[RewriteRule], input: &str) -> String {
    rules.iter().fold(input.to_owned(), |acc, rule| {
        let out = rule.apply(&acc);
        if out != acc {
            log::trace!("{}: '{acc}' -> '{out}'", rule.name());
        }
        out
    })
}

fn translate_digit(c: char) -> char {
    let value = match c {
        '0'..='9' => c as u32 - '0' as u32,
        '０'..='９' => c as u32 - '０' as u32,
        _ => return c,
    };
    KANJI_DIGITS[value as usize]
}

fn truncate_at_qualifier(input: &str) -> &str {
    QUALIFIER_WORDS
        .iter()
        .filter_map(|word| input.find(word))
        .min()
        .map_or(input, |idx| &input[..idx])
}
