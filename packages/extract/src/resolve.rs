//! Field resolver.
//!
//! Locates a semantic value (an account number, a voucher PIN) inside
//! already-extracted tables by case-insensitive substring matching against
//! column headers.
//!
//! Matching is first-match-wins in document order: tables in extraction
//! order, rows in order, cells left to right. Several headers can share a
//! needle ("Voucher Code" and "Access Code" both contain `code`), in which
//! case the leftmost column of the earliest row wins.

use idss_extract_models::ExtractedTable;

/// Cell values that mean "no data" in the legacy responses.
const ABSENT_SENTINELS: &[&str] = &["N/A", "No Value"];

/// A semantic field identified by header-name substrings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpec {
    /// Human-readable field name, used in "missing data" messages.
    pub name: String,
    /// Lower-case substrings; a header matching any of them is a candidate.
    pub needles: Vec<String>,
}

impl FieldSpec {
    /// Creates a field spec. Needles are lower-cased.
    #[must_use]
    pub fn new(name: &str, needles: &[&str]) -> Self {
        Self {
            name: name.to_owned(),
            needles: needles.iter().map(|n| n.to_lowercase()).collect(),
        }
    }

    /// The account a voucher was used by.
    #[must_use]
    pub fn account_number() -> Self {
        Self::new("account number", &["used by"])
    }

    /// The voucher PIN.
    #[must_use]
    pub fn pin() -> Self {
        Self::new("PIN", &["pin", "voucher", "code"])
    }

    /// Returns `true` if `header` contains any needle, ignoring case.
    #[must_use]
    pub fn matches_header(&self, header: &str) -> bool {
        let header = header.to_lowercase();
        self.needles.iter().any(|needle| header.contains(needle.as_str()))
    }
}

/// Returns `true` for blank cells and the legacy "absent" sentinels.
#[must_use]
pub fn is_absent_value(value: &str) -> bool {
    let value = value.trim();
    value.is_empty() || ABSENT_SENTINELS.contains(&value)
}

/// Finds the first present cell whose column header matches `field`.
///
/// Cells beyond a table's header width have no header and never match.
/// Returns `None` when nothing matches; callers treat that as recoverable
/// missing data.
#[must_use]
pub fn resolve_field<'a>(tables: &'a [ExtractedTable], field: &FieldSpec) -> Option<&'a str> {
    let found = tables.iter().find_map(|table| {
        (0..table.rows.len()).find_map(|row| {
            table
                .labelled_row(row)
                .find(|(header, value)| {
                    header.is_some_and(|h| field.matches_header(h)) && !is_absent_value(value)
                })
                .map(|(_, value)| value)
        })
    });

    match found {
        Some(value) => log::debug!("Resolved {} = {value:?}", field.name),
        None => log::debug!("No value found for {}", field.name),
    }

    found
}
