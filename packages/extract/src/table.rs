//! Table extractor.
//!
//! Walks every `<table>` in an HTML fragment and produces one
//! [`ExtractedTable`] per logical table. Headers are found with a fallback
//! chain, rows are read from every `<tr>` so that markup without `<tbody>`
//! still works, and the generic two-column placeholder table is dropped.

use std::sync::LazyLock;

use idss_extract_models::{ExtractedTable, is_generic_header_pair, synthesized_header};
use scraper::{ElementRef, Html, Selector};

use crate::profile::ExtractProfile;

static TABLE: LazyLock<Selector> = LazyLock::new(|| selector("table"));
static HEADER_SECTION_CELL: LazyLock<Selector> = LazyLock::new(|| selector("thead th"));
static HEADER_CELL: LazyLock<Selector> = LazyLock::new(|| selector("th"));
static ROW: LazyLock<Selector> = LazyLock::new(|| selector("tr"));
static DATA_CELL: LazyLock<Selector> = LazyLock::new(|| selector("td"));

/// Parses one of the constant selectors above.
fn selector(css: &str) -> Selector {
    Selector::parse(css).unwrap_or_else(|e| panic!("invalid built-in selector '{css}': {e}"))
}

/// Where a table's headers came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HeaderSource {
    /// `<th>` cells inside `<thead>`.
    HeaderSection,
    /// `<th>` cells anywhere in the table.
    AnyHeaderCell,
    /// `<td>` cells of the first row.
    FirstRow,
    /// Nothing usable; headers are synthesized after row extraction.
    Synthesized,
}

struct DetectedHeaders<'a> {
    source: HeaderSource,
    headers: Vec<String>,
    /// Row whose cells became the headers and must not be read as data.
    consumed_row: Option<ElementRef<'a>>,
}

/// Extracts all tables from `html` in document order.
///
/// Never fails: input without parseable table markup yields an empty
/// vector.
#[must_use]
pub fn extract_tables(html: &str, profile: &ExtractProfile) -> Vec<ExtractedTable> {
    let document = Html::parse_document(html);

    let tables: Vec<ExtractedTable> = document
        .select(&TABLE)
        .enumerate()
        .filter_map(|(index, table)| extract_table(table, index, profile))
        .collect();

    log::debug!(
        "[{}] extracted {} table(s) from {} bytes of HTML",
        profile.name,
        tables.len(),
        html.len()
    );

    tables
}

fn extract_table(
    table: ElementRef<'_>,
    index: usize,
    profile: &ExtractProfile,
) -> Option<ExtractedTable> {
    let DetectedHeaders {
        source,
        mut headers,
        consumed_row,
    } = detect_headers(table, profile);

    let rows = extract_rows(table, &headers, consumed_row);

    if headers.is_empty()
        && let Some(first) = rows.first()
    {
        headers = synthesize_headers(first.len());
    }

    log::debug!(
        "[{}] table {index}: {source:?} headers {headers:?}, {} row(s)",
        profile.name,
        rows.len()
    );

    let extracted = ExtractedTable {
        title: profile.title_for(index),
        headers,
        rows,
    };

    if extracted.is_generic_placeholder() {
        log::debug!("[{}] table {index}: dropping generic placeholder", profile.name);
        return None;
    }

    profile
        .inclusion
        .keeps(extracted.headers.len(), extracted.rows.len())
        .then_some(extracted)
}

/// Runs the header fallback chain.
///
/// The first strategy that finds any header cells wins, even when every
/// cell is blank or a noise label. The first-row strategy only counts once
/// it yields a header, since its row is then taken out of the data.
fn detect_headers<'a>(table: ElementRef<'a>, profile: &ExtractProfile) -> DetectedHeaders<'a> {
    if let Some(headers) = header_texts(table.select(&HEADER_SECTION_CELL), profile) {
        return DetectedHeaders {
            source: HeaderSource::HeaderSection,
            headers,
            consumed_row: None,
        };
    }

    if let Some(headers) = header_texts(table.select(&HEADER_CELL), profile) {
        return DetectedHeaders {
            source: HeaderSource::AnyHeaderCell,
            headers,
            consumed_row: None,
        };
    }

    if let Some(first_row) = table.select(&ROW).next()
        && let Some(headers) = header_texts(first_row.select(&DATA_CELL), profile)
        && !headers.is_empty()
    {
        return DetectedHeaders {
            source: HeaderSource::FirstRow,
            headers,
            consumed_row: Some(first_row),
        };
    }

    DetectedHeaders {
        source: HeaderSource::Synthesized,
        headers: Vec::new(),
        consumed_row: None,
    }
}

/// Trimmed texts of `cells`, minus blanks and the profile's noise labels.
///
/// Returns `None` when there are no cells at all.
fn header_texts<'a>(
    cells: impl Iterator<Item = ElementRef<'a>>,
    profile: &ExtractProfile,
) -> Option<Vec<String>> {
    let mut cells = cells.peekable();
    cells.peek()?;

    Some(
        cells
            .map(cell_text)
            .filter(|text| !text.is_empty() && !profile.is_noise_label(text))
            .collect(),
    )
}

fn extract_rows(
    table: ElementRef<'_>,
    headers: &[String],
    consumed_row: Option<ElementRef<'_>>,
) -> Vec<Vec<String>> {
    let generic = is_generic_header_pair(headers);

    table
        .select(&ROW)
        .filter(|row| Some(*row) != consumed_row)
        .map(|row| row.select(&DATA_CELL).map(cell_text).collect::<Vec<_>>())
        .filter(|cells| cells.iter().any(|cell| !cell.is_empty()))
        .filter(|cells| !(generic && cells.len() == 2))
        .collect()
}

fn synthesize_headers(width: usize) -> Vec<String> {
    (1..=width).map(synthesized_header).collect()
}

/// Concatenated descendant text of an element, trimmed.
pub(crate) fn cell_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::{InclusionPolicy, builtin};

    fn account() -> ExtractProfile {
        builtin("account").unwrap()
    }

    #[test]
    fn no_tables_yields_empty() {
        assert!(extract_tables("<div><p>No records found</p></div>", &account()).is_empty());
        assert!(extract_tables("", &account()).is_empty());
        assert!(extract_tables("plain text, not markup", &account()).is_empty());
    }

    #[test]
    fn malformed_markup_does_not_fail() {
        let tables = extract_tables("<table><tr><td>A<td>B</tr><tr><td>1</td>", &account());
        assert_eq!(tables.len(), 1);
        assert_eq!(tables[0].headers, vec!["A", "B"]);
        assert_eq!(tables[0].rows, vec![vec!["1"]]);
    }

    #[test]
    fn thead_headers_and_tbody_rows() {
        let html = "<table><thead><tr><th>Name</th><th>Status</th></tr></thead>\
                    <tbody><tr><td>John</td><td>Active</td></tr></tbody></table>";
        let tables = extract_tables(html, &account());

        assert_eq!(
            tables,
            vec![ExtractedTable {
                title: "Account Information".to_owned(),
                headers: vec!["Name".to_owned(), "Status".to_owned()],
                rows: vec![vec!["John".to_owned(), "Active".to_owned()]],
            }]
        );
    }

    #[test]
    fn noise_label_is_excluded_from_headers() {
        let html = "<table><thead><tr>\
                    <th> Account Information </th><th>Plan</th><th>Speed</th>\
                    </tr></thead>\
                    <tbody><tr><td>Fiber 1699</td><td>100 Mbps</td></tr></tbody></table>";
        let tables = extract_tables(html, &account());
        assert_eq!(tables[0].headers, vec!["Plan", "Speed"]);
    }

    #[test]
    fn header_cells_outside_thead() {
        let html = "<table><tr><th>Username</th><th>Expiry</th></tr>\
                    <tr><td>acc01</td><td>2025-01-31</td></tr></table>";
        let tables = extract_tables(html, &account());
        assert_eq!(tables[0].headers, vec!["Username", "Expiry"]);
        assert_eq!(tables[0].rows, vec![vec!["acc01", "2025-01-31"]]);
    }

    #[test]
    fn first_row_becomes_headers_and_is_not_repeated() {
        let html = "<table><tr><td>Serial</td><td>MAC</td><td>Status</td></tr>\
                    <tr><td>ZTE123</td><td>AA:BB</td><td>Online</td></tr></table>";
        let tables = extract_tables(html, &account());
        assert_eq!(tables[0].headers, vec!["Serial", "MAC", "Status"]);
        assert_eq!(tables[0].rows, vec![vec!["ZTE123", "AA:BB", "Online"]]);
    }

    #[test]
    fn synthesizes_headers_from_first_row_width() {
        let html = "<table><tr><td></td><td>&nbsp;</td></tr>\
                    <tr><td>a</td><td>b</td><td>c</td></tr>\
                    <tr><td>d</td></tr></table>";
        let tables = extract_tables(html, &account());
        assert_eq!(tables[0].headers, vec!["Column 1", "Column 2", "Column 3"]);
        assert_eq!(tables[0].rows, vec![vec!["a", "b", "c"], vec!["d"]]);
    }

    #[test]
    fn placeholder_header_row_drops_table() {
        let html = "<table><tr><td>Column 1</td><td>Column 2</td></tr></table>";
        assert!(extract_tables(html, &account()).is_empty());
    }

    #[test]
    fn placeholder_drops_table_regardless_of_rows() {
        let html = "<table><thead><tr><th>Column 1</th><th>Column 2</th></tr></thead>\
                    <tbody><tr><td>x</td><td>y</td></tr>\
                    <tr><td>1</td><td>2</td><td>3</td></tr></tbody></table>";
        assert!(extract_tables(html, &account()).is_empty());
    }

    #[test]
    fn synthesized_two_column_table_is_dropped() {
        let html = "<table><tr><td> </td></tr><tr><td>k</td><td>v</td></tr></table>";
        assert!(extract_tables(html, &account()).is_empty());
    }

    #[test]
    fn empty_rows_are_dropped() {
        let html = "<table><thead><tr><th>A</th><th>B</th></tr></thead>\
                    <tbody><tr><td> </td><td></td></tr>\
                    <tr><td>1</td><td></td></tr></tbody></table>";
        let tables = extract_tables(html, &account());
        assert_eq!(tables[0].rows, vec![vec!["1", ""]]);
    }

    #[test]
    fn ragged_rows_are_kept_as_is() {
        let html = "<table><thead><tr><th>A</th><th>B</th></tr></thead>\
                    <tbody><tr><td>1</td></tr>\
                    <tr><td>1</td><td>2</td><td>3</td></tr></tbody></table>";
        let tables = extract_tables(html, &account());
        assert_eq!(tables[0].rows, vec![vec!["1"], vec!["1", "2", "3"]]);
    }

    #[test]
    fn titles_follow_document_position() {
        let html = "<table><tr><td>Column 1</td><td>Column 2</td></tr></table>\
                    <table><tr><th>A</th></tr><tr><td>1</td></tr></table>\
                    <table><tr><th>B</th></tr><tr><td>2</td></tr></table>";
        let tables = extract_tables(html, &account());
        let titles: Vec<&str> = tables.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, vec!["Additional Details", "Details 3"]);
    }

    #[test]
    fn lenient_policy_keeps_header_only_tables() {
        let html = "<table><thead><tr><th>Session</th><th>NAS</th></tr></thead></table>";
        let tables = extract_tables(html, &builtin("verification").unwrap());
        assert_eq!(tables.len(), 1);
        assert_eq!(tables[0].title, "Account Status");
        assert!(tables[0].rows.is_empty());
    }

    #[test]
    fn require_rows_policy_drops_header_only_tables() {
        let profile = ExtractProfile {
            inclusion: InclusionPolicy::RequireRows,
            ..ExtractProfile::generic()
        };
        let html = "<table><thead><tr><th>Session</th></tr></thead></table>\
                    <table><thead><tr><th>PIN</th></tr></thead>\
                    <tbody><tr><td>1</td></tr></tbody></table>";
        let tables = extract_tables(html, &profile);
        assert_eq!(tables.len(), 1);
        assert_eq!(tables[0].title, "Details 2");
    }

    #[test]
    fn extraction_is_idempotent() {
        let html = "<table><tr><th>A</th><th>B</th></tr><tr><td>1</td><td>2</td></tr></table>\
                    <table><tr><td>x</td><td>y</td><td>z</td></tr></table>";
        let profile = builtin("voucher").unwrap();
        assert_eq!(extract_tables(html, &profile), extract_tables(html, &profile));
    }

    #[test]
    fn cell_text_flattens_nested_markup() {
        let html = "<table><tr><th>Status</th></tr>\
                    <tr><td>\n  <span class=\"ok\"><b>Active</b> since</span> 2024\n</td></tr>\
                    </table>";
        let tables = extract_tables(html, &account());
        assert_eq!(tables[0].rows, vec![vec!["Active since 2024"]]);
    }

    #[test]
    fn noise_only_thead_does_not_fall_through_to_body_header_cells() {
        let html = "<table><thead><tr><th>Account Information</th></tr></thead>\
                    <tbody><tr><th>Plan</th><td>Fiber</td></tr>\
                    <tr><th>Speed</th><td>100</td></tr></tbody></table>";
        let tables = extract_tables(html, &account());
        assert_eq!(tables[0].headers, vec!["Column 1"]);
        assert_eq!(tables[0].rows, vec![vec!["Fiber"], vec!["100"]]);
    }

    #[test]
    fn noise_only_header_cell_keeps_first_row_as_data() {
        let html = "<table>\
                    <tr><th>Account Information</th><td>Plan</td><td>Speed</td><td>Port</td></tr>\
                    <tr><td>Fiber</td><td>100</td><td>1</td></tr></table>";
        let tables = extract_tables(html, &account());
        assert_eq!(tables[0].headers, vec!["Column 1", "Column 2", "Column 3"]);
        assert_eq!(
            tables[0].rows,
            vec![vec!["Plan", "Speed", "Port"], vec!["Fiber", "100", "1"]]
        );
    }

    #[test]
    fn noise_label_is_excluded_from_body_header_cells() {
        let html = "<table><tr><th>Account Information</th><th>Plan</th></tr>\
                    <tr><td>Fiber</td></tr></table>";
        let tables = extract_tables(html, &account());
        assert_eq!(tables[0].headers, vec!["Plan"]);
        assert_eq!(tables[0].rows, vec![vec!["Fiber"]]);
    }

    #[test]
    fn noise_label_is_excluded_from_first_row_headers() {
        let html = "<table><tr><td>Account Information</td><td>Plan</td><td>Speed</td></tr>\
                    <tr><td>Fiber</td><td>100</td></tr></table>";
        let tables = extract_tables(html, &account());
        assert_eq!(tables[0].headers, vec!["Plan", "Speed"]);
        assert_eq!(tables[0].rows, vec![vec!["Fiber", "100"]]);
    }

    #[test]
    fn noise_only_first_row_is_not_consumed() {
        let html = "<table><tr><td>Account Information</td></tr>\
                    <tr><td>a</td><td>b</td><td>c</td></tr></table>";
        let tables = extract_tables(html, &account());
        assert_eq!(tables[0].headers, vec!["Column 1"]);
        assert_eq!(
            tables[0].rows,
            vec![vec!["Account Information"], vec!["a", "b", "c"]]
        );
    }
}
