//! Label/value detail tables.
//!
//! The retailer-account and reference/installation lookups answer with a
//! single table whose rows are `<td>Label :</td><td>Value</td>` pairs. These
//! are read into an ordered [`KeyValueRecord`] instead of a header/row grid.

use std::sync::LazyLock;

use idss_extract_models::KeyValueRecord;
use scraper::{Html, Selector};

use crate::ExtractError;
use crate::table::cell_text;

static TABLE: LazyLock<Selector> = LazyLock::new(|| selector("table"));
static BODY_ROW: LazyLock<Selector> = LazyLock::new(|| selector("tbody tr"));
static DATA_CELL: LazyLock<Selector> = LazyLock::new(|| selector("td"));

fn selector(css: &str) -> Selector {
    Selector::parse(css).unwrap_or_else(|e| panic!("invalid built-in selector '{css}': {e}"))
}

/// Extracts label/value pairs from the first detail table in `html`.
///
/// When `preferred` is given, the first table matching that selector is
/// used if present; otherwise the first `<table>` in the document. No table
/// yields an empty record.
///
/// # Errors
///
/// Returns [`ExtractError::Selector`] if `preferred` is not a valid CSS
/// selector.
pub fn extract_key_value(
    html: &str,
    preferred: Option<&str>,
) -> Result<KeyValueRecord, ExtractError> {
    let preferred = preferred
        .map(|css| {
            Selector::parse(css).map_err(|e| ExtractError::Selector {
                selector: css.to_owned(),
                message: e.to_string(),
            })
        })
        .transpose()?;

    let document = Html::parse_document(html);
    let table = preferred
        .as_ref()
        .and_then(|sel| document.select(sel).next())
        .or_else(|| document.select(&TABLE).next());

    let mut record = KeyValueRecord::new();
    let Some(table) = table else {
        log::debug!("No detail table found in {} bytes of HTML", html.len());
        return Ok(record);
    };

    for row in table.select(&BODY_ROW) {
        let mut cells = row.select(&DATA_CELL).map(cell_text);
        let (Some(label), Some(value)) = (cells.next(), cells.next()) else {
            continue;
        };
        let key = normalize_label(&label);
        if key.is_empty() {
            continue;
        }
        record.insert(key.to_owned(), value);
    }

    log::debug!("Extracted {} detail field(s)", record.len());
    Ok(record)
}

/// Strips a trailing colon, and the whitespace around it, from a row label.
fn normalize_label(label: &str) -> &str {
    let label = label.trim();
    label.strip_suffix(':').map_or(label, str::trim_end)
}

#[cfg(test)]
mod tests {
    use super::*;

    const RETAILER_HTML: &str = r#"
        <table class="details">
          <tr><td>Retailer Id :</td><td>R-1001</td></tr>
          <tr><td>Retailer Name :</td><td>Juan Store</td></tr>
          <tr><td>Dealer ID :</td><td></td></tr>
          <tr><td colspan="2">Wallets</td></tr>
          <tr><td>Distributor loadWallet :</td><td>1,500.00</td></tr>
        </table>
    "#;

    #[test]
    fn reads_label_value_rows() {
        let record = extract_key_value(RETAILER_HTML, None).unwrap();
        assert_eq!(record.len(), 4);
        assert_eq!(record.get("Retailer Id"), Some("R-1001"));
        assert_eq!(record.get("Retailer Name"), Some("Juan Store"));
        assert_eq!(record.get("Distributor loadWallet"), Some("1,500.00"));
        assert_eq!(record.displayable().count(), 3);
    }

    #[test]
    fn prefers_selected_table() {
        let html = r#"
            <table><tr><td>Banner:</td><td>ignored</td></tr></table>
            <table id="service1">
              <tbody>
                <tr><td>Reference No:</td><td>S2S-77</td><td>extra</td></tr>
                <tr><td>Install Date:  </td><td>-</td></tr>
                <tr><td> </td><td>orphan</td></tr>
              </tbody>
            </table>
        "#;
        let record = extract_key_value(html, Some("table#service1")).unwrap();
        let keys: Vec<&str> = record.iter().map(|e| e.key.as_str()).collect();
        assert_eq!(keys, vec!["Reference No", "Install Date"]);
        assert_eq!(record.displayable().count(), 1);
    }

    #[test]
    fn falls_back_to_first_table() {
        let html = "<table><tr><td>Status:</td><td>Active</td></tr></table>";
        let record = extract_key_value(html, Some("table#service1")).unwrap();
        assert_eq!(record.get("Status"), Some("Active"));
    }

    #[test]
    fn no_table_is_empty_record() {
        assert!(extract_key_value("<p>nothing</p>", None).unwrap().is_empty());
    }

    #[test]
    fn invalid_selector_is_reported() {
        assert!(matches!(
            extract_key_value("<table></table>", Some("table[")),
            Err(ExtractError::Selector { .. })
        ));
    }

    #[test]
    fn normalizes_labels() {
        assert_eq!(normalize_label(" Retailer Id : "), "Retailer Id");
        assert_eq!(normalize_label("Plan"), "Plan");
        assert_eq!(normalize_label("Ratio: 1:2"), "Ratio: 1:2");
    }
}
