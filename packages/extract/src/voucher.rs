//! Voucher reprocess payload resolution.
//!
//! After a PIN/voucher search the extracted tables carry the account that
//! used the voucher and the PIN itself. Both are required to build the
//! reload request sent to the reprocessing API.

use idss_extract_models::{ExtractedTable, ReprocessRequest};

use crate::ExtractError;
use crate::resolve::{FieldSpec, resolve_field};

/// Builds the reprocess payload from voucher search tables.
///
/// # Errors
///
/// Returns [`ExtractError::MissingFields`] naming every field that could
/// not be resolved.
pub fn resolve_reprocess_request(
    tables: &[ExtractedTable],
) -> Result<ReprocessRequest, ExtractError> {
    let account_spec = FieldSpec::account_number();
    let pin_spec = FieldSpec::pin();

    let account_number = resolve_field(tables, &account_spec);
    let pin = resolve_field(tables, &pin_spec);

    match (account_number, pin) {
        (Some(account_number), Some(pin)) => {
            log::info!("Resolved voucher reprocess: account {account_number}, PIN {pin}");
            Ok(ReprocessRequest {
                account_number: account_number.to_owned(),
                pins: pin.to_owned(),
            })
        }
        (account_number, pin) => {
            let fields: Vec<String> = [(account_number, account_spec), (pin, pin_spec)]
                .into_iter()
                .filter(|(value, _)| value.is_none())
                .map(|(_, spec)| spec.name)
                .collect();
            log::warn!("Voucher details incomplete, missing: {}", fields.join(", "));
            Err(ExtractError::MissingFields { fields })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::builtin;
    use crate::table::extract_tables;

    const VOUCHER_HTML: &str = r#"
        <html><body>
        <table class="tbl">
          <thead><tr><th>Voucher Pin</th><th>Status</th><th>Used By</th></tr></thead>
          <tbody><tr><td>998877</td><td>USED</td><td>ACC12345</td></tr></tbody>
        </table>
        <table><tr><td>Column 1</td><td>Column 2</td></tr></table>
        </body></html>
    "#;

    #[test]
    fn resolves_from_voucher_search_html() {
        let tables = extract_tables(VOUCHER_HTML, &builtin("voucher").unwrap());
        let request = resolve_reprocess_request(&tables).unwrap();
        assert_eq!(
            request,
            ReprocessRequest {
                account_number: "ACC12345".to_owned(),
                pins: "998877".to_owned(),
            }
        );
    }

    #[test]
    fn reports_every_missing_field() {
        let err = resolve_reprocess_request(&[]).unwrap_err();
        match err {
            ExtractError::MissingFields { fields } => {
                assert_eq!(fields, vec!["account number", "PIN"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn unused_voucher_is_missing_account() {
        let tables = vec![ExtractedTable {
            title: "Voucher Information".to_owned(),
            headers: vec!["PIN".to_owned(), "Used By".to_owned()],
            rows: vec![vec!["4455".to_owned(), "No Value".to_owned()]],
        }];
        let err = resolve_reprocess_request(&tables).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Could not find account number in the extracted tables"
        );
    }
}
