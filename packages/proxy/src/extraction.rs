//! Applies an endpoint's configured extraction to a response body.

use idss_extract::key_value::extract_key_value;
use idss_extract::profile::require_builtin;
use idss_extract::status::parse_trailing_status;
use idss_extract::table::extract_tables;
use idss_proxy_models::{ApiExtraction, Extraction};

use crate::ProxyError;

/// Runs `extraction` over `body`.
///
/// Returns `Ok(None)` for endpoints whose bodies are relayed untouched.
///
/// # Errors
///
/// Returns [`ProxyError::Extract`] if the endpoint names an unknown profile
/// or an invalid selector.
pub fn apply(extraction: &Extraction, body: &str) -> Result<Option<ApiExtraction>, ProxyError> {
    Ok(match extraction {
        Extraction::None => None,
        Extraction::Tables { profile } => {
            let profile = require_builtin(profile)?;
            Some(ApiExtraction::Tables {
                tables: extract_tables(body, &profile),
            })
        }
        Extraction::KeyValue { selector } => Some(ApiExtraction::Record {
            record: extract_key_value(body, selector.as_deref())?,
        }),
        Extraction::Status => Some(ApiExtraction::Status {
            status: parse_trailing_status(body),
        }),
    })
}
