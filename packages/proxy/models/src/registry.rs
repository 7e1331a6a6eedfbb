//! Compile-time registry of proxied upstream endpoints.
//!
//! Each entry is a `(name, toml_content)` pair embedded via `include_str!`.
//! Adding an endpoint means adding a TOML file under `endpoints/` and an
//! entry here.

use crate::EndpointDefinition;

/// Number of registered endpoints. Enforced by a test.
#[cfg(test)]
const EXPECTED_ENDPOINT_COUNT: usize = 7;

/// Embedded TOML endpoint definitions.
const ENDPOINT_TOMLS: &[(&str, &str)] = &[
    ("account_info", include_str!("../endpoints/account_info.toml")),
    ("disconnect", include_str!("../endpoints/disconnect.toml")),
    ("verify", include_str!("../endpoints/verify.toml")),
    (
        "search_vouchers",
        include_str!("../endpoints/search_vouchers.toml"),
    ),
    (
        "reprocess_voucher",
        include_str!("../endpoints/reprocess_voucher.toml"),
    ),
    (
        "retailer_account",
        include_str!("../endpoints/retailer_account.toml"),
    ),
    (
        "check_refinstall",
        include_str!("../endpoints/check_refinstall.toml"),
    ),
];

/// Returns all registered endpoints.
///
/// # Panics
///
/// Panics if any embedded TOML file fails to parse. Since these are
/// compile-time constants, parse failures indicate a development error
/// and are caught by the tests.
#[must_use]
pub fn all_endpoints() -> Vec<EndpointDefinition> {
    ENDPOINT_TOMLS
        .iter()
        .map(|(name, toml_str)| {
            toml::de::from_str(toml_str)
                .unwrap_or_else(|e| panic!("Failed to parse endpoint '{name}': {e}"))
        })
        .collect()
}

/// Looks up an endpoint by route id.
#[must_use]
pub fn find_endpoint(id: &str) -> Option<EndpointDefinition> {
    all_endpoints().into_iter().find(|e| e.id == id)
}
