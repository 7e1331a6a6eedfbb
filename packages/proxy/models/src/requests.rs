//! Typed request bodies for the legacy upstream endpoints.
//!
//! The legacy pages expect slightly different field names per endpoint
//! (`username`, `usrname`, `user`, `account_no`). [`payload_for`] maps a
//! route id and a search value onto the right body.

use serde::{Deserialize, Serialize};

/// Body of the account information lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountLookupRequest {
    /// Account number.
    pub account_no: String,
    /// Serial; the upstream expects the account number here too.
    pub serial: String,
    /// Transaction name.
    pub trans: String,
    /// Realm-qualified user.
    pub user: String,
}

impl AccountLookupRequest {
    /// Builds the lookup body for an account number.
    #[must_use]
    pub fn new(account_number: &str) -> Self {
        Self {
            account_no: account_number.to_owned(),
            serial: account_number.to_owned(),
            trans: "viewdetails".to_owned(),
            user: format!("{account_number}@prepaid_fiber"),
        }
    }
}

/// Body of the voucher search and account verification calls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetailsCheckRequest {
    /// Transaction name.
    pub trans: String,
    /// Username, account number, or voucher code.
    pub username: String,
}

impl DetailsCheckRequest {
    /// Builds a `checkdetails` body.
    #[must_use]
    pub fn new(username: &str) -> Self {
        Self {
            trans: "checkdetails".to_owned(),
            username: username.to_owned(),
        }
    }
}

/// Body of the disconnect call. The field name is spelled `usrname`
/// upstream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisconnectRequest {
    /// Transaction name.
    pub trans: String,
    /// Account to disconnect.
    pub usrname: String,
}

impl DisconnectRequest {
    /// Builds a `disconnect` body.
    #[must_use]
    pub fn new(account_number: &str) -> Self {
        Self {
            trans: "disconnect".to_owned(),
            usrname: account_number.to_owned(),
        }
    }
}

/// Body of the retailer-account and reference-number lookups.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewDetailsRequest {
    /// Transaction name.
    pub trans: String,
    /// Retailer id or reference number.
    pub user: String,
}

impl ViewDetailsRequest {
    /// Builds a `viewdetails` body.
    #[must_use]
    pub fn new(user: &str) -> Self {
        Self {
            trans: "viewdetails".to_owned(),
            user: user.to_owned(),
        }
    }
}

/// JSON body for a legacy route id and search value.
///
/// Returns `None` for routes that do not take a single search value (the
/// voucher reprocess call takes a resolved payload instead).
#[must_use]
pub fn payload_for(endpoint_id: &str, query: &str) -> Option<serde_json::Value> {
    let value = match endpoint_id {
        "account-info" => serde_json::to_value(AccountLookupRequest::new(query)),
        "search-vouchers" | "verify" => serde_json::to_value(DetailsCheckRequest::new(query)),
        "disconnect" => serde_json::to_value(DisconnectRequest::new(query)),
        "retailer-account" | "check-refinstall" => {
            serde_json::to_value(ViewDetailsRequest::new(query))
        }
        _ => return None,
    };
    value.ok()
}
