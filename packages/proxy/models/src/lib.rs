#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Upstream endpoint definitions and API types for the back-office proxy.
//!
//! Each proxied route is described by an embedded TOML file (see
//! [`registry`]) naming the upstream host, the path to forward to, the
//! `Referer` the legacy pages expect, and how the response body is turned
//! into structured data.

pub mod registry;
pub mod requests;

use idss_extract_models::{ExtractedTable, KeyValueRecord, UpstreamStatus};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Upstream host family an endpoint is forwarded to.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Upstream {
    /// Legacy server-rendered PHP pages answering with HTML or text.
    Legacy,
    /// JSON API used for voucher reloads.
    Ibas,
}

/// How an endpoint's response body is turned into structured data.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Extraction {
    /// Relay the body untouched.
    #[default]
    None,
    /// Multi-table HTML, extracted with the named profile.
    Tables {
        /// Built-in extraction profile name.
        profile: String,
    },
    /// A single label/value detail table.
    KeyValue {
        /// Preferred table selector, falling back to the first table.
        #[serde(default)]
        selector: Option<String>,
    },
    /// Plain text ending in a `{"status": ...}` object.
    Status,
}

impl Extraction {
    /// Short name of the extraction kind.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Tables { .. } => "tables",
            Self::KeyValue { .. } => "key_value",
            Self::Status => "status",
        }
    }
}

/// A proxied upstream endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndpointDefinition {
    /// Route id, used as `/api/{id}`.
    pub id: String,
    /// What the endpoint does.
    pub description: String,
    /// Upstream host family.
    pub upstream: Upstream,
    /// Path appended to the upstream base URL.
    pub path: String,
    /// Path of the page the legacy upstream expects as `Referer`.
    #[serde(default)]
    pub referer: Option<String>,
    /// Response extraction.
    #[serde(default)]
    pub extraction: Extraction,
}

impl EndpointDefinition {
    /// Full upstream URL for `base` (no trailing slash expected).
    #[must_use]
    pub fn url(&self, base: &str) -> String {
        format!("{}{}", base.trim_end_matches('/'), self.path)
    }

    /// Full `Referer` URL for `base`, if the endpoint declares one.
    #[must_use]
    pub fn referer_url(&self, base: &str) -> Option<String> {
        self.referer
            .as_ref()
            .map(|path| format!("{}{path}", base.trim_end_matches('/')))
    }
}

/// Response of `GET /api/health`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiHealth {
    /// Always `true` while the server is answering.
    pub healthy: bool,
    /// Crate version.
    pub version: String,
}

/// Entry of `GET /api/endpoints`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiEndpoint {
    /// Route id.
    pub id: String,
    /// What the endpoint does.
    pub description: String,
    /// Upstream host family.
    pub upstream: Upstream,
    /// Extraction kind (`none`, `tables`, `key_value`, `status`).
    pub extraction: String,
}

impl From<&EndpointDefinition> for ApiEndpoint {
    fn from(def: &EndpointDefinition) -> Self {
        Self {
            id: def.id.clone(),
            description: def.description.clone(),
            upstream: def.upstream,
            extraction: def.extraction.kind().to_owned(),
        }
    }
}

/// Error body returned by the proxy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error message.
    pub error: String,
}

impl ApiError {
    /// Creates an error body from any displayable message.
    #[must_use]
    pub fn new(message: impl std::fmt::Display) -> Self {
        Self {
            error: message.to_string(),
        }
    }
}

/// Structured result of `POST /api/{endpoint}/extract`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ApiExtraction {
    /// Multi-table extraction.
    Tables {
        /// Extracted tables in document order.
        tables: Vec<ExtractedTable>,
    },
    /// Label/value extraction.
    Record {
        /// Extracted pairs in document order.
        record: KeyValueRecord,
    },
    /// Trailing status object, if present.
    Status {
        /// Parsed status.
        status: Option<UpstreamStatus>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_urls_from_base() {
        let def = EndpointDefinition {
            id: "verify".to_owned(),
            description: String::new(),
            upstream: Upstream::Legacy,
            path: "/check_user_details.php".to_owned(),
            referer: Some("/verify_account.php".to_owned()),
            extraction: Extraction::None,
        };
        assert_eq!(
            def.url("http://10.0.0.1/"),
            "http://10.0.0.1/check_user_details.php"
        );
        assert_eq!(
            def.referer_url("http://10.0.0.1").as_deref(),
            Some("http://10.0.0.1/verify_account.php")
        );
    }

    #[test]
    fn upstream_round_trips_through_strum() {
        assert_eq!(Upstream::Ibas.to_string(), "ibas");
        assert_eq!("legacy".parse::<Upstream>().unwrap(), Upstream::Legacy);
    }

    #[test]
    fn extraction_result_serializes_by_shape() {
        let json = serde_json::to_value(ApiExtraction::Tables { tables: Vec::new() }).unwrap();
        assert_eq!(json, serde_json::json!({ "tables": [] }));

        let json = serde_json::to_value(ApiExtraction::Status { status: None }).unwrap();
        assert_eq!(json, serde_json::json!({ "status": null }));
    }
}
