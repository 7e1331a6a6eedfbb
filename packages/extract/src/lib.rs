#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! HTML table extraction for legacy back-office responses.
//!
//! The account, voucher, and verification endpoints return inconsistently
//! shaped, server-rendered HTML. This crate turns those fragments into
//! [`ExtractedTable`] records ([`table`]), locates semantic fields inside
//! them by fuzzy header matching ([`resolve`]), and builds the follow-up
//! voucher reprocess payload ([`voucher`]). Single label/value detail
//! tables are handled by [`key_value`] and the trailing status objects of
//! plain-text responses by [`status`].
//!
//! Everything here is a pure function of its input string: parsing never
//! fails, and malformed or table-less input yields empty results.

pub mod key_value;
pub mod profile;
pub mod resolve;
pub mod status;
pub mod table;
pub mod voucher;

pub use idss_extract_models::{
    ExtractedTable, KeyValueEntry, KeyValueRecord, ReprocessRequest, ReprocessResponse,
    UpstreamStatus,
};
pub use profile::{ExtractProfile, InclusionPolicy};
pub use resolve::{FieldSpec, resolve_field};
pub use table::extract_tables;

/// Errors raised around the extraction layer.
///
/// Extraction itself never fails; these cover caller-supplied
/// configuration and recoverable "data not present" conditions.
#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    /// A profile definition could not be parsed.
    #[error("Invalid profile: {0}")]
    Profile(#[from] toml::de::Error),

    /// No built-in profile has the requested name.
    #[error("Unknown profile: {0}")]
    UnknownProfile(String),

    /// A CSS selector supplied by the caller is invalid.
    #[error("Invalid selector '{selector}': {message}")]
    Selector {
        /// The rejected selector.
        selector: String,
        /// Parser message.
        message: String,
    },

    /// One or more required fields were not found in the extracted tables.
    #[error("Could not find {} in the extracted tables", .fields.join(" or "))]
    MissingFields {
        /// Names of the fields that resolved to nothing.
        fields: Vec<String>,
    },
}
