#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Structured records produced from legacy back-office responses.
//!
//! The upstream account, voucher, and verification endpoints answer with
//! server-rendered HTML. The extraction layer turns those fragments into the
//! types defined here, which are serialized to JSON for the proxy API and
//! the CLI.

use serde::{Deserialize, Serialize};

/// Header synthesized for one-based `column` of a table without header
/// markup.
#[must_use]
pub fn synthesized_header(column: usize) -> String {
    format!("Column {column}")
}

/// One logical table scraped from an HTML response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedTable {
    /// Display title assigned by the table's position in the document.
    pub title: String,
    /// Column names, possibly synthesized as `Column 1..N`.
    pub headers: Vec<String>,
    /// Body rows. Widths are not guaranteed to match `headers`.
    pub rows: Vec<Vec<String>>,
}

impl ExtractedTable {
    /// Returns `true` when the headers are exactly `["Column 1", "Column 2"]`.
    #[must_use]
    pub fn is_generic_placeholder(&self) -> bool {
        is_generic_header_pair(&self.headers)
    }

    /// Header for the given column, if the table has one that wide.
    #[must_use]
    pub fn header(&self, column: usize) -> Option<&str> {
        self.headers.get(column).map(String::as_str)
    }

    /// Iterates `(header, value)` pairs of one row by position.
    ///
    /// Cells past the header width are paired with `None`; headers past the
    /// row width are skipped.
    pub fn labelled_row(&self, row: usize) -> impl Iterator<Item = (Option<&str>, &str)> {
        self.rows
            .get(row)
            .into_iter()
            .flatten()
            .enumerate()
            .map(|(column, value)| (self.header(column), value.as_str()))
    }
}

/// Returns `true` for the synthesized two-column header pair.
#[must_use]
pub fn is_generic_header_pair(headers: &[String]) -> bool {
    matches!(
        headers,
        [first, second] if *first == synthesized_header(1) && *second == synthesized_header(2)
    )
}

/// A single label/value pair from a two-column detail table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyValueEntry {
    /// Row label with any trailing colon removed.
    pub key: String,
    /// Row value.
    pub value: String,
}

/// Ordered label/value record, as returned by the retailer and reference
/// lookups.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KeyValueRecord {
    entries: Vec<KeyValueEntry>,
}

impl KeyValueRecord {
    /// Creates an empty record.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Inserts a pair. A repeated key overwrites the earlier value but keeps
    /// its original position.
    pub fn insert(&mut self, key: String, value: String) {
        if let Some(existing) = self.entries.iter_mut().find(|e| e.key == key) {
            existing.value = value;
        } else {
            self.entries.push(KeyValueEntry { key, value });
        }
    }

    /// Looks up a value by exact key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| e.key == key)
            .map(|e| e.value.as_str())
    }

    /// Iterates entries in document order.
    pub fn iter(&self) -> impl Iterator<Item = &KeyValueEntry> {
        self.entries.iter()
    }

    /// Entries whose value carries information (not blank and not `-`).
    pub fn displayable(&self) -> impl Iterator<Item = &KeyValueEntry> {
        self.entries.iter().filter(|e| {
            let value = e.value.trim();
            !value.is_empty() && value != "-"
        })
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` when no entries were extracted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Outbound payload for the voucher reprocessing API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReprocessRequest {
    /// Account the voucher was used by.
    pub account_number: String,
    /// Voucher PIN to reload.
    pub pins: String,
}

/// Response body of the voucher reprocessing API.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReprocessResponse {
    /// `"success"` on a successful reload.
    #[serde(default)]
    pub status: Option<String>,
    /// Human-readable outcome.
    #[serde(default)]
    pub message: Option<String>,
    /// Any other fields the API returned.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl ReprocessResponse {
    /// One-line description of the outcome.
    #[must_use]
    pub fn summary(&self) -> String {
        if self.status.as_deref() == Some("success") {
            let message = self
                .message
                .as_deref()
                .unwrap_or("Voucher processed successfully!");
            return format!("Success: {message}");
        }
        if let Some(message) = &self.message {
            return message.clone();
        }
        serde_json::to_string_pretty(self).unwrap_or_default()
    }
}

/// Trailing `{"status": ..., "message": ...}` object appended to some
/// legacy text responses.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpstreamStatus {
    /// Raw status value; the legacy endpoints use booleans or strings.
    #[serde(default)]
    pub status: serde_json::Value,
    /// Optional message.
    #[serde(default)]
    pub message: Option<String>,
}

impl UpstreamStatus {
    /// Returns `true` only for an explicit boolean `false` status.
    #[must_use]
    pub fn is_explicit_failure(&self) -> bool {
        self.status == serde_json::Value::Bool(false)
    }
}
