//! Extraction profiles and their compile-time registry.
//!
//! A profile is what differs between the account, voucher, and verification
//! call sites: which header labels are noise, how tables are titled by
//! position, and whether header-only tables are kept. Built-in profiles are
//! embedded TOML files under `profiles/`.

use serde::{Deserialize, Serialize};

use crate::ExtractError;

/// Number of built-in profiles. Enforced by a test.
#[cfg(test)]
const EXPECTED_PROFILE_COUNT: usize = 3;

/// Embedded TOML profile definitions.
const PROFILE_TOMLS: &[(&str, &str)] = &[
    ("account", include_str!("../profiles/account.toml")),
    ("voucher", include_str!("../profiles/voucher.toml")),
    ("verification", include_str!("../profiles/verification.toml")),
];

/// Which extracted tables are kept in the result.
///
/// The generic `Column 1`/`Column 2` placeholder table is dropped under
/// every policy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InclusionPolicy {
    /// Keep a table with at least one header or at least one row.
    #[default]
    Lenient,
    /// Keep a table only if it has at least one non-empty row.
    RequireRows,
}

impl InclusionPolicy {
    /// Decides whether a table with the given shape is emitted.
    #[must_use]
    pub const fn keeps(self, header_count: usize, row_count: usize) -> bool {
        match self {
            Self::Lenient => header_count > 0 || row_count > 0,
            Self::RequireRows => row_count > 0,
        }
    }
}

/// Per-call-site extraction parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractProfile {
    /// Profile identifier (e.g. `"voucher"`).
    pub name: String,
    /// Free-form note on which upstream response this profile targets.
    #[serde(default)]
    pub description: Option<String>,
    /// Table inclusion policy.
    #[serde(default)]
    pub inclusion: InclusionPolicy,
    /// Header texts that leak from section titles and are never columns.
    #[serde(default)]
    pub noise_labels: Vec<String>,
    /// Titles indexed by the table's position in the document.
    #[serde(default)]
    pub titles: Vec<String>,
}

impl ExtractProfile {
    /// A profile with no noise labels and no titles beyond `Details N`.
    #[must_use]
    pub fn generic() -> Self {
        Self {
            name: "generic".to_owned(),
            description: None,
            inclusion: InclusionPolicy::Lenient,
            noise_labels: Vec::new(),
            titles: Vec::new(),
        }
    }

    /// Parses a profile from TOML.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractError::Profile`] if the TOML is malformed or lacks
    /// a `name`.
    pub fn from_toml_str(source: &str) -> Result<Self, ExtractError> {
        Ok(toml::de::from_str(source)?)
    }

    /// Title for the table at zero-based document position `index`.
    #[must_use]
    pub fn title_for(&self, index: usize) -> String {
        self.titles
            .get(index)
            .cloned()
            .unwrap_or_else(|| format!("Details {}", index + 1))
    }

    /// Returns `true` if `text` is one of the excluded header labels.
    #[must_use]
    pub fn is_noise_label(&self, text: &str) -> bool {
        self.noise_labels.iter().any(|label| label == text)
    }
}

/// Returns all built-in profiles.
///
/// # Panics
///
/// Panics if any embedded TOML file fails to parse. These are compile-time
/// constants, so a failure is a development error caught by the tests.
#[must_use]
pub fn all_builtin() -> Vec<ExtractProfile> {
    PROFILE_TOMLS
        .iter()
        .map(|(name, toml_str)| {
            ExtractProfile::from_toml_str(toml_str)
                .unwrap_or_else(|e| panic!("Failed to parse extraction profile '{name}': {e}"))
        })
        .collect()
}

/// Looks up a built-in profile by name.
#[must_use]
pub fn builtin(name: &str) -> Option<ExtractProfile> {
    all_builtin().into_iter().find(|p| p.name == name)
}

/// Like [`builtin`], but reports an unknown name as an error.
///
/// # Errors
///
/// Returns [`ExtractError::UnknownProfile`] if no built-in profile matches.
pub fn require_builtin(name: &str) -> Result<ExtractProfile, ExtractError> {
    builtin(name).ok_or_else(|| ExtractError::UnknownProfile(name.to_owned()))
}
