//! Trailing status objects in plain-text responses.
//!
//! The disconnect endpoint echoes diagnostic text and then appends a JSON
//! object such as `{"status":false,"message":"No active session"}`.

use std::sync::LazyLock;

use idss_extract_models::UpstreamStatus;
use regex::Regex;

static TRAILING_STATUS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"\{[^}]*"status"[^}]*\}$"#).unwrap_or_else(|_| unreachable!())
});

/// Result of a disconnect request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisconnectOutcome {
    /// The session was terminated (or the response gave no explicit failure).
    Disconnected {
        /// Account that was disconnected.
        account: String,
    },
    /// The upstream reported `status: false`.
    NoActiveSession {
        /// Upstream message, or a default explanation.
        message: String,
    },
}

impl std::fmt::Display for DisconnectOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Disconnected { account } => {
                write!(f, "Account {account} has been disconnected successfully.")
            }
            Self::NoActiveSession { message } => f.write_str(message),
        }
    }
}

/// Parses the JSON status object at the end of `text`, if there is one.
#[must_use]
pub fn parse_trailing_status(text: &str) -> Option<UpstreamStatus> {
    let m = TRAILING_STATUS.find(text.trim_end())?;
    match serde_json::from_str(m.as_str()) {
        Ok(status) => Some(status),
        Err(e) => {
            log::warn!("Trailing status object is not valid JSON: {e}");
            None
        }
    }
}

/// Interprets a disconnect response body.
#[must_use]
pub fn disconnect_outcome(account: &str, text: &str) -> DisconnectOutcome {
    match parse_trailing_status(text) {
        Some(status) if status.is_explicit_failure() => DisconnectOutcome::NoActiveSession {
            message: status
                .message
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| "No active session found for this account.".to_owned()),
        },
        _ => DisconnectOutcome::Disconnected {
            account: account.to_owned(),
        },
    }
}
