// src/error.rs
// =============================================================================
// Everything that can turn a check into an ERROR verdict.
//
// We use `thiserror` so each failure mode is its own enum variant, which lets
// callers match on *why* a page could not be classified, while still getting
// a readable message from Display.
// =============================================================================

use reqwest::StatusCode;
use thiserror::Error;

/// Why a check ended in [`State::Error`](crate::State::Error).
#[derive(Debug, Error)]
pub enum CheckError {
    /// DNS, connect, TLS or timeout failure before a response arrived.
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The server answered with a 4xx or 5xx status.
    ///
    /// Displays as the status line the server sent, e.g. `404 Not Found` or
    /// `404 Item Gone`. `reason` is empty when the server sent none and the
    /// code has no standard phrase.
    #[error("{}", status_line(.status, .reason))]
    Status { status: StatusCode, reason: String },

    /// Reading the body broke off mid-scan. Only produced by a strict
    /// [`Checker`](crate::Checker).
    #[error("body read failed after {lines} line(s): {source}")]
    Body {
        lines: usize,
        source: reqwest::Error,
    },

    /// The shared default client could not be built (e.g. the TLS backend
    /// failed to initialize). Pass your own client to avoid it.
    #[error("default HTTP client unavailable: {0}")]
    ClientInit(String),
}

impl CheckError {
    /// Error for a status-gated response. An empty `reason` falls back to
    /// the standard phrase for the code.
    pub fn status_error(status: StatusCode, reason: Option<&str>) -> Self {
        let reason = reason
            .or_else(|| status.canonical_reason())
            .unwrap_or_default()
            .to_string();
        CheckError::Status { status, reason }
    }

    /// The HTTP status behind this error, if the server sent one.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            CheckError::Status { status, .. } => Some(*status),
            CheckError::Transport(e) | CheckError::Body { source: e, .. } => e.status(),
            CheckError::ClientInit(_) => None,
        }
    }
}

fn status_line(status: &StatusCode, reason: &str) -> String {
    if reason.is_empty() {
        status.as_str().to_string()
    } else {
        format!("{} {}", status.as_str(), reason)
    }
}
