// src/checker/state.rs
// =============================================================================
// The verdict of a check.
//
// Four values, each with two presentation mappings:
// - a machine-readable name ("SOLDOUT", "AVAILABLE", ...)
// - a color tag for chat-style notifications ("warning", "good", "danger")
//
// Both mappings are plain `match` expressions, so the compiler guarantees
// every variant is covered.
// =============================================================================

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::CheckError;

/// Availability of a product as seen on its page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum State {
    /// Never checked. The checker itself never returns this.
    #[default]
    #[serde(rename = "UNKNOWN")]
    Unknown,
    /// Sold-out marker found, or available marker expected but missing
    #[serde(rename = "SOLDOUT")]
    SoldOut,
    /// Available marker found, or no sold-out marker on the page
    #[serde(rename = "AVAILABLE")]
    Available,
    /// The page could not be fetched
    #[serde(rename = "ERROR")]
    Error,
}

impl State {
    /// Short machine-readable name.
    pub fn name(self) -> &'static str {
        match self {
            State::Unknown => "UNKNOWN",
            State::SoldOut => "SOLDOUT",
            State::Available => "AVAILABLE",
            State::Error => "ERROR",
        }
    }

    /// Color tag for attachments: `warning`, `good`, `danger`, or empty for
    /// [`State::Unknown`].
    pub fn color(self) -> &'static str {
        match self {
            State::SoldOut => "warning",
            State::Available => "good",
            State::Error => "danger",
            State::Unknown => "",
        }
    }

    pub fn is_error(self) -> bool {
        self == State::Error
    }

    /// Collapses a check outcome into a single state; any error is ERROR.
    pub fn from_result(result: &Result<State, CheckError>) -> State {
        match result {
            Ok(state) => *state,
            Err(_) => State::Error,
        }
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
