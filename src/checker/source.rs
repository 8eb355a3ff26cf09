// src/checker/source.rs
// =============================================================================
// A Source describes one product page to watch.
//
// The two marker texts drive the whole classification:
// - sold_out_text: if a line contains it, the product is sold out
// - available_text: if a line contains it, the product can be bought
//
// Either marker may be empty, which means "don't look for this one".
// The URL is not validated here; reqwest is the judge of what a URL is.
// =============================================================================

use serde::{Deserialize, Serialize};

use super::State;

/// One product page and the texts that reveal its availability.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Source {
    /// Display name, only used by callers (e.g. in notifications)
    pub name: String,
    /// Absolute http(s) URL of the product page
    pub url: String,
    /// Text that appears on the page when the product is sold out
    #[serde(default)]
    pub sold_out_text: String,
    /// Text that appears on the page when the product can be bought
    #[serde(default)]
    pub available_text: String,
}

impl Source {
    /// Creates a source with both markers empty.
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Source {
            name: name.into(),
            url: url.into(),
            sold_out_text: String::new(),
            available_text: String::new(),
        }
    }

    pub fn with_sold_out_text(mut self, text: impl Into<String>) -> Self {
        self.sold_out_text = text.into();
        self
    }

    pub fn with_available_text(mut self, text: impl Into<String>) -> Self {
        self.available_text = text.into();
        self
    }

    /// Classifies a single line of the page.
    ///
    /// The sold-out marker is tested first, so a line carrying both markers
    /// counts as sold out. Returns `None` when neither (non-empty) marker
    /// occurs in the line.
    pub fn classify_line(&self, line: &str) -> Option<State> {
        if !self.sold_out_text.is_empty() && line.contains(self.sold_out_text.as_str()) {
            Some(State::SoldOut)
        } else if !self.available_text.is_empty() && line.contains(self.available_text.as_str()) {
            Some(State::Available)
        } else {
            None
        }
    }

    /// The verdict when no line matched.
    ///
    /// An expected-but-missing available marker means sold out. Without an
    /// available marker, the absence of the sold-out marker means available.
    pub fn fallback_state(&self) -> State {
        if self.available_text.is_empty() {
            State::Available
        } else {
            State::SoldOut
        }
    }

    /// Classifies text that is already in memory: first matching line wins,
    /// otherwise [`Source::fallback_state`].
    pub fn classify_text(&self, text: &str) -> State {
        text.lines()
            .find_map(|line| self.classify_line(line))
            .unwrap_or_else(|| self.fallback_state())
    }
}
