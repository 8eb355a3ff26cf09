// src/checker/mod.rs
// =============================================================================
// This module contains all availability checking logic.
//
// Submodules:
// - http: Fetches the page and runs the scan (the public entry points)
// - source: What to check (URL + marker texts) and how one line is judged
// - state: The verdict enum and its name / color mappings
// - charset: Content-Type based Shift-JIS / EUC-JP decoding
// - lines: Lazily splits a response body into lines
// =============================================================================

pub mod charset;
mod http;
mod lines;
mod source;
mod state;

pub use http::{check, Checker};
pub use source::Source;
pub use state::State;
