// src/lib.rs
// =============================================================================
// nschecker: is a product sold out or available?
//
// What happens here:
// 1. The caller hands us a Source (URL + marker texts) and optionally a client
// 2. We GET the page and decode Shift-JIS / EUC-JP bodies when needed
// 3. We scan the page line by line for the marker texts
// 4. We return a State (SOLDOUT / AVAILABLE) or a CheckError (ERROR)
//
// Scheduling, notifications and config files are the caller's business.
// =============================================================================

pub mod checker;
mod error;

pub use checker::{check, charset, Checker, Source, State};
pub use error::CheckError;
