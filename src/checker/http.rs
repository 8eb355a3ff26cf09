// src/checker/http.rs
// =============================================================================
// This module fetches a product page and decides whether it is sold out.
//
// Key functionality:
// - Makes one HTTP GET request per check (no retries)
// - Treats any 4xx / 5xx status as an error without reading the body
// - Transcodes Shift-JIS / EUC-JP pages before scanning
// - Scans line by line and stops at the first marker it finds
//
// Rust concepts:
// - async/await: For network I/O
// - Result<T, E>: An Err is always the ERROR verdict
// - OnceLock: A lazily created, process-wide default client
// =============================================================================

use futures::{pin_mut, StreamExt};
use hyper::ext::ReasonPhrase;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use std::sync::OnceLock;
use tracing::{debug, warn};

use super::charset::Transcoder;
use super::lines::body_lines;
use super::{Source, State};
use crate::error::CheckError;

/// Shared client for checks that don't bring their own.
///
/// Built on first use with reqwest's defaults (no timeout), then reused so
/// every check shares one connection pool. A build failure is remembered
/// and reported on every use instead of panicking.
fn default_client() -> Result<&'static Client, CheckError> {
    static DEFAULT_CLIENT: OnceLock<Result<Client, String>> = OnceLock::new();
    DEFAULT_CLIENT
        .get_or_init(|| Client::builder().build().map_err(|e| e.to_string()))
        .as_ref()
        .map_err(|e| CheckError::ClientInit(e.clone()))
}

/// Checks a single source.
///
/// Uses `client` when given, otherwise the shared default client. Returns the
/// verdict, or the reason the page could not be classified (the ERROR state).
/// A body that breaks off mid-scan is classified from the lines read so far;
/// use a strict [`Checker`] to get a [`CheckError::Body`] instead.
pub async fn check(source: &Source, client: Option<&Client>) -> Result<State, CheckError> {
    Checker {
        client: client.cloned(),
        strict: false,
    }
    .check(source)
    .await
}

/// Reusable check configuration: which client to use and how to treat a
/// body that fails mid-scan.
///
/// Cloning is cheap, `reqwest::Client` is reference counted internally.
#[derive(Debug, Clone, Default)]
pub struct Checker {
    client: Option<Client>,
    strict: bool,
}

impl Checker {
    /// A lenient checker on the shared default client.
    pub fn new() -> Self {
        Self::default()
    }

    /// A lenient checker on the caller's client (timeouts, redirect policy,
    /// proxies and so on are all configured there).
    pub fn with_client(client: Client) -> Self {
        Checker {
            client: Some(client),
            strict: false,
        }
    }

    /// In strict mode a body read error during the scan becomes
    /// [`CheckError::Body`] instead of falling through to the default verdict.
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// The client checks go through: the caller's, or the shared default.
    ///
    /// Fails only when the shared default client could not be built.
    pub fn client(&self) -> Result<&Client, CheckError> {
        match &self.client {
            Some(client) => Ok(client),
            None => default_client(),
        }
    }

    /// Fetches `source.url` and classifies the page.
    ///
    /// Returns [`State::SoldOut`] or [`State::Available`] on success. Any
    /// `Err` is the ERROR verdict: transport failure, a status >= 400 (the
    /// body is not read), or, in strict mode only, a body that broke off.
    pub async fn check(&self, source: &Source) -> Result<State, CheckError> {
        debug!(name = %source.name, url = %source.url, "checking source");

        // The response (and with it the connection) is dropped on every
        // return below, including the early ones from the scan loop.
        let response = self.client()?.get(&source.url).send().await?;

        let status = response.status();
        if status.as_u16() >= 400 {
            let reason = response
                .extensions()
                .get::<ReasonPhrase>()
                .map(|reason| String::from_utf8_lossy(reason.as_bytes()).into_owned());
            debug!(url = %source.url, %status, reason, "error status, body not scanned");
            return Err(CheckError::status_error(status, reason.as_deref()));
        }

        // Raw header bytes, so a stray non-ASCII byte elsewhere in the value
        // does not hide the charset parameter.
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .map(|value| String::from_utf8_lossy(value.as_bytes()).into_owned())
            .unwrap_or_default();
        let transcoder = Transcoder::for_content_type(&content_type);
        debug!(url = %source.url, %status, content_type, "scanning body");

        let lines = body_lines(response.bytes_stream(), transcoder);
        pin_mut!(lines);

        let mut line_no = 0;
        while let Some(line) = lines.next().await {
            let line = match line {
                Ok(line) => line,
                Err(e) if self.strict => {
                    return Err(CheckError::Body {
                        lines: line_no,
                        source: e,
                    });
                }
                Err(e) => {
                    warn!(
                        url = %source.url,
                        lines = line_no,
                        error = %e,
                        "body read failed, classifying from lines read so far"
                    );
                    break;
                }
            };
            line_no += 1;

            if let Some(state) = source.classify_line(&line) {
                debug!(url = %source.url, line = line_no, %state, "marker found");
                return Ok(state);
            }
        }

        let state = source.fallback_state();
        debug!(url = %source.url, lines = line_no, %state, "no marker found");
        Ok(state)
    }
}

// -----------------------------------------------------------------------------
// NOTES:
//
// 1. Why stream the body instead of response.text()?
//    - Product pages can be large, and the marker is often near the top
//    - bytes_stream() lets us stop downloading as soon as we have an answer
//    - response.text() would also guess the charset itself, but we need the
//      exact header rules in charset.rs
//
// 2. Why OnceLock for the default client?
//    - Creating a Client builds a TLS config and a connection pool
//    - Doing that once and sharing it is what reqwest recommends
//    - OnceLock is in std and safe to initialize from many threads at once
//
// 3. Why no timeout on the default client?
//    - Timeouts are policy, and policy belongs to the caller
//    - Pass a client from Client::builder().timeout(...) to Checker::with_client
// -----------------------------------------------------------------------------
