// src/checker/charset.rs
// =============================================================================
// Picks a decoder for the page from its Content-Type header.
//
// Japanese shops often still serve Shift-JIS or EUC-JP pages. Marker texts
// are configured as normal Rust strings (UTF-8), so those pages have to be
// transcoded to UTF-8 before we can search them.
//
// The rules are a plain substring match on the raw header value, checked top
// to bottom, first match wins. No match means the body is scanned as-is.
// =============================================================================

use encoding_rs::{CoderResult, Decoder, Encoding, EUC_JP_INIT, SHIFT_JIS_INIT};

/// (header substring, encoding) pairs, in priority order.
///
/// Matching is case-sensitive on purpose: it mirrors the exact spellings
/// shops are known to send.
static CHARSET_RULES: [(&str, &Encoding); 3] = [
    ("charset=Windows-31J", &SHIFT_JIS_INIT),
    ("charset=shift_jis", &SHIFT_JIS_INIT),
    ("charset=EUC-JP", &EUC_JP_INIT),
];

/// Returns the encoding to decode the body with, or `None` to scan the raw
/// bytes.
pub fn encoding_for(content_type: &str) -> Option<&'static Encoding> {
    CHARSET_RULES
        .iter()
        .find(|(needle, _)| content_type.contains(needle))
        .map(|(_, encoding)| *encoding)
}

/// Converts body chunks into UTF-8 bytes as they arrive.
///
/// Keeps decoder state between chunks, so a multi-byte character split across
/// two network reads still decodes correctly. Malformed sequences become
/// U+FFFD instead of stopping the scan.
pub(crate) enum Transcoder {
    Passthrough,
    Decode(Decoder),
}

impl Transcoder {
    pub(crate) fn for_content_type(content_type: &str) -> Self {
        match encoding_for(content_type) {
            Some(encoding) => Transcoder::Decode(encoding.new_decoder_without_bom_handling()),
            None => Transcoder::Passthrough,
        }
    }

    /// Appends the UTF-8 form of `chunk` to `out`. `last` flushes any
    /// incomplete trailing sequence.
    pub(crate) fn feed(&mut self, chunk: &[u8], last: bool, out: &mut Vec<u8>) {
        let decoder = match self {
            Transcoder::Passthrough => {
                out.extend_from_slice(chunk);
                return;
            }
            Transcoder::Decode(decoder) => decoder,
        };

        let mut text = String::new();
        let mut input = chunk;
        loop {
            let needed = decoder
                .max_utf8_buffer_length(input.len())
                .unwrap_or(input.len() * 3 + 16);
            text.reserve(needed);

            let (result, read, _had_replacements) = decoder.decode_to_string(input, &mut text, last);
            input = &input[read..];
            match result {
                CoderResult::InputEmpty => break,
                CoderResult::OutputFull => continue,
            }
        }
        out.extend_from_slice(text.as_bytes());
    }
}
