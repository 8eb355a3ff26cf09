// src/checker/lines.rs
// =============================================================================
// Turns a response body into a lazy stream of text lines.
//
// How it works:
// 1. Pull the next chunk of bytes from the body only when a line is wanted
// 2. Transcode it to UTF-8 (see charset.rs) and append it to a buffer
// 3. Hand out every complete line in the buffer, without its "\n" / "\r\n"
// 4. At end of body, hand out whatever is left as the final line
//
// Because lines are produced on demand, the caller can stop after the first
// interesting line and the rest of the body is never downloaded.
//
// Rust concepts:
// - Streams: the async version of iterators
// - try_unfold: builds a Stream from a state value and an async step function
// =============================================================================

use futures::stream::{self, Stream, StreamExt};
use std::collections::VecDeque;
use std::pin::Pin;

use super::charset::Transcoder;

/// Buffers transcoded bytes and splits them into lines.
pub(crate) struct LineBuffer {
    transcoder: Transcoder,
    pending: Vec<u8>,
    /// Length of the `pending` prefix already searched for '\n'.
    scanned: usize,
    ready: VecDeque<String>,
}

impl LineBuffer {
    pub(crate) fn new(transcoder: Transcoder) -> Self {
        LineBuffer {
            transcoder,
            pending: Vec::new(),
            scanned: 0,
            ready: VecDeque::new(),
        }
    }

    /// Adds a body chunk and queues every line it completes.
    pub(crate) fn push(&mut self, chunk: &[u8]) {
        self.transcoder.feed(chunk, false, &mut self.pending);
        self.split_complete_lines();
    }

    /// Flushes the decoder and queues the unterminated last line, if any.
    pub(crate) fn finish(&mut self) {
        self.transcoder.feed(&[], true, &mut self.pending);
        self.split_complete_lines();
        if !self.pending.is_empty() {
            let rest = std::mem::take(&mut self.pending);
            self.scanned = 0;
            self.ready.push_back(to_line(&rest));
        }
    }

    pub(crate) fn pop_line(&mut self) -> Option<String> {
        self.ready.pop_front()
    }

    /// Only the bytes appended since the last call are searched, so a very
    /// long line arriving in many chunks costs linear time, not quadratic.
    fn split_complete_lines(&mut self) {
        let fresh = &self.pending[self.scanned..];
        let Some(offset) = fresh.iter().rposition(|&b| b == b'\n') else {
            self.scanned = self.pending.len();
            return;
        };
        let last_newline = self.scanned + offset;
        let rest = self.pending.split_off(last_newline + 1);
        let complete = std::mem::replace(&mut self.pending, rest);
        // everything left sits after the last '\n'
        self.scanned = self.pending.len();

        // `complete` ends with '\n', so the final split piece is always empty
        let mut pieces: Vec<&[u8]> = complete.split(|&b| b == b'\n').collect();
        pieces.pop();
        self.ready.extend(pieces.into_iter().map(to_line));
    }
}

/// Drops a trailing '\r' and converts to text. Invalid UTF-8 (only possible
/// on untranscoded bodies) turns into U+FFFD.
fn to_line(bytes: &[u8]) -> String {
    let bytes = bytes.strip_suffix(b"\r").unwrap_or(bytes);
    String::from_utf8_lossy(bytes).into_owned()
}

/// Lazily splits `body` into lines.
///
/// A chunk error is yielded once as `Err` and ends the stream. Lines already
/// yielded stay valid.
pub(crate) fn body_lines<S, B, E>(
    body: S,
    transcoder: Transcoder,
) -> impl Stream<Item = Result<String, E>>
where
    S: Stream<Item = Result<B, E>>,
    B: AsRef<[u8]>,
{
    let body: Pin<Box<S>> = Box::pin(body);
    let state = (body, LineBuffer::new(transcoder), false);

    stream::try_unfold(state, |(mut body, mut buffer, mut finished)| async move {
        loop {
            if let Some(line) = buffer.pop_line() {
                return Ok(Some((line, (body, buffer, finished))));
            }
            if finished {
                return Ok(None);
            }
            match body.next().await {
                Some(Ok(chunk)) => buffer.push(chunk.as_ref()),
                Some(Err(e)) => return Err(e),
                None => {
                    buffer.finish();
                    finished = true;
                }
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::TryStreamExt;
    use std::io;

    fn chunks(parts: &[&'static str]) -> impl Stream<Item = Result<&'static [u8], io::Error>> {
        let items: Vec<Result<&'static [u8], io::Error>> =
            parts.iter().copied().map(|p| Ok(p.as_bytes())).collect();
        stream::iter(items)
    }

    async fn collect(parts: &[&'static str]) -> Vec<String> {
        body_lines(chunks(parts), Transcoder::Passthrough)
            .try_collect()
            .await
            .expect("in-memory stream cannot fail")
    }

    #[tokio::test]
    async fn test_lines_split_across_chunks() {
        let lines = collect(&["<html>\n<p>カート", "に入れる</p>\n", "</html>"]).await;
        assert_eq!(lines, vec!["<html>", "<p>カートに入れる</p>", "</html>"]);
    }

    #[tokio::test]
    async fn test_crlf_and_trailing_newline() {
        let lines = collect(&["a\r\nb\r\n"]).await;
        assert_eq!(lines, vec!["a", "b"]);
    }

    #[tokio::test]
    async fn test_empty_lines_are_kept() {
        let lines = collect(&["a\n\nb"]).await;
        assert_eq!(lines, vec!["a", "", "b"]);
    }

    #[tokio::test]
    async fn test_empty_body_has_no_lines() {
        assert!(collect(&[]).await.is_empty());
    }

    #[test]
    fn test_long_line_over_many_chunks() {
        let chunk = vec![b'x'; 4096];
        let mut buffer = LineBuffer::new(Transcoder::Passthrough);
        for _ in 0..1500 {
            buffer.push(&chunk);
            assert!(buffer.pop_line().is_none());
        }
        buffer.push(b"\nnext");
        buffer.finish();

        let line = buffer.pop_line().expect("long line is complete");
        assert_eq!(line.len(), 4096 * 1500);
        assert_eq!(buffer.pop_line().as_deref(), Some("next"));
        assert!(buffer.pop_line().is_none());
    }

    #[test]
    fn test_newlines_found_after_partial_line() {
        let mut buffer = LineBuffer::new(Transcoder::Passthrough);
        buffer.push(b"par");
        buffer.push(b"tial\nwhole\ntail");
        assert_eq!(buffer.pop_line().as_deref(), Some("partial"));
        assert_eq!(buffer.pop_line().as_deref(), Some("whole"));
        assert!(buffer.pop_line().is_none());

        buffer.push(b"\r\n");
        assert_eq!(buffer.pop_line().as_deref(), Some("tail"));
    }

    #[tokio::test]
    async fn test_error_ends_stream_after_good_lines() {
        let items: Vec<Result<&'static [u8], io::Error>> = vec![
            Ok(b"first\nsecond\npart".as_slice()),
            Err(io::Error::new(io::ErrorKind::ConnectionReset, "reset")),
            Ok(b"never seen\n".as_slice()),
        ];
        let mut lines = Box::pin(body_lines(stream::iter(items), Transcoder::Passthrough));

        assert_eq!(lines.next().await.map(|r| r.ok()), Some(Some("first".to_string())));
        assert_eq!(lines.next().await.map(|r| r.ok()), Some(Some("second".to_string())));
        assert!(matches!(lines.next().await, Some(Err(_))));
        assert!(lines.next().await.is_none());
    }
}
