//! Incremental decoding of an event-stream body into text events.
//!
//! Bytes are buffered until a full line is available, so neither a line nor
//! a multi-byte character is ever split by chunk boundaries. Only lines
//! starting with [`DATA_PREFIX`] produce events; comments, blank separators
//! and other fields are dropped.

use bytes::BytesMut;
use tracing::warn;

/// Prefix that marks an event line. The payload is everything after it.
pub const DATA_PREFIX: &str = "data: ";

/// Default cap on an unterminated line, in bytes.
pub const DEFAULT_MAX_LINE_LEN: usize = 1024 * 1024;

/// Stateful line splitter for one stream.
#[derive(Debug)]
pub struct SseLineDecoder {
    buf: BytesMut,
    /// Bytes at the front of `buf` already known to hold no newline.
    scanned: usize,
    /// Set after an oversized line was dropped; skip up to its newline.
    discarding: bool,
    max_line_len: usize,
}

impl Default for SseLineDecoder {
    fn default() -> Self {
        Self::with_max_line_len(DEFAULT_MAX_LINE_LEN)
    }
}

impl SseLineDecoder {
    /// Create an empty decoder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a decoder that drops any line longer than `max_line_len` bytes.
    pub fn with_max_line_len(max_line_len: usize) -> Self {
        Self {
            buf: BytesMut::new(),
            scanned: 0,
            discarding: false,
            max_line_len,
        }
    }

    /// Append a chunk and return every event completed by it, in order.
    pub fn feed(&mut self, chunk: &[u8]) -> Vec<String> {
        self.buf.extend_from_slice(chunk);

        let mut events = Vec::new();
        while let Some(line_end) = find_newline(&self.buf, self.scanned) {
            let line = self.buf.split_to(line_end);
            self.scanned = 0;
            if std::mem::take(&mut self.discarding) {
                continue;
            }
            if let Some(event) = parse_line(&line[..line.len() - 1]) {
                events.push(event);
            }
        }
        self.scanned = self.buf.len();

        if self.buf.len() > self.max_line_len {
            warn!(
                len = self.buf.len(),
                limit = self.max_line_len,
                "Discarding oversized event-stream line"
            );
            self.buf.clear();
            self.scanned = 0;
            self.discarding = true;
        }
        events
    }

    /// Number of buffered bytes not yet terminated by a newline.
    pub fn pending(&self) -> usize {
        self.buf.len()
    }
}

/// Find the next newline at or after `from`, returning the position after it.
fn find_newline(buf: &BytesMut, from: usize) -> Option<usize> {
    buf[from..]
        .iter()
        .position(|&b| b == b'\n')
        .map(|pos| from + pos + 1)
}

/// Extract the payload of a `data: ` line. A trailing `\r` belongs to the
/// line terminator, not the payload.
fn parse_line(line: &[u8]) -> Option<String> {
    let line = line.strip_suffix(b"\r").unwrap_or(line);
    line.strip_prefix(DATA_PREFIX.as_bytes())
        .map(|payload| String::from_utf8_lossy(payload).into_owned())
}
