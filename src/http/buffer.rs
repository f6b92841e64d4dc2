use bytes::{Bytes, BytesMut};

/// Delimiter between the header block and the body.
pub const HEADER_TERMINATOR: &[u8] = b"\r\n\r\n";

/// Growable per-connection byte buffer.
///
/// Bytes are appended as they arrive from the stream and removed from the
/// front once a complete request has been framed. Scanning never consumes.
#[derive(Debug, Default)]
pub struct Accumulator {
    buf: BytesMut,
    // Bytes already searched for the terminator without a match.
    scanned: usize,
}

impl Accumulator {
    pub fn new() -> Self {
        Self::with_capacity(4096)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: BytesMut::with_capacity(capacity),
            scanned: 0,
        }
    }

    pub fn append(&mut self, chunk: &[u8]) {
        self.buf.extend_from_slice(chunk);
    }

    /// Offset of the first `\r\n\r\n` currently held, if any.
    ///
    /// Resumes where the previous miss stopped, so a header block arriving
    /// in many small chunks is scanned once overall.
    pub fn find_header_end(&mut self) -> Option<usize> {
        let start = self.scanned.saturating_sub(HEADER_TERMINATOR.len() - 1);
        match find(&self.buf[start..], HEADER_TERMINATOR) {
            Some(pos) => Some(start + pos),
            None => {
                self.scanned = self.buf.len();
                None
            }
        }
    }

    /// Removes and returns the first `n` bytes.
    ///
    /// # Panics
    ///
    /// Panics if `n` exceeds [`Accumulator::len`].
    pub fn consume_prefix(&mut self, n: usize) -> Bytes {
        assert!(
            n <= self.buf.len(),
            "consume_prefix({n}) with only {} bytes buffered",
            self.buf.len()
        );
        self.scanned = self.scanned.saturating_sub(n);
        self.buf.split_to(n).freeze()
    }

    /// Drops everything buffered, e.g. a half-received request on timeout.
    pub fn clear(&mut self) {
        self.buf.clear();
        self.scanned = 0;
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.buf
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }
}

/// Position of the first occurrence of `pattern` in `haystack`.
pub fn find(haystack: &[u8], pattern: &[u8]) -> Option<usize> {
    if pattern.is_empty() {
        return Some(0);
    }
    haystack
        .windows(pattern.len())
        .position(|w| w == pattern)
}
