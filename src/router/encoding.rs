//! Content negotiation and gzip encoding for the echo route.

use flate2::write::GzEncoder;
use flate2::Compression;
use std::io::{self, Write};

pub const GZIP: &str = "gzip";

/// Whether an `Accept-Encoding` value lists `gzip`.
///
/// Tokens are comma separated and trimmed; the comparison is exact, so
/// `GZIP` or `gzip;q=1` do not count.
pub fn accepts_gzip(accept_encoding: Option<&str>) -> bool {
    accept_encoding
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .any(|token| token == GZIP)
}

/// Gzip-compresses `data` at the default level.
pub fn gzip_encode(data: &[u8]) -> io::Result<Vec<u8>> {
    let mut encoder = GzEncoder::new(Vec::with_capacity(data.len() / 2 + 32), Compression::default());
    encoder.write_all(data)?;
    encoder.finish()
}
