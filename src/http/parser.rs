use bytes::Bytes;
use thiserror::Error;

use crate::http::buffer::{find, Accumulator, HEADER_TERMINATOR};
use crate::http::headers::Headers;
use crate::http::request::{content_length, Method, Request};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    /// Header block or body not fully received yet. Never leaves the
    /// connection: the supervisor just reads more.
    #[error("incomplete request")]
    Incomplete,

    /// Request line without a method and a path. `consumed` is the size of
    /// the offending header block so the caller can drop it.
    #[error("malformed request line: {line:?}")]
    MalformedRequestLine { line: String, consumed: usize },

    /// Declared body length that cannot be framed. Only the header block
    /// (`consumed` bytes) is dropped; the connection must close afterwards.
    #[error("unframeable Content-Length {declared}")]
    BodyTooLarge { declared: usize, consumed: usize },
}

/// Request line and headers of a header block.
#[derive(Debug)]
pub struct Head {
    pub method: Method,
    pub path: String,
    pub version: String,
    pub headers: Headers,
}

/// Boundaries of one framed request within a buffer.
#[derive(Debug)]
struct Frame {
    head: Head,
    body_start: usize,
    total: usize,
}

fn locate(buf: &[u8], headers_end: usize) -> Result<Frame, ParseError> {
    let body_start = headers_end + HEADER_TERMINATOR.len();

    let head = parse_head(&buf[..headers_end]).map_err(|line| {
        ParseError::MalformedRequestLine {
            line,
            consumed: body_start,
        }
    })?;

    let content_length = if head.method.has_body() {
        content_length(&head.headers)
    } else {
        0
    };

    // Partial bodies are never handed out.
    let total = body_start
        .checked_add(content_length)
        .ok_or(ParseError::BodyTooLarge {
            declared: content_length,
            consumed: body_start,
        })?;
    if buf.len() < total {
        return Err(ParseError::Incomplete);
    }

    Ok(Frame {
        head,
        body_start,
        total,
    })
}

/// Tries to frame one request from the front of `buf`.
///
/// On success returns the request and the number of bytes it occupies;
/// anything past that belongs to the next pipelined request.
pub fn parse_http_request(buf: &[u8]) -> Result<(Request, usize), ParseError> {
    let headers_end = find(buf, HEADER_TERMINATOR).ok_or(ParseError::Incomplete)?;
    let frame = locate(buf, headers_end)?;
    let body = Bytes::copy_from_slice(&buf[frame.body_start..frame.total]);
    Ok((frame.head.into_request(body), frame.total))
}

/// Frames the next request held by `acc`, consuming exactly its bytes.
///
/// Returns `Ok(None)` while the request is still incomplete; nothing is
/// consumed in that case. On any other error the header block is consumed
/// before the error is returned.
pub fn frame_request(acc: &mut Accumulator) -> Result<Option<Request>, ParseError> {
    let Some(headers_end) = acc.find_header_end() else {
        return Ok(None);
    };

    match locate(acc.as_slice(), headers_end) {
        Ok(frame) => {
            let raw = acc.consume_prefix(frame.total);
            Ok(Some(frame.head.into_request(raw.slice(frame.body_start..))))
        }
        Err(ParseError::Incomplete) => Ok(None),
        Err(e) => {
            acc.consume_prefix(e.consumed());
            Err(e)
        }
    }
}

impl ParseError {
    /// Bytes of the buffer the failed request occupies.
    pub fn consumed(&self) -> usize {
        match self {
            ParseError::Incomplete => 0,
            ParseError::MalformedRequestLine { consumed, .. }
            | ParseError::BodyTooLarge { consumed, .. } => *consumed,
        }
    }
}

impl Head {
    fn into_request(self, body: Bytes) -> Request {
        Request {
            method: self.method,
            path: self.path,
            version: self.version,
            headers: self.headers,
            body,
        }
    }
}

/// Splits a header block into request line and headers.
///
/// Header values lose exactly one leading space. Lines without a `:` are
/// skipped. Fails with the request line when it lacks a method or path.
pub fn parse_head(block: &[u8]) -> Result<Head, String> {
    let text = String::from_utf8_lossy(block);
    let mut lines = text.split("\r\n");

    let request_line = lines.next().unwrap_or_default();
    let mut parts = request_line.split_whitespace();

    let (method, path) = match (parts.next(), parts.next()) {
        (Some(m), Some(p)) => (m, p),
        _ => return Err(request_line.to_string()),
    };
    let version = parts.next().unwrap_or("HTTP/1.1");

    let mut headers = Headers::new();
    for line in lines {
        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        let value = value.strip_prefix(' ').unwrap_or(value);
        headers.insert(key, value);
    }

    Ok(Head {
        method: Method::parse(method),
        path: path.to_string(),
        version: version.to_string(),
        headers,
    })
}
