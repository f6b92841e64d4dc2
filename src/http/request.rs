use bytes::Bytes;
use std::fmt;

use crate::http::headers::Headers;

/// HTTP request methods.
///
/// Only `GET` and `POST` are routed; anything else parses fine and ends up
/// at the not-found handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    /// GET - Retrieve a resource
    GET,
    /// POST - Create or submit data
    POST,
    /// PUT - Replace a resource
    PUT,
    /// DELETE - Delete a resource
    DELETE,
    /// HEAD - Like GET but without the response body
    HEAD,
    /// OPTIONS - Describe communication options
    OPTIONS,
    /// PATCH - Partial modification of a resource
    PATCH,
    /// Any token not listed above
    Other,
}

/// A fully framed HTTP request.
///
/// Produced by the framer only once every body byte is present, and dropped
/// after dispatch.
#[derive(Debug, Clone)]
pub struct Request {
    /// The HTTP method (GET, POST, etc.)
    pub method: Method,
    /// The request path exactly as sent (e.g. "/echo/abc")
    pub path: String,
    /// HTTP version (typically "HTTP/1.1")
    pub version: String,
    /// Request headers, looked up case-insensitively
    pub headers: Headers,
    /// Request body; empty for anything but POST
    pub body: Bytes,
}

/// Builder for constructing Request objects.
#[derive(Debug, Default)]
pub struct RequestBuilder {
    method: Option<Method>,
    path: Option<String>,
    version: Option<String>,
    headers: Headers,
    body: Bytes,
}

impl Method {
    /// Parses an HTTP method token.
    ///
    /// Matching is case-sensitive; unknown tokens map to [`Method::Other`].
    ///
    /// # Example
    ///
    /// ```
    /// # use hearth::http::request::Method;
    /// assert_eq!(Method::parse("GET"), Method::GET);
    /// assert_eq!(Method::parse("get"), Method::Other);
    /// ```
    pub fn parse(s: &str) -> Self {
        match s {
            "GET" => Method::GET,
            "POST" => Method::POST,
            "PUT" => Method::PUT,
            "DELETE" => Method::DELETE,
            "HEAD" => Method::HEAD,
            "OPTIONS" => Method::OPTIONS,
            "PATCH" => Method::PATCH,
            _ => Method::Other,
        }
    }

    /// Whether the framer reads a `Content-Length` body for this method.
    pub fn has_body(&self) -> bool {
        matches!(self, Method::POST)
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Method::GET => "GET",
            Method::POST => "POST",
            Method::PUT => "PUT",
            Method::DELETE => "DELETE",
            Method::HEAD => "HEAD",
            Method::OPTIONS => "OPTIONS",
            Method::PATCH => "PATCH",
            Method::Other => "OTHER",
        };
        f.write_str(s)
    }
}

impl RequestBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn method(mut self, method: Method) -> Self {
        self.method = Some(method);
        self
    }

    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key, value);
        self
    }

    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    pub fn build(self) -> Result<Request, &'static str> {
        Ok(Request {
            method: self.method.ok_or("method missing")?,
            path: self.path.ok_or("path missing")?,
            version: self.version.unwrap_or_else(|| "HTTP/1.1".to_string()),
            headers: self.headers,
            body: self.body,
        })
    }
}

impl Request {
    /// Retrieves the first value of a header, ignoring name case.
    pub fn header(&self, key: &str) -> Option<&str> {
        self.headers.get(key)
    }

    /// Declared `Content-Length`.
    ///
    /// Returns 0 if the header is missing or not a valid number.
    pub fn content_length(&self) -> usize {
        content_length(&self.headers)
    }

    /// Determines whether the connection should remain open after the response.
    ///
    /// Anything but a `Connection: close` (any case) keeps the connection.
    pub fn keep_alive(&self) -> bool {
        !self
            .header("Connection")
            .is_some_and(|v| v.trim().eq_ignore_ascii_case("close"))
    }
}

pub(crate) fn content_length(headers: &Headers) -> usize {
    headers
        .get("Content-Length")
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(0)
}
