use bytes::Bytes;

/// HTTP status codes produced by the server.
///
/// - `Ok` (200): Request successful
/// - `Created` (201): File written
/// - `BadRequest` (400): Malformed request or rejected file name
/// - `NotFound` (404): No route or no such file
/// - `InternalServerError` (500): Filesystem or encoding failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusCode {
    /// 200 OK
    Ok,
    /// 201 Created
    Created,
    /// 400 Bad Request
    BadRequest,
    /// 404 Not Found
    NotFound,
    /// 500 Internal Server Error
    InternalServerError,
}

impl StatusCode {
    /// Returns the numeric HTTP status code.
    ///
    /// # Example
    ///
    /// ```
    /// # use hearth::http::response::StatusCode;
    /// assert_eq!(StatusCode::Ok.as_u16(), 200);
    /// assert_eq!(StatusCode::NotFound.as_u16(), 404);
    /// ```
    pub fn as_u16(&self) -> u16 {
        match self {
            StatusCode::Ok => 200,
            StatusCode::Created => 201,
            StatusCode::BadRequest => 400,
            StatusCode::NotFound => 404,
            StatusCode::InternalServerError => 500,
        }
    }

    /// Returns the standard HTTP reason phrase for this status code.
    ///
    /// # Example
    ///
    /// ```
    /// # use hearth::http::response::StatusCode;
    /// assert_eq!(StatusCode::Created.reason_phrase(), "Created");
    /// assert_eq!(StatusCode::NotFound.reason_phrase(), "Not Found");
    /// ```
    pub fn reason_phrase(&self) -> &'static str {
        match self {
            StatusCode::Ok => "OK",
            StatusCode::Created => "Created",
            StatusCode::BadRequest => "Bad Request",
            StatusCode::NotFound => "Not Found",
            StatusCode::InternalServerError => "Internal Server Error",
        }
    }
}

/// Outcome of a route handler, ready to be serialized.
///
/// The `Connection` header is not stored here; the writer adds it from the
/// keep-alive decision, which `force_close` can override.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    /// The HTTP status code
    pub status: StatusCode,
    /// Headers in emission order
    pub headers: Vec<(String, String)>,
    /// Response body as bytes
    pub body: Bytes,
    /// Close the connection after this response regardless of the request
    pub force_close: bool,
}

/// Builder for constructing HTTP responses in a fluent style.
///
/// # Example
///
/// ```
/// # use hearth::http::response::{ResponseBuilder, StatusCode};
/// let response = ResponseBuilder::new(StatusCode::Ok)
///     .header("Content-Type", "text/plain")
///     .body("hi")
///     .build();
/// assert_eq!(response.header("Content-Length"), Some("2"));
/// ```
#[derive(Debug)]
pub struct ResponseBuilder {
    status: StatusCode,
    headers: Vec<(String, String)>,
    body: Bytes,
    force_close: bool,
}

impl ResponseBuilder {
    /// Creates a new response builder with the specified status code.
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: Bytes::new(),
            force_close: false,
        }
    }

    /// Adds or replaces a header. Names compare case-insensitively; a
    /// replaced header keeps its original position.
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        set_header(&mut self.headers, key.into(), value.into());
        self
    }

    /// Sets the response body.
    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    /// Closes the connection once this response is flushed.
    pub fn close(mut self) -> Self {
        self.force_close = true;
        self
    }

    /// Builds the final Response.
    ///
    /// Adds `Content-Length` from the body size unless one was set
    /// explicitly, so keep-alive clients can always find the end of the body.
    pub fn build(mut self) -> Response {
        if !has_header(&self.headers, "Content-Length") {
            self.headers
                .push(("Content-Length".to_string(), self.body.len().to_string()));
        }

        Response {
            status: self.status,
            headers: self.headers,
            body: self.body,
            force_close: self.force_close,
        }
    }
}

impl Response {
    pub fn builder(status: StatusCode) -> ResponseBuilder {
        ResponseBuilder::new(status)
    }

    /// Creates a simple 200 OK response with the given body.
    pub fn ok(body: impl Into<Bytes>) -> Self {
        ResponseBuilder::new(StatusCode::Ok).body(body).build()
    }

    /// A bodiless response with the given status.
    pub fn empty(status: StatusCode) -> Self {
        ResponseBuilder::new(status).build()
    }

    /// Creates a 404 Not Found response.
    pub fn not_found() -> Self {
        Self::empty(StatusCode::NotFound)
    }

    /// Creates a 400 Bad Request response.
    pub fn bad_request() -> Self {
        Self::empty(StatusCode::BadRequest)
    }

    /// Creates a 500 Internal Server Error response.
    pub fn internal_error() -> Self {
        Self::empty(StatusCode::InternalServerError)
    }

    /// Value of a response header, ignoring name case.
    pub fn header(&self, key: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
    }
}

fn has_header(headers: &[(String, String)], key: &str) -> bool {
    headers.iter().any(|(k, _)| k.eq_ignore_ascii_case(key))
}

fn set_header(headers: &mut Vec<(String, String)>, key: String, value: String) {
    match headers.iter_mut().find(|(k, _)| k.eq_ignore_ascii_case(&key)) {
        Some(slot) => slot.1 = value,
        None => headers.push((key, value)),
    }
}
