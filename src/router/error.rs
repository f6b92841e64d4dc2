use std::io;
use std::path::PathBuf;
use thiserror::Error;

use crate::http::request::Method;
use crate::http::response::{Response, StatusCode};

/// Failures a handler can end with. Every one of them becomes a response;
/// none escapes to the connection.
#[derive(Debug, Error)]
pub enum RouteError {
    #[error("no route for {method} {path}")]
    UnknownRoute { method: Method, path: String },

    #[error("file not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("file name escapes the base directory: {0:?}")]
    InvalidFileName(String),

    #[error("failed to read {}: {source}", path.display())]
    FileReadFailure {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to write {}: {source}", path.display())]
    FileWriteFailure {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("gzip encoding failed: {0}")]
    Encoding(#[source] io::Error),

    #[error("body has {received} of {declared} declared bytes")]
    TruncatedBody { declared: usize, received: usize },
}

impl RouteError {
    pub fn status(&self) -> StatusCode {
        match self {
            RouteError::UnknownRoute { .. } | RouteError::FileNotFound(_) => StatusCode::NotFound,
            RouteError::InvalidFileName(_) | RouteError::TruncatedBody { .. } => {
                StatusCode::BadRequest
            }
            RouteError::FileReadFailure { .. }
            | RouteError::FileWriteFailure { .. }
            | RouteError::Encoding(_) => StatusCode::InternalServerError,
        }
    }

    pub fn into_response(self) -> Response {
        Response::empty(self.status())
    }
}
