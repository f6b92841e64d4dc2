//! Request routing.
//!
//! Routes are matched against an ordered rule table; the first rule whose
//! method and path pattern match wins. Each route has its own handler that
//! returns either a [`Response`] or a [`RouteError`], and errors are turned
//! into responses here so nothing propagates to the connection.
//!
//! | Priority | Method | Pattern            | Handler      |
//! |----------|--------|--------------------|--------------|
//! | 1        | GET    | `/` (exact)        | root         |
//! | 2        | GET    | `/echo/` prefix    | echo         |
//! | 3        | GET    | `/user-agent` prefix | user agent |
//! | 4        | GET    | `/files/` prefix   | read file    |
//! | 5        | POST   | `/files/` prefix   | write file   |
//! | -        | any    | anything else      | 404          |

pub mod encoding;
pub mod error;
pub mod files;

pub use error::RouteError;
pub use files::FileStore;

use std::path::PathBuf;
use tracing::{debug, error, warn};

use crate::http::request::{Method, Request};
use crate::http::response::{Response, ResponseBuilder, StatusCode};

const FILES_PREFIX: &str = "/files/";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Root,
    Echo,
    UserAgent,
    ReadFile,
    WriteFile,
}

#[derive(Debug, Clone, Copy)]
enum Pattern {
    Exact(&'static str),
    Prefix(&'static str),
}

impl Pattern {
    fn matches(&self, path: &str) -> bool {
        match self {
            Pattern::Exact(p) => path == *p,
            Pattern::Prefix(p) => path.starts_with(p),
        }
    }
}

struct Rule {
    method: Method,
    pattern: Pattern,
    route: Route,
}

const RULES: &[Rule] = &[
    Rule {
        method: Method::GET,
        pattern: Pattern::Exact("/"),
        route: Route::Root,
    },
    Rule {
        method: Method::GET,
        pattern: Pattern::Prefix("/echo/"),
        route: Route::Echo,
    },
    Rule {
        method: Method::GET,
        pattern: Pattern::Prefix("/user-agent"),
        route: Route::UserAgent,
    },
    Rule {
        method: Method::GET,
        pattern: Pattern::Prefix(FILES_PREFIX),
        route: Route::ReadFile,
    },
    Rule {
        method: Method::POST,
        pattern: Pattern::Prefix(FILES_PREFIX),
        route: Route::WriteFile,
    },
];

/// First route whose rule matches, if any.
pub fn match_route(method: Method, path: &str) -> Option<Route> {
    RULES
        .iter()
        .find(|rule| rule.method == method && rule.pattern.matches(path))
        .map(|rule| rule.route)
}

/// Dispatches framed requests to the route handlers.
///
/// Holds only the immutable file store, so one instance is shared by every
/// connection.
#[derive(Debug, Clone)]
pub struct Router {
    files: FileStore,
}

impl Router {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            files: FileStore::new(base_dir),
        }
    }

    pub fn files(&self) -> &FileStore {
        &self.files
    }

    pub async fn dispatch(&self, req: &Request) -> Response {
        let result = match match_route(req.method, &req.path) {
            Some(route) => self.handle(route, req).await,
            None => Err(RouteError::UnknownRoute {
                method: req.method,
                path: req.path.clone(),
            }),
        };

        result.unwrap_or_else(|err| {
            match err.status() {
                StatusCode::InternalServerError => error!(error = %err, "Handler failed"),
                StatusCode::BadRequest => warn!(error = %err, "Rejected request"),
                _ => debug!(error = %err, "No content for request"),
            }
            err.into_response()
        })
    }

    async fn handle(&self, route: Route, req: &Request) -> Result<Response, RouteError> {
        match route {
            Route::Root => Ok(Response::empty(StatusCode::Ok)),
            Route::Echo => echo(req),
            Route::UserAgent => Ok(user_agent(req)),
            Route::ReadFile => self.read_file(req).await,
            Route::WriteFile => self.write_file(req).await,
        }
    }

    async fn read_file(&self, req: &Request) -> Result<Response, RouteError> {
        let path = self.files.resolve(file_name(req))?;

        if !self.files.exists(&path).await {
            return Err(RouteError::FileNotFound(path));
        }

        let contents = self.files.read_all(&path).await?;
        Ok(ResponseBuilder::new(StatusCode::Ok)
            .header("Content-Type", "application/octet-stream")
            .header("Content-Length", contents.len().to_string())
            .body(contents)
            .build())
    }

    async fn write_file(&self, req: &Request) -> Result<Response, RouteError> {
        let path = self.files.resolve(file_name(req))?;

        // The framer only dispatches complete bodies; this guards callers
        // that build requests by hand.
        let declared = req.content_length();
        if req.body.len() < declared {
            return Err(RouteError::TruncatedBody {
                declared,
                received: req.body.len(),
            });
        }

        self.files.write_all(&path, &req.body).await?;
        Ok(Response::empty(StatusCode::Created))
    }
}

fn echo(req: &Request) -> Result<Response, RouteError> {
    let segments: Vec<&str> = req.path.split('/').collect();
    if segments.len() != 3 {
        return Err(RouteError::UnknownRoute {
            method: req.method,
            path: req.path.clone(),
        });
    }
    let message = segments[2].as_bytes();

    let builder = ResponseBuilder::new(StatusCode::Ok).header("Content-Type", "text/plain");

    let response = if encoding::accepts_gzip(req.header("Accept-Encoding")) {
        let compressed = encoding::gzip_encode(message).map_err(RouteError::Encoding)?;
        builder
            .header("Content-Encoding", encoding::GZIP)
            .header("Content-Length", compressed.len().to_string())
            .body(compressed)
            .build()
    } else {
        builder
            .header("Content-Length", message.len().to_string())
            .body(message.to_vec())
            .build()
    };

    Ok(response)
}

fn user_agent(req: &Request) -> Response {
    let agent = req.header("User-Agent").unwrap_or_default().to_string();

    ResponseBuilder::new(StatusCode::Ok)
        .header("Content-Type", "text/plain")
        .header("Content-Length", agent.len().to_string())
        .body(agent)
        .build()
}

fn file_name(req: &Request) -> &str {
    &req.path[FILES_PREFIX.len()..]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rule_priority() {
        assert_eq!(match_route(Method::GET, "/"), Some(Route::Root));
        assert_eq!(match_route(Method::GET, "/echo/x"), Some(Route::Echo));
        assert_eq!(match_route(Method::GET, "/user-agent"), Some(Route::UserAgent));
        assert_eq!(match_route(Method::GET, "/user-agents"), Some(Route::UserAgent));
        assert_eq!(match_route(Method::GET, "/files/a"), Some(Route::ReadFile));
        assert_eq!(match_route(Method::POST, "/files/a"), Some(Route::WriteFile));

        assert_eq!(match_route(Method::POST, "/"), None);
        assert_eq!(match_route(Method::GET, "/echo"), None);
        assert_eq!(match_route(Method::PUT, "/files/a"), None);
        assert_eq!(match_route(Method::Other, "/"), None);
    }
}
