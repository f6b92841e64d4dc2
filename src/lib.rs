//! Hearth - a small HTTP/1.1 server on raw TCP.
//!
//! Requests are framed by hand from a per-connection byte buffer, which
//! gives pipelining, keep-alive and an idle timeout without an HTTP library.

pub mod config;
pub mod http;
pub mod router;
pub mod server;
