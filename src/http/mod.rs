//! HTTP protocol implementation.
//!
//! A minimal HTTP/1.1 server layer with keep-alive, pipelining and an idle
//! timeout, built directly on a byte stream.
//!
//! # Architecture
//!
//! - **`buffer`**: Per-connection byte accumulator
//! - **`parser`**: Frames complete requests out of the accumulator
//! - **`headers`**: Case-insensitive header lookup
//! - **`request`**: HTTP request representation and the keep-alive decision
//! - **`response`**: HTTP response representation with builder pattern
//! - **`writer`**: Serializes and writes HTTP responses to the client
//! - **`connection`**: The per-connection supervisor loop
//!
//! # Connection State Machine
//!
//! ```text
//!        ┌─────────────┐
//!        │    Open     │ ← read chunk, frame and answer every complete request
//!        └──────┬──────┘
//!               │ Connection: close / idle timeout / peer closed
//!               ▼
//!        ┌──────────────────┐
//!        │     Closing      │ ← last response flushed, write half shut down
//!        └──────┬───────────┘
//!               ▼
//!        ┌──────────────────┐
//!        │      Closed      │
//!        └──────────────────┘
//! ```
//!
//! # Example
//!
//! ```ignore
//! use hearth::http::connection::Connection;
//! use hearth::router::Router;
//! use std::{sync::Arc, time::Duration};
//! use tokio::net::TcpListener;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let listener = TcpListener::bind("127.0.0.1:4221").await?;
//!     let router = Arc::new(Router::new("."));
//!
//!     loop {
//!         let (socket, addr) = listener.accept().await?;
//!         let router = Arc::clone(&router);
//!         tokio::spawn(async move {
//!             let mut conn = Connection::new(socket, addr.to_string(), router, Duration::from_secs(5));
//!             if let Err(e) = conn.run().await {
//!                 eprintln!("Connection error: {}", e);
//!             }
//!         });
//!     }
//! }
//! ```

pub mod buffer;
pub mod connection;
pub mod headers;
pub mod parser;
pub mod request;
pub mod response;
pub mod writer;
