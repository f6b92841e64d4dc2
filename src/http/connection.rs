use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::time::timeout;
use tracing::{debug, info, trace, warn};

use crate::http::buffer::Accumulator;
use crate::http::parser::frame_request;
use crate::http::response::{Response, StatusCode};
use crate::http::writer::ResponseWriter;
use crate::router::Router;

const READ_CHUNK: usize = 4096;

/// Drives one client connection: read, frame, dispatch, respond.
///
/// Generic over the stream so it runs on a `TcpStream` in production and on
/// in-memory duplex pipes in tests.
pub struct Connection<S> {
    stream: S,
    peer: String,
    buffer: Accumulator,
    state: ConnectionState,
    requests: u64,
    idle_timeout: Duration,
    router: Arc<Router>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Open,
    Closing(CloseReason),
    Closed(CloseReason),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseReason {
    /// The peer closed its side first.
    ClientClosed,
    /// The request carried `Connection: close`.
    KeepAliveDeclined,
    /// The response itself demanded closing, e.g. after a malformed request.
    Forced,
    /// No bytes arrived within the idle timeout.
    IdleTimeout,
}

impl fmt::Display for CloseReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            CloseReason::ClientClosed => "client closed",
            CloseReason::KeepAliveDeclined => "keep-alive declined",
            CloseReason::Forced => "closed by response",
            CloseReason::IdleTimeout => "idle timeout",
        };
        f.write_str(s)
    }
}

impl<S> Connection<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    pub fn new(
        stream: S,
        peer: impl Into<String>,
        router: Arc<Router>,
        idle_timeout: Duration,
    ) -> Self {
        Self {
            stream,
            peer: peer.into(),
            buffer: Accumulator::new(),
            state: ConnectionState::Open,
            requests: 0,
            idle_timeout,
            router,
        }
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    /// Number of requests answered so far.
    pub fn requests_served(&self) -> u64 {
        self.requests
    }

    /// Runs the connection to completion and reports why it ended.
    pub async fn run(&mut self) -> anyhow::Result<CloseReason> {
        loop {
            match self.state {
                ConnectionState::Open => {
                    if let Some(reason) = self.process_buffered().await? {
                        self.state = ConnectionState::Closing(reason);
                        continue;
                    }

                    if let Some(reason) = self.read_more().await? {
                        self.state = ConnectionState::Closing(reason);
                    }
                }

                ConnectionState::Closing(reason) => {
                    // The peer may already be gone; nothing left to report then.
                    if let Err(e) = self.stream.shutdown().await {
                        debug!(peer = %self.peer, error = %e, "Shutdown after close failed");
                    }
                    info!(
                        peer = %self.peer,
                        requests = self.requests,
                        reason = %reason,
                        "Connection closed"
                    );
                    self.state = ConnectionState::Closed(reason);
                }

                ConnectionState::Closed(reason) => return Ok(reason),
            }
        }
    }

    /// Answers every complete request currently buffered, in order.
    ///
    /// Returns a close reason once a response ends the connection.
    async fn process_buffered(&mut self) -> anyhow::Result<Option<CloseReason>> {
        loop {
            let request = match frame_request(&mut self.buffer) {
                Ok(Some(request)) => request,
                Ok(None) => {
                    if !self.buffer.is_empty() {
                        debug!(
                            peer = %self.peer,
                            buffered = self.buffer.len(),
                            "Partial request, waiting for more data"
                        );
                    }
                    return Ok(None);
                }
                Err(e) => {
                    warn!(peer = %self.peer, error = %e, "Malformed request");
                    let response = Response::builder(StatusCode::BadRequest).close().build();
                    self.requests += 1;
                    self.respond(&response, false).await?;
                    return Ok(Some(CloseReason::Forced));
                }
            };

            self.requests += 1;
            let response = self.router.dispatch(&request).await;
            let keep_alive = request.keep_alive() && !response.force_close;

            info!(
                peer = %self.peer,
                request = self.requests,
                method = %request.method,
                path = %request.path,
                status = response.status.as_u16(),
                "Request processed"
            );

            self.respond(&response, keep_alive).await?;

            if !keep_alive {
                let reason = if response.force_close {
                    CloseReason::Forced
                } else {
                    CloseReason::KeepAliveDeclined
                };
                return Ok(Some(reason));
            }
        }
    }

    /// Waits for the next chunk, bounded by the idle timeout.
    async fn read_more(&mut self) -> anyhow::Result<Option<CloseReason>> {
        let mut temp = [0u8; READ_CHUNK];

        match timeout(self.idle_timeout, self.stream.read(&mut temp)).await {
            Err(_elapsed) => {
                if !self.buffer.is_empty() {
                    debug!(
                        peer = %self.peer,
                        discarded = self.buffer.len(),
                        "Dropping partial request on idle timeout"
                    );
                }
                self.buffer.clear();
                Ok(Some(CloseReason::IdleTimeout))
            }
            Ok(Ok(0)) => Ok(Some(CloseReason::ClientClosed)),
            Ok(Ok(n)) => {
                trace!(peer = %self.peer, bytes = n, "Read chunk");
                self.buffer.append(&temp[..n]);
                Ok(None)
            }
            Ok(Err(e)) => Err(e.into()),
        }
    }

    async fn respond(&mut self, response: &Response, keep_alive: bool) -> anyhow::Result<()> {
        let mut writer = ResponseWriter::new(response, keep_alive);
        writer.write_to_stream(&mut self.stream).await
    }
}
