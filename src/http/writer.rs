use bytes::{BufMut, BytesMut};
use tokio::io::{AsyncWrite, AsyncWriteExt};

use crate::http::response::Response;

const HTTP_VERSION: &str = "HTTP/1.1";

/// Serializes a response into wire bytes.
///
/// Any `Connection` header set by the handler is replaced by the keep-alive
/// decision so it appears exactly once on every response.
pub fn serialize_response(resp: &Response, keep_alive: bool) -> BytesMut {
    let mut buf = BytesMut::with_capacity(128 + resp.body.len());

    // Status line
    let status_line = format!(
        "{} {} {}\r\n",
        HTTP_VERSION,
        resp.status.as_u16(),
        resp.status.reason_phrase()
    );
    buf.put_slice(status_line.as_bytes());

    // Headers
    for (k, v) in &resp.headers {
        if k.eq_ignore_ascii_case("Connection") {
            continue;
        }
        put_header(&mut buf, k, v);
    }
    put_header(
        &mut buf,
        "Connection",
        if keep_alive { "keep-alive" } else { "close" },
    );

    // Header/body separator
    buf.put_slice(b"\r\n");

    // Body
    buf.put_slice(&resp.body);

    buf
}

fn put_header(buf: &mut BytesMut, name: &str, value: &str) {
    buf.put_slice(name.as_bytes());
    buf.put_slice(b": ");
    buf.put_slice(value.as_bytes());
    buf.put_slice(b"\r\n");
}

pub struct ResponseWriter {
    buffer: BytesMut,
    written: usize,
}

impl ResponseWriter {
    pub fn new(response: &Response, keep_alive: bool) -> Self {
        Self {
            buffer: serialize_response(response, keep_alive),
            written: 0,
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buffer
    }

    pub async fn write_to_stream<W>(&mut self, stream: &mut W) -> anyhow::Result<()>
    where
        W: AsyncWrite + Unpin,
    {
        while self.written < self.buffer.len() {
            let n = stream.write(&self.buffer[self.written..]).await?;

            if n == 0 {
                return Err(anyhow::anyhow!("connection closed while writing"));
            }

            self.written += n;
        }

        stream.flush().await?;
        Ok(())
    }
}
