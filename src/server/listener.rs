use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::info;

use crate::config::Config;
use crate::http::connection::Connection;
use crate::router::Router;

/// Binds the configured address and serves until the task is dropped.
pub async fn run(cfg: &Config) -> anyhow::Result<()> {
    let listener = TcpListener::bind(&cfg.server.listen_addr)
        .await
        .with_context(|| format!("Failed to bind {}", cfg.server.listen_addr))?;
    info!(
        "Listening on {} (files from {})",
        listener.local_addr()?,
        cfg.files.directory.display()
    );

    let router = Arc::new(Router::new(cfg.files.directory.clone()));
    serve(listener, router, cfg.idle_timeout()).await
}

/// Accept loop. Every connection gets its own task; they share only the
/// router.
pub async fn serve(
    listener: TcpListener,
    router: Arc<Router>,
    idle_timeout: Duration,
) -> anyhow::Result<()> {
    loop {
        let (socket, peer) = listener.accept().await?;
        info!("Accepted connection from {}", peer);

        let router = Arc::clone(&router);
        tokio::spawn(async move {
            let mut conn = Connection::new(socket, peer.to_string(), router, idle_timeout);
            if let Err(e) = conn.run().await {
                tracing::error!("Connection error from {}: {}", peer, e);
            }
        });
    }
}
