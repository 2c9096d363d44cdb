//! HTTP server.

use std::io;
use std::net::SocketAddr;
use std::sync::Arc;

use log::info;
use tokio::net::{lookup_host, TcpListener};

use super::handlers::AppState;
use super::router::create_router;
use crate::config::ServerConfig;

pub struct WebServer {
    host: String,
    port: u16,
    app_state: Arc<AppState>,
    max_upload_bytes: usize,
}

/// Resolve `host:port`; `host` may be an IP literal or a name like `localhost`.
pub async fn resolve_addr(host: &str, port: u16) -> io::Result<SocketAddr> {
    lookup_host((host, port)).await?.next().ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("invalid server address: {}:{} did not resolve", host, port),
        )
    })
}

impl WebServer {
    pub fn new(config: &ServerConfig, app_state: AppState) -> Self {
        Self {
            host: config.host.clone(),
            port: config.port,
            app_state: Arc::new(app_state),
            max_upload_bytes: config.max_upload_bytes(),
        }
    }

    /// Serve until Ctrl-C. In-flight downloads are allowed to finish.
    pub async fn run(self) -> io::Result<()> {
        let addr = resolve_addr(&self.host, self.port).await?;
        let router = create_router(self.app_state, self.max_upload_bytes);
        let listener = TcpListener::bind(addr).await?;
        info!("listening on http://{}", listener.local_addr()?);

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown_signal())
            .await
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn resolves_ip_literals_and_hostnames() {
        let addr = resolve_addr("127.0.0.1", 5000).await.unwrap();
        assert_eq!(addr, "127.0.0.1:5000".parse::<SocketAddr>().unwrap());

        let addr = resolve_addr("localhost", 8080).await.unwrap();
        assert!(addr.ip().is_loopback());
        assert_eq!(addr.port(), 8080);
    }

    #[tokio::test]
    async fn rejects_malformed_hosts() {
        assert!(resolve_addr("not a host", 5000).await.is_err());
    }
}
