//! Static file server over the built bundle
//!
//! The browser needs the bundle served over HTTP. Unknown paths fall back
//! to the index document so client-side routes resolve like they would in
//! production.

use axum::Router;
use std::net::SocketAddr;
use std::path::PathBuf;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;
use tracing::{debug, warn};

use crate::error::{PlaywrightError, PlaywrightResult};

/// Handle to a running static server
pub struct ServerHandle {
    addr: SocketAddr,
    base_url: String,
    shutdown: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<std::io::Result<()>>>,
}

impl ServerHandle {
    /// Serve `config.static_dir` on `127.0.0.1:<port>`
    pub async fn spawn(config: ServerConfig) -> PlaywrightResult<Self> {
        let listener = TcpListener::bind(("127.0.0.1", config.port))
            .await
            .map_err(|e| {
                PlaywrightError::ServerStartup(format!("bind 127.0.0.1:{}: {}", config.port, e))
            })?;
        let addr = listener.local_addr()?;
        let base_url = format!("http://{}", addr);

        let index = config
            .index_path
            .clone()
            .unwrap_or_else(|| config.static_dir.join("index.html"));
        let router = Router::new()
            .fallback_service(ServeDir::new(&config.static_dir).fallback(ServeFile::new(index)))
            .layer(TraceLayer::new_for_http());

        let (tx, rx) = oneshot::channel::<()>();
        let task = tokio::spawn(async move {
            axum::serve(listener, router)
                .with_graceful_shutdown(async move {
                    let _ = rx.await;
                })
                .await
        });

        debug!("Serving {} at {}", config.static_dir.display(), base_url);
        Ok(Self {
            addr,
            base_url,
            shutdown: Some(tx),
            task: Some(task),
        })
    }

    /// Get the base URL for this server
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Stop the server and wait for it to finish
    pub async fn stop(&mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        if let Some(task) = self.task.take() {
            match task.await {
                Ok(Ok(())) => debug!("Static server on {} stopped", self.addr),
                Ok(Err(e)) => warn!("Static server exited with error: {}", e),
                Err(e) => warn!("Static server task failed: {}", e),
            }
        }
    }
}

impl Drop for ServerHandle {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

/// Configuration for the static server
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Directory containing the built bundle
    pub static_dir: PathBuf,

    /// Document served for unknown paths (default: `<static_dir>/index.html`)
    pub index_path: Option<PathBuf>,

    /// Port to listen on (0 = pick a free one)
    pub port: u16,
}

impl ServerConfig {
    pub fn new(static_dir: impl Into<PathBuf>) -> Self {
        Self {
            static_dir: static_dir.into(),
            index_path: None,
            port: 0,
        }
    }
}
