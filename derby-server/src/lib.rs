//! ## derby-server
//! **Static asset server**
//!
//! Serves a directory (sprites, page assets) over plain HTTP. Nothing here
//! talks to a running race.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use axum::Router;
use thiserror::Error;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::{error, info, instrument};

use derby_config::ServerConfig;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Asset root not found: {0}")]
    RootMissing(PathBuf),

    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Server exited unexpectedly: {0}")]
    Serve(#[from] std::io::Error),
}

/// Router serving `root` at `/`, with `index.html` for directories.
pub fn router(root: &Path) -> Router {
    Router::new()
        .fallback_service(ServeDir::new(root).append_index_html_on_directories(true))
        .layer(TraceLayer::new_for_http())
}

/// Binds `config.bind`. Split from `serve_on` so callers can learn the
/// bound port first.
pub async fn bind(config: &ServerConfig) -> Result<TcpListener, ServerError> {
    if !config.root.is_dir() {
        return Err(ServerError::RootMissing(config.root.clone()));
    }
    TcpListener::bind(config.bind.as_str())
        .await
        .map_err(|source| ServerError::Bind {
            addr: config.bind.clone(),
            source,
        })
}

/// Serves until `shutdown` is cancelled.
#[instrument(level = "info", skip_all, fields(root = %root.display()))]
pub async fn serve_on(
    listener: TcpListener,
    root: PathBuf,
    shutdown: CancellationToken,
) -> Result<(), ServerError> {
    let addr: SocketAddr = listener.local_addr()?;
    info!("Listening on http://{addr}");

    if let Err(err) = axum::serve(listener, router(&root))
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await
    {
        error!("Server exited unexpectedly: {err}");
        return Err(ServerError::Serve(err));
    }
    info!("Server stopped");
    Ok(())
}

pub async fn serve(config: &ServerConfig, shutdown: CancellationToken) -> Result<(), ServerError> {
    let listener = bind(config).await?;
    serve_on(listener, config.root.clone(), shutdown).await
}
