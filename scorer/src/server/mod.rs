pub mod error;
pub mod route;
pub mod types;

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use crate::core::config::Config;
use crate::server::route::server_router;
use crate::types::params::ServerParams;
use crate::ScorerResult;

pub use error::ScoreRouteError;

/// Handle for managing the HTTP server lifecycle.
pub struct ServerHandle {
    shutdown_token: CancellationToken,
    task_handle: JoinHandle<()>,
}

impl ServerHandle {
    /// Stops accepting new connections and waits for in-flight requests.
    pub async fn shutdown(self) -> Result<(), tokio::task::JoinError> {
        info!("Initiating server graceful shutdown");
        self.shutdown_token.cancel();
        self.task_handle.await
    }
}

/// Sets up and starts the HTTP server with configured routes.
///
/// The server runs in its own tokio task; the returned address is the one
/// actually bound, which matters when the configured port is `0`.
///
/// # Errors
/// * If the address cannot be bound
pub async fn setup_server(config: Arc<Config>) -> ScorerResult<(SocketAddr, ServerHandle)> {
    let (api_server_url, listener) = get_server_url(config.server_config()).await?;

    let shutdown_token = CancellationToken::new();
    let server_token = shutdown_token.clone();

    let app = server_router(config.clone());
    let task_handle = tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).with_graceful_shutdown(server_token.cancelled_owned()).await {
            error!(error = %e, "Server error");
        }
    });

    info!("Scorer listening on http://{}", api_server_url);
    info!("Available endpoints:");
    info!("  GET    /health");
    info!("  GET    /api/v1/functions");
    info!("  POST   /api/v1/functions/{{name}}/evaluate");
    info!("  POST   /api/v1/score/{{function}}");
    info!("  GET    /api/v1/calls/{{call_uuid}}/status");
    info!("  GET    /api/v1/calls/{{call_uuid}}/result");
    info!("  DELETE /api/v1/calls/{{call_uuid}}");

    Ok((api_server_url, ServerHandle { shutdown_token, task_handle }))
}

pub(crate) async fn get_server_url(
    server_params: &ServerParams,
) -> ScorerResult<(SocketAddr, tokio::net::TcpListener)> {
    let address = format!("{}:{}", server_params.host, server_params.port);
    let listener = tokio::net::TcpListener::bind(address).await?;
    let api_server_url = listener.local_addr()?;

    Ok((api_server_url, listener))
}
