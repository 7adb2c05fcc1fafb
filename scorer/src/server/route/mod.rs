use std::sync::Arc;

use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Router;
use functions::function_router;
use public::local_route;
use score::{call_router, score_router};

use crate::core::config::Config;

pub(super) mod functions;
pub(super) mod public;
pub(super) mod score;

/// Fallback for every path no router matches.
pub async fn handler_404() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, "The requested resource was not found")
}

fn v1_route(config: Arc<Config>) -> Router {
    Router::new()
        .nest("/functions", function_router())
        .nest("/score", score_router(config.clone()))
        .nest("/calls", call_router(config))
}

pub(crate) fn server_router(config: Arc<Config>) -> Router {
    Router::new().merge(local_route()).nest("/api/v1", v1_route(config)).fallback(handler_404)
}
