use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use tracing::{error, info, instrument};

use super::super::error::ScoreRouteError;
use super::super::types::{ApiResponse, CallUuid, FunctionName, ResultQuery, ScoreRouteResult};
use crate::core::config::Config;
use crate::types::call_id::CallId;
use crate::types::constant::OUTPUT_PREFIX;
use crate::types::job::{CallStatus, ScoreRequest};
use crate::worker::ScoreService;

fn parse_call_id(raw: &str) -> Result<CallId, ScoreRouteError> {
    CallId::parse(raw).map_err(|e| ScoreRouteError::InvalidId(format!("{}: {}", raw, e)))
}

/// Starts an asynchronous scoring call.
///
/// Validates the inputs against the function, issues a call id, writes the
/// input artifacts and returns `202 Accepted` before the evaluation runs.
///
/// # Errors
/// * `ScoreRouteError::UnknownFunction` - no such function
/// * `ScoreRouteError::InvalidRequest` - malformed body, missing inputs or bad `run_id`
/// * `ScoreRouteError::InternalError` - the input artifacts could not be written
#[instrument(skip(payload, config), fields(function = %name))]
async fn handle_async_score_request(
    Path(FunctionName { name }): Path<FunctionName>,
    State(config): State<Arc<Config>>,
    payload: Result<Json<ScoreRequest>, JsonRejection>,
) -> ScoreRouteResult {
    let Json(request) = payload.map_err(|e| ScoreRouteError::InvalidRequest(e.body_text()))?;

    match ScoreService::start_call(&name, request, config).await {
        Ok(accepted) => {
            info!(call_uuid = %accepted.call_uuid, "Scoring call accepted");
            let message = format!("Call {} started", accepted.call_uuid);
            Ok((StatusCode::ACCEPTED, Json(ApiResponse::success_with_data(accepted, Some(message)))).into_response())
        }
        Err(e) => {
            error!(error = %e, "Failed to start scoring call");
            Err(e.into())
        }
    }
}

/// Reports the status of a call. Unknown calls answer 404 with the same
/// body shape so that pollers can treat every answer uniformly.
#[instrument(skip(config), fields(call_uuid = %call_uuid))]
async fn handle_status_request(
    Path(CallUuid { call_uuid }): Path<CallUuid>,
    State(config): State<Arc<Config>>,
) -> ScoreRouteResult {
    let call_id = parse_call_id(&call_uuid)?;
    let report = ScoreService::status(&call_id, &config).await?;

    if report.status == CallStatus::NotFound {
        let message = format!("Call {} not found", call_id);
        return Ok((StatusCode::NOT_FOUND, Json(ApiResponse::failure_with_data(report, message))).into_response());
    }
    Ok(Json(ApiResponse::success_with_data(report, None)).into_response())
}

/// Serves the output CSV of a finished call.
///
/// `?cleanup=true|false` overrides the configured default; when cleanup
/// applies, every artifact of the call is deleted once the body is read.
#[instrument(skip(config, query), fields(call_uuid = %call_uuid))]
async fn handle_result_request(
    Path(CallUuid { call_uuid }): Path<CallUuid>,
    Query(query): Query<ResultQuery>,
    State(config): State<Arc<Config>>,
) -> ScoreRouteResult {
    let call_id = parse_call_id(&call_uuid)?;
    let cleanup = query.cleanup.unwrap_or(config.service_config().cleanup_on_retrieval);

    let data = ScoreService::fetch_result(&call_id, cleanup, &config).await?;
    let disposition = format!("attachment; filename=\"{}{}.csv\"", OUTPUT_PREFIX, call_id);

    Ok((
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/csv".to_string()), (header::CONTENT_DISPOSITION, disposition)],
        data,
    )
        .into_response())
}

/// Deletes the artifacts of a finished or failed call.
#[instrument(skip(config), fields(call_uuid = %call_uuid))]
async fn handle_delete_request(
    Path(CallUuid { call_uuid }): Path<CallUuid>,
    State(config): State<Arc<Config>>,
) -> ScoreRouteResult {
    let call_id = parse_call_id(&call_uuid)?;
    let report = ScoreService::cleanup(&call_id, &config).await?;

    info!(removed = report.removed.len(), "Call artifacts removed");
    let message = format!("Call {} cleaned up", call_id);
    Ok(Json(ApiResponse::success_with_data(report, Some(message))).into_response())
}

/// Creates the router that starts scoring calls.
pub(super) fn score_router(config: Arc<Config>) -> Router {
    Router::new().route("/:name", post(handle_async_score_request)).with_state(config)
}

/// Creates the router for endpoints addressing an existing call by its id.
pub(super) fn call_router(config: Arc<Config>) -> Router {
    Router::new()
        .route("/:call_uuid", delete(handle_delete_request))
        .route("/:call_uuid/status", get(handle_status_request))
        .route("/:call_uuid/result", get(handle_result_request))
        .with_state(config)
}
