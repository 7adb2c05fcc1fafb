use axum::extract::rejection::JsonRejection;
use axum::extract::Path;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use scorer_functions::{Evaluation, FunctionDescriptor, FunctionKind, Inputs};
use strum::IntoEnumIterator;
use tracing::{info, instrument};

use super::super::error::ScoreRouteError;
use super::super::types::{ApiResponse, FunctionName, ScoreRouteResult};
use crate::error::ScorerError;

/// Lists every function the service can evaluate.
async fn handle_list_functions() -> ScoreRouteResult {
    let descriptors: Vec<FunctionDescriptor> = FunctionKind::iter().map(|kind| kind.descriptor()).collect();
    Ok(Json(ApiResponse::success_with_data(descriptors, None)).into_response())
}

/// Evaluates a function synchronously.
///
/// The body is the inputs object itself, e.g. `{"x1": 0.1, ..., "x6": 0.6}`.
/// Nothing is written to disk.
#[instrument(skip(payload), fields(function = %name))]
async fn handle_evaluate_request(
    Path(FunctionName { name }): Path<FunctionName>,
    payload: Result<Json<Inputs>, JsonRejection>,
) -> ScoreRouteResult {
    let Json(inputs) = payload.map_err(|e| ScoreRouteError::InvalidRequest(e.body_text()))?;

    let function = FunctionKind::parse(&name).map_err(ScorerError::from)?;
    let evaluation: Evaluation = function.evaluate_inputs(&inputs).map_err(ScorerError::from)?;

    info!("Evaluated function synchronously");
    Ok(Json(ApiResponse::success_with_data(evaluation, None)).into_response())
}

pub(super) fn function_router() -> Router {
    Router::new().route("/", get(handle_list_functions)).route("/:name/evaluate", post(handle_evaluate_request))
}
