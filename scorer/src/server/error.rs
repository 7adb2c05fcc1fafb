use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use scorer_functions::FunctionError;
use tracing::error;

use super::types::ApiResponse;
use crate::error::ScorerError;

/// Errors returned by the HTTP handlers.
///
/// # Status Code Mapping
/// * `InvalidId` -> 400 Bad Request
/// * `InvalidRequest` -> 422 Unprocessable Entity
/// * `UnknownFunction` -> 404 Not Found
/// * `NotFound` -> 404 Not Found
/// * `InvalidJobState` -> 409 Conflict
/// * `InternalError` -> 500 Internal Server Error
///
/// All of them are rendered as `{"success": false, "message": "..."}`.
#[derive(Debug, thiserror::Error)]
pub enum ScoreRouteError {
    /// The call id in the path is not a valid call id
    #[error("Invalid call id: {0}")]
    InvalidId(String),

    /// The body does not describe a valid evaluation
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Unknown function: {0}")]
    UnknownFunction(String),

    #[error("Call not found: {0}")]
    NotFound(String),

    /// The call exists but its result cannot be served in its current state
    #[error("Invalid job state: {0}")]
    InvalidJobState(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl IntoResponse for ScoreRouteError {
    fn into_response(self) -> Response {
        let status = match &self {
            ScoreRouteError::InvalidId(_) => StatusCode::BAD_REQUEST,
            ScoreRouteError::InvalidRequest(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ScoreRouteError::UnknownFunction(_) | ScoreRouteError::NotFound(_) => StatusCode::NOT_FOUND,
            ScoreRouteError::InvalidJobState(_) => StatusCode::CONFLICT,
            ScoreRouteError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(ApiResponse::error(self.to_string()))).into_response()
    }
}

impl From<ScorerError> for ScoreRouteError {
    fn from(err: ScorerError) -> Self {
        match err {
            ScorerError::FunctionError(FunctionError::UnknownFunction(name, supported)) => {
                ScoreRouteError::UnknownFunction(format!("{}. Supported values are: {}", name, supported))
            }
            ScorerError::FunctionError(e) => ScoreRouteError::InvalidRequest(e.to_string()),
            ScorerError::CallIdError(e) => ScoreRouteError::InvalidRequest(e.to_string()),
            ScorerError::CallNotFound(id) => ScoreRouteError::NotFound(id.to_string()),
            ScorerError::InvalidJobState { call_uuid, state } => {
                ScoreRouteError::InvalidJobState(format!("call {} is {}", call_uuid, state))
            }
            other => {
                error!(error = %other, "Internal error while handling request");
                ScoreRouteError::InternalError(other.to_string())
            }
        }
    }
}
