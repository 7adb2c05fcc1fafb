use axum::response::Response;
use serde::{Deserialize, Serialize};

use super::error::ScoreRouteError;

/// Call identifier in the path of score routes.
///
/// Kept as a plain string so that malformed ids surface as
/// `ScoreRouteError::InvalidId` rather than a generic path rejection.
#[derive(Deserialize)]
pub struct CallUuid {
    pub call_uuid: String,
}

#[derive(Deserialize)]
pub struct FunctionName {
    pub name: String,
}

/// Query parameters of result retrieval.
#[derive(Debug, Default, Deserialize)]
pub struct ResultQuery {
    /// Overrides the configured cleanup behaviour when present
    pub cleanup: Option<bool>,
}

/// Represents a standardized API response structure.
///
/// # Examples
/// ```
/// use scorer::server::types::ApiResponse;
/// let response = ApiResponse::success_with_data(42, None);
/// assert!(response.success);
/// assert_eq!(response.data, Some(42));
///
/// let response = ApiResponse::error("Invalid call id".to_string());
/// assert!(!response.success);
/// assert_eq!(response.message, Some("Invalid call id".to_string()));
/// ```
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T = ()> {
    /// Indicates if the operation was successful
    pub success: bool,
    /// Optional data payload
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    /// Optional message, typically used for error details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ApiResponse<()> {
    pub fn error(message: String) -> Self {
        Self { success: false, data: None, message: Some(message) }
    }
}

impl<T> ApiResponse<T> {
    /// Creates a successful response with optional data and message.
    pub fn success_with_data(data: T, message: Option<String>) -> Self {
        Self { success: true, data: Some(data), message }
    }

    /// Creates an unsuccessful response that still carries a payload.
    pub fn failure_with_data(data: T, message: String) -> Self {
        Self { success: false, data: Some(data), message: Some(message) }
    }
}

/// Result type shared by the score and function route handlers.
pub type ScoreRouteResult = Result<Response<axum::body::Body>, ScoreRouteError>;
