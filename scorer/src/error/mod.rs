use scorer_functions::FunctionError;
use thiserror::Error;

use crate::core::client::storage::StorageError;
use crate::types::call_id::{CallId, CallIdError};

/// Result type for scorer operations
pub type ScorerResult<T> = Result<T, ScorerError>;

/// Error types for the scorer
#[derive(Error, Debug)]
pub enum ScorerError {
    #[error("Storage error: {0}")]
    StorageError(#[from] StorageError),

    #[error("Function error: {0}")]
    FunctionError(#[from] FunctionError),

    #[error("Invalid call id: {0}")]
    CallIdError(#[from] CallIdError),

    /// Raised when the artifacts of a new call could not be written
    #[error("Could not initialise scoring call: {0}")]
    InitScoringError(String),

    #[error("Call {0} not found")]
    CallNotFound(CallId),

    #[error("Call {call_uuid} is {state}")]
    InvalidJobState { call_uuid: CallId, state: String },

    #[error("Could not encode output: {0}")]
    OutputEncodingError(String),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Scorer Error: {0}")]
    ScorerAnyHowError(#[from] anyhow::Error),
}
