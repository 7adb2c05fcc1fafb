use chrono::{DateTime, Utc};
use scorer_functions::{FunctionKind, Inputs};
use serde::{Deserialize, Serialize};

use super::call_id::CallId;

/// Status reported to clients polling a call.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum CallStatus {
    /// The input has been accepted and no output exists yet
    Running,
    /// The output file is available for retrieval
    Succeeded,
    /// The background evaluation failed, the reason is kept in memory only
    Failed,
    /// Nothing is known about the call
    NotFound,
}

/// In-process state of a call issued by this instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobState {
    Running,
    Failed(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct JobRecord {
    pub function: FunctionKind,
    pub state: JobState,
    pub submitted_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
}

/// Body of an async score request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreRequest {
    pub inputs: Inputs,
    /// Appended to the generated call id when present
    #[serde(default)]
    pub run_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreAccepted {
    pub call_uuid: CallId,
    pub status: CallStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusReport {
    pub call_uuid: CallId,
    pub status: CallStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CleanupReport {
    pub call_uuid: CallId,
    pub removed: Vec<String>,
}

/// Contents of the input artifact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputDocument {
    pub call_uuid: CallId,
    pub function: FunctionKind,
    pub inputs: Inputs,
    pub run_id: Option<String>,
    pub submitted_at: DateTime<Utc>,
}

/// Execution manifest written next to the input when enabled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PodSpec {
    pub call_uuid: CallId,
    pub function: FunctionKind,
    pub input_path: String,
    pub output_path: String,
    pub submitted_at: DateTime<Utc>,
    pub service_version: String,
}

/// Everything the background runner needs to evaluate one call.
#[derive(Debug, Clone)]
pub struct ScoringJob {
    pub call_uuid: CallId,
    pub function: FunctionKind,
    pub args: Vec<f64>,
}
