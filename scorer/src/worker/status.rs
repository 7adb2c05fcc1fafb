use crate::core::client::storage::{ArtifactStore, StorageError};
use crate::core::config::Config;
use crate::types::artifact::{ArtifactLayout, ArtifactType};
use crate::types::call_id::CallId;
use crate::types::job::{CallStatus, JobState, StatusReport};

/// Three-state status from the files of a call alone.
///
/// * output present -> `Succeeded`
/// * input present, output missing -> `Running`
/// * neither -> `NotFound`
pub async fn infer_status_from_files(
    store: &dyn ArtifactStore,
    layout: &ArtifactLayout,
    call_id: &CallId,
) -> Result<CallStatus, StorageError> {
    if store.exists(&layout.path(call_id, ArtifactType::ModelOutput)).await? {
        return Ok(CallStatus::Succeeded);
    }
    if store.exists(&layout.path(call_id, ArtifactType::ModelInput)).await? {
        return Ok(CallStatus::Running);
    }
    Ok(CallStatus::NotFound)
}

/// Status of a call, combining the files with what this process remembers.
///
/// The tracker is read before the files. The runner writes the output before
/// it drops the record, so a call that finishes between the two reads shows
/// up as `Running` or `Succeeded`, never as `NotFound`. Calls the tracker no
/// longer holds (succeeded, evicted, or issued before a restart) fall back to
/// pure file inference.
pub async fn resolve_status(config: &Config, call_id: &CallId) -> Result<StatusReport, StorageError> {
    let tracked = config.tracker().get(call_id).await.map(|record| record.state);
    let from_files = infer_status_from_files(config.storage(), config.layout(), call_id).await?;

    let (status, error) = match tracked {
        Some(JobState::Failed(reason)) => (CallStatus::Failed, Some(reason)),
        // finished after the tracker was read
        Some(JobState::Running) if from_files == CallStatus::Succeeded => (CallStatus::Succeeded, None),
        Some(JobState::Running) => (CallStatus::Running, None),
        None => (from_files, None),
    };

    Ok(StatusReport { call_uuid: call_id.clone(), status, error })
}
