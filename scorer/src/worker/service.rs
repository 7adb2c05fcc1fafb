use std::sync::Arc;

use bytes::Bytes;
use chrono::Utc;
use scorer_functions::FunctionKind;
use tracing::{debug, info, instrument, warn};

use super::status::resolve_status;
use crate::core::client::storage::StorageError;
use crate::core::config::Config;
use crate::error::{ScorerError, ScorerResult};
use crate::types::artifact::ArtifactType;
use crate::types::call_id::CallId;
use crate::types::constant::MAX_CALL_ID_ATTEMPTS;
use crate::types::job::{
    CallStatus, CleanupReport, InputDocument, PodSpec, ScoreAccepted, ScoreRequest, ScoringJob, StatusReport,
};

pub struct ScoreService;

impl ScoreService {
    /// Validates a scoring request, writes its input artifacts and hands the
    /// evaluation to the background runner.
    ///
    /// Returns as soon as the call is registered; the client polls
    /// [`ScoreService::status`] afterwards.
    ///
    /// # Errors
    /// * `FunctionError` - unknown function or invalid inputs
    /// * `CallIdError` - the `run_id` cannot be part of a call id
    /// * `InitScoringError` - the input artifacts could not be written
    #[instrument(skip(request, config), fields(call_uuid))]
    pub async fn start_call(function: &str, request: ScoreRequest, config: Arc<Config>) -> ScorerResult<ScoreAccepted> {
        let function = FunctionKind::parse(function)?;
        let args = function.bind(&request.inputs)?;

        let call_id = Self::issue_call_id(function, request.run_id.as_deref(), &config).await?;
        tracing::Span::current().record("call_uuid", call_id.as_str());

        if let Err(e) = Self::write_input_artifacts(&call_id, function, &request, &config).await {
            warn!(error = %e, "Failed to initialise scoring call, rolling back");
            Self::remove_artifacts(&call_id, &config).await;
            config.tracker().forget(&call_id).await;
            return Err(ScorerError::InitScoringError(e.to_string()));
        }

        config.runner().submit(ScoringJob { call_uuid: call_id.clone(), function, args }, config.clone());
        info!(function = %function, "Scoring call started");

        Ok(ScoreAccepted { call_uuid: call_id, status: CallStatus::Running })
    }

    async fn issue_call_id(function: FunctionKind, run_id: Option<&str>, config: &Config) -> ScorerResult<CallId> {
        let prefix = &config.service_config().call_id_prefix;

        for attempt in 1..=MAX_CALL_ID_ATTEMPTS {
            let call_id = CallId::generate(prefix, run_id)?;
            let taken_on_disk = config.storage().exists(&config.layout().call_dir(&call_id)).await?;
            if !taken_on_disk && config.tracker().register(&call_id, function).await {
                return Ok(call_id);
            }
            debug!(call_uuid = %call_id, attempt, "Call id already in use, generating another one");
        }

        Err(ScorerError::InitScoringError(format!("no free call id after {} attempts", MAX_CALL_ID_ATTEMPTS)))
    }

    async fn write_input_artifacts(
        call_id: &CallId,
        function: FunctionKind,
        request: &ScoreRequest,
        config: &Config,
    ) -> ScorerResult<()> {
        let layout = config.layout();
        let submitted_at = Utc::now();
        let input_path = layout.path(call_id, ArtifactType::ModelInput);

        let document = InputDocument {
            call_uuid: call_id.clone(),
            function,
            inputs: request.inputs.clone(),
            run_id: request.run_id.clone(),
            submitted_at,
        };
        config.storage().put_data(Bytes::from(serde_json::to_vec_pretty(&document)?), &input_path).await?;

        if config.service_config().write_pod_spec {
            let pod_spec = PodSpec {
                call_uuid: call_id.clone(),
                function,
                input_path: input_path.display().to_string(),
                output_path: layout.path(call_id, ArtifactType::ModelOutput).display().to_string(),
                submitted_at,
                service_version: env!("CARGO_PKG_VERSION").to_string(),
            };
            let pod_spec_path = layout.path(call_id, ArtifactType::ModelPodSpec);
            config.storage().put_data(Bytes::from(serde_json::to_vec_pretty(&pod_spec)?), &pod_spec_path).await?;
        }

        Ok(())
    }

    pub async fn status(call_id: &CallId, config: &Config) -> ScorerResult<StatusReport> {
        Ok(resolve_status(config, call_id).await?)
    }

    /// Returns the output CSV of a finished call, deleting every artifact of
    /// the call afterwards when `cleanup` is set.
    #[instrument(skip(call_id, config), fields(call_uuid = %call_id))]
    pub async fn fetch_result(call_id: &CallId, cleanup: bool, config: &Config) -> ScorerResult<Bytes> {
        let report = resolve_status(config, call_id).await?;
        match report.status {
            CallStatus::Succeeded => {}
            CallStatus::NotFound => return Err(ScorerError::CallNotFound(call_id.clone())),
            CallStatus::Running => {
                return Err(ScorerError::InvalidJobState { call_uuid: call_id.clone(), state: "still running".into() })
            }
            CallStatus::Failed => {
                let reason = report.error.unwrap_or_default();
                let state = format!("failed: {reason}");
                return Err(ScorerError::InvalidJobState { call_uuid: call_id.clone(), state });
            }
        }

        let output_path = config.layout().path(call_id, ArtifactType::ModelOutput);
        let data = config.storage().get_data(&output_path).await.map_err(|e| match e {
            StorageError::NotFound(_) => ScorerError::CallNotFound(call_id.clone()),
            other => other.into(),
        })?;
        info!(bytes = data.len(), "Serving scoring result");

        if cleanup {
            Self::remove_artifacts(call_id, config).await;
            config.tracker().forget(call_id).await;
        }

        Ok(data)
    }

    /// Deletes the artifacts of a call that is no longer running.
    #[instrument(skip(call_id, config), fields(call_uuid = %call_id))]
    pub async fn cleanup(call_id: &CallId, config: &Config) -> ScorerResult<CleanupReport> {
        let report = resolve_status(config, call_id).await?;
        match report.status {
            CallStatus::NotFound => return Err(ScorerError::CallNotFound(call_id.clone())),
            CallStatus::Running => {
                return Err(ScorerError::InvalidJobState { call_uuid: call_id.clone(), state: "still running".into() })
            }
            CallStatus::Succeeded | CallStatus::Failed => {}
        }

        let removed = Self::remove_artifacts(call_id, config).await;
        config.tracker().forget(call_id).await;

        Ok(CleanupReport { call_uuid: call_id.clone(), removed: removed.iter().map(|a| a.to_string()).collect() })
    }

    /// Best effort: failures are logged and the remaining artifacts are
    /// still attempted. Returns the artifacts that were actually removed.
    async fn remove_artifacts(call_id: &CallId, config: &Config) -> Vec<ArtifactType> {
        let mut removed = Vec::new();
        for (artifact, path) in config.layout().all_paths(call_id) {
            match config.storage().delete_data(&path).await {
                Ok(true) => removed.push(artifact),
                Ok(false) => {}
                Err(e) => warn!(error = %e, artifact = %artifact, "Failed to remove artifact"),
            }
        }
        if let Err(e) = config.storage().prune_empty_dirs(&config.layout().call_dir(call_id)).await {
            warn!(error = %e, "Failed to remove call directory");
        }
        removed
    }
}
