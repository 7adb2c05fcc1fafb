use tracing::info;

use crate::cli::RunCmd;
use crate::core::client::storage::{ArtifactStore, LocalFileStore};
use crate::error::{ScorerError, ScorerResult};
use crate::types::artifact::ArtifactLayout;
use crate::types::call_id::validate_prefix;
use crate::types::params::{ServerParams, ServiceParams};
use crate::worker::runner::JobRunner;
use crate::worker::tracker::JobTracker;

/// Shared state handed to every route handler and background task.
pub struct Config {
    server_config: ServerParams,
    service_config: ServiceParams,
    layout: ArtifactLayout,
    storage: Box<dyn ArtifactStore>,
    tracker: JobTracker,
    runner: JobRunner,
}

impl Config {
    pub fn new(
        server_config: ServerParams,
        service_config: ServiceParams,
        storage: Box<dyn ArtifactStore>,
    ) -> ScorerResult<Self> {
        validate_prefix(&service_config.call_id_prefix)?;
        let layout = ArtifactLayout::new(&service_config.data_folder);

        Ok(Self {
            server_config,
            service_config,
            layout,
            storage,
            tracker: JobTracker::default(),
            runner: JobRunner::default(),
        })
    }

    /// Builds the configuration from the `run` command, backed by the local
    /// filesystem store after checking that the data folder is writable.
    pub async fn from_run_cmd(run_cmd: &RunCmd) -> ScorerResult<Self> {
        let server_config = ServerParams::from(run_cmd.server_args.clone());
        let service_config = ServiceParams::from(run_cmd.service_args.clone());

        let storage = LocalFileStore::new(&service_config.data_folder);
        storage
            .health_check()
            .await
            .map_err(|e| ScorerError::ConfigError(format!("Data folder is not usable: {}", e)))?;
        info!(data_folder = %service_config.data_folder.display(), "Artifact storage ready");

        Self::new(server_config, service_config, Box::new(storage))
    }

    pub fn server_config(&self) -> &ServerParams {
        &self.server_config
    }

    pub fn service_config(&self) -> &ServiceParams {
        &self.service_config
    }

    pub fn layout(&self) -> &ArtifactLayout {
        &self.layout
    }

    pub fn storage(&self) -> &dyn ArtifactStore {
        self.storage.as_ref()
    }

    pub fn tracker(&self) -> &JobTracker {
        &self.tracker
    }

    pub fn runner(&self) -> &JobRunner {
        &self.runner
    }
}
