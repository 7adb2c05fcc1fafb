use std::sync::Arc;

use chrono::Utc;
use tokio::task::JoinHandle;
use tokio_util::task::TaskTracker;
use tracing::{error, info, info_span, Instrument};

use super::output::encode_metrics_csv;
use crate::core::config::Config;
use crate::error::ScorerResult;
use crate::types::artifact::ArtifactType;
use crate::types::job::ScoringJob;

/// Spawns one background task per scoring call and keeps track of them so
/// shutdown can wait for in-flight evaluations.
#[derive(Clone, Default)]
pub struct JobRunner {
    tasks: TaskTracker,
}

impl JobRunner {
    pub fn submit(&self, job: ScoringJob, config: Arc<Config>) -> JoinHandle<()> {
        let span = info_span!("scoring_job", call_uuid = %job.call_uuid, function = %job.function);

        self.tasks.spawn(
            async move {
                match run_scoring_job(&job, &config).await {
                    Ok(()) => {
                        let elapsed_ms = config
                            .tracker()
                            .mark_succeeded(&job.call_uuid)
                            .await
                            .map(|record| (Utc::now() - record.submitted_at).num_milliseconds());
                        info!(elapsed_ms = ?elapsed_ms, "Scoring call succeeded");
                    }
                    Err(e) => {
                        error!(error = %e, "Scoring call failed");
                        config.tracker().mark_failed(&job.call_uuid, e.to_string()).await;
                    }
                }
            }
            .instrument(span),
        )
    }

    pub fn in_flight(&self) -> usize {
        self.tasks.len()
    }

    /// Closes the runner and waits for every submitted task to finish.
    pub async fn shutdown(&self) {
        info!(in_flight = self.tasks.len(), "Waiting for scoring calls to finish");
        self.tasks.close();
        self.tasks.wait().await;
    }
}

/// Evaluates the function and writes the output CSV of the call.
pub async fn run_scoring_job(job: &ScoringJob, config: &Config) -> ScorerResult<()> {
    let evaluation = job.function.evaluate(&job.args)?;
    let data = encode_metrics_csv(&evaluation)?;

    let output_path = config.layout().path(&job.call_uuid, ArtifactType::ModelOutput);
    config.storage().put_data_atomic(data, &output_path).await?;

    Ok(())
}
