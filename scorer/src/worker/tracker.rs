use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use scorer_functions::FunctionKind;
use tokio::sync::RwLock;
use tracing::debug;

use crate::types::call_id::CallId;
use crate::types::constant::MAX_FAILED_RECORDS;
use crate::types::job::{JobRecord, JobState};

/// In-memory record of the calls issued by this process.
///
/// Only running and failed calls are kept. A succeeded call is dropped as
/// soon as its output is on disk, from then on the files describe it fully.
/// Failed records are capped, the oldest failures are evicted first.
#[derive(Clone)]
pub struct JobTracker {
    jobs: Arc<RwLock<HashMap<CallId, JobRecord>>>,
    failed_capacity: usize,
}

impl Default for JobTracker {
    fn default() -> Self {
        Self::with_failed_capacity(MAX_FAILED_RECORDS)
    }
}

impl JobTracker {
    pub fn with_failed_capacity(failed_capacity: usize) -> Self {
        Self { jobs: Arc::default(), failed_capacity }
    }

    /// Registers a new running call. Returns `false` if the id is taken.
    pub async fn register(&self, call_id: &CallId, function: FunctionKind) -> bool {
        let mut jobs = self.jobs.write().await;
        if jobs.contains_key(call_id) {
            return false;
        }
        jobs.insert(
            call_id.clone(),
            JobRecord { function, state: JobState::Running, submitted_at: Utc::now(), finished_at: None },
        );
        debug!(call_uuid = %call_id, tracked = jobs.len(), "Registered call");
        true
    }

    /// Drops the record of a call whose output has been written and returns it.
    pub async fn mark_succeeded(&self, call_id: &CallId) -> Option<JobRecord> {
        self.jobs.write().await.remove(call_id)
    }

    pub async fn mark_failed(&self, call_id: &CallId, reason: impl Into<String>) {
        let mut jobs = self.jobs.write().await;
        let Some(record) = jobs.get_mut(call_id) else { return };
        record.state = JobState::Failed(reason.into());
        record.finished_at = Some(Utc::now());

        let mut failed: Vec<_> = jobs
            .iter()
            .filter(|(_, record)| matches!(record.state, JobState::Failed(_)))
            .map(|(id, record)| (record.finished_at, id.clone()))
            .collect();
        if failed.len() <= self.failed_capacity {
            return;
        }
        failed.sort();
        let excess = failed.len() - self.failed_capacity;
        for (_, id) in failed.into_iter().take(excess) {
            jobs.remove(&id);
            debug!(call_uuid = %id, "Evicted failed call record");
        }
    }

    pub async fn get(&self, call_id: &CallId) -> Option<JobRecord> {
        self.jobs.read().await.get(call_id).cloned()
    }

    pub async fn contains(&self, call_id: &CallId) -> bool {
        self.jobs.read().await.contains_key(call_id)
    }

    pub async fn forget(&self, call_id: &CallId) -> Option<JobRecord> {
        self.jobs.write().await.remove(call_id)
    }

    pub async fn is_empty(&self) -> bool {
        self.jobs.read().await.is_empty()
    }
}
