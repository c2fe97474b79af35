//! In-memory job store.
//!
//! Backs the store contract with process-local maps. Volatile by
//! design: jobs and results do not survive a restart.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use planforge_core::job::{Job, JobResult, JobStatus};
use tokio::sync::Mutex;

use crate::traits::JobStore;
use crate::PipelineError;

#[derive(Default)]
pub struct MemoryJobStore {
    jobs: Mutex<HashMap<String, Job>>,
    results: Mutex<HashMap<String, JobResult>>,
}

impl MemoryJobStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl JobStore for MemoryJobStore {
    async fn create_job(&self, job: Job) -> Result<(), PipelineError> {
        self.jobs.lock().await.insert(job.id.clone(), job);
        Ok(())
    }

    async fn update_status(
        &self,
        job_id: &str,
        status: JobStatus,
        stage: Option<&str>,
        progress: Option<f64>,
        error_message: Option<&str>,
    ) -> Result<(), PipelineError> {
        let mut jobs = self.jobs.lock().await;
        let job = jobs
            .get_mut(job_id)
            .ok_or_else(|| PipelineError::JobNotFound(job_id.to_string()))?;

        // Terminal statuses are final.
        if job.status.is_terminal() {
            return Err(PipelineError::TerminalStatus(job_id.to_string()));
        }

        if status == JobStatus::Processing && job.started_at.is_none() {
            job.started_at = Some(Utc::now());
        }
        if status.is_terminal() {
            job.completed_at = Some(Utc::now());
        }

        job.status = status;
        if let Some(stage) = stage {
            job.stage = Some(stage.to_string());
        }
        if let Some(progress) = progress {
            job.progress = progress;
        }
        if let Some(message) = error_message {
            job.error_message = Some(message.to_string());
        }
        Ok(())
    }

    async fn get_job(&self, job_id: &str) -> Result<Option<Job>, PipelineError> {
        Ok(self.jobs.lock().await.get(job_id).cloned())
    }

    async fn save_result(&self, result: JobResult) -> Result<(), PipelineError> {
        self.results.lock().await.insert(result.job_id.clone(), result);
        Ok(())
    }

    async fn get_result(&self, job_id: &str) -> Result<Option<JobResult>, PipelineError> {
        Ok(self.results.lock().await.get(job_id).cloned())
    }
}
