//! Job lifecycle types.
//!
//! A [`Job`] is created by the API layer at submission time, mutated
//! exclusively by the pipeline worker while it is being processed,
//! and becomes immutable once it reaches a terminal status.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::options::GenerationOptions;
use crate::plan::FloorPlanMetadata;

/// Lifecycle status of a generation job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Pending,
    Processing,
    Completed,
    Failed,
    Cancelled,
}

impl JobStatus {
    /// Terminal statuses are final: a job must never transition back
    /// to `Processing` once one of these has been recorded.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Failed | Self::Cancelled)
    }

    /// Lowercase wire name, matching the serialized form.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Processing => "processing",
            Self::Completed => "completed",
            Self::Failed => "failed",
            Self::Cancelled => "cancelled",
        }
    }
}

/// A floor-plan generation job.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Job {
    /// Opaque job identifier assigned at submission.
    pub id: String,
    pub user_id: String,
    /// URL or storage path of the input exterior photo.
    pub input_image_url: String,
    pub options: GenerationOptions,
    pub status: JobStatus,
    /// Name of the pipeline stage currently executing, if any.
    pub stage: Option<String>,
    /// Overall progress fraction in `[0, 1]`. Monotonically
    /// non-decreasing while the job is `Processing`.
    pub progress: f64,
    pub created_at: DateTime<Utc>,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    /// Human-readable failure description. Non-empty whenever the
    /// status is `Failed`.
    pub error_message: Option<String>,
}

impl Job {
    /// Create a freshly submitted job in `Pending` state.
    pub fn new(id: impl Into<String>, user_id: impl Into<String>, image_url: impl Into<String>, options: GenerationOptions) -> Self {
        Self {
            id: id.into(),
            user_id: user_id.into(),
            input_image_url: image_url.into(),
            options,
            status: JobStatus::Pending,
            stage: None,
            progress: 0.0,
            created_at: Utc::now(),
            started_at: None,
            completed_at: None,
            error_message: None,
        }
    }
}

/// The queue payload carried from submission to the worker.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobPayload {
    pub image_url: String,
    pub options: GenerationOptions,
}

/// Result record produced once per completed job. Immutable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobResult {
    pub job_id: String,
    pub output_image_url: String,
    pub metadata: FloorPlanMetadata,
    pub processing_time_seconds: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terminal_statuses() {
        assert!(JobStatus::Completed.is_terminal());
        assert!(JobStatus::Failed.is_terminal());
        assert!(JobStatus::Cancelled.is_terminal());
        assert!(!JobStatus::Pending.is_terminal());
        assert!(!JobStatus::Processing.is_terminal());
    }

    #[test]
    fn status_serializes_lowercase() {
        let json = serde_json::to_string(&JobStatus::Processing).unwrap();
        assert_eq!(json, "\"processing\"");
    }

    #[test]
    fn new_job_starts_pending_with_zero_progress() {
        let job = Job::new("job_abc", "user_1", "https://example.com/house.jpg", GenerationOptions::default());
        assert_eq!(job.status, JobStatus::Pending);
        assert_eq!(job.progress, 0.0);
        assert!(job.started_at.is_none());
        assert!(job.error_message.is_none());
    }
}
