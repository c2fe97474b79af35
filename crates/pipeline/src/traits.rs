//! Collaborator contracts.
//!
//! The worker depends on these traits, never on concrete neural or
//! storage implementations. The neural collaborators are deliberately
//! opaque: the pipeline cares about their signatures and failure
//! modes, not their internals.

use async_trait::async_trait;
use image::RgbImage;
use planforge_core::job::{Job, JobResult, JobStatus};

use crate::PipelineError;

/// Callback invoked with an internal step fraction in `[0, 1]`.
pub type ProgressCallback = Box<dyn Fn(f64) + Send + Sync>;

/// Extracts a feature embedding from the input exterior photo.
#[async_trait]
pub trait FeatureExtractor: Send + Sync {
    async fn extract(&self, image: &RgbImage) -> Result<Vec<f32>, PipelineError>;
}

/// Generates a floor-plan raster from an embedding and control image.
#[async_trait]
pub trait LayoutGenerator: Send + Sync {
    async fn generate(
        &self,
        embedding: &[f32],
        control_image: &RgbImage,
        num_inference_steps: u32,
        guidance_scale: f64,
        conditioning_scale: f64,
        progress: ProgressCallback,
    ) -> Result<RgbImage, PipelineError>;
}

/// Fetches input images and persists output images.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Fetch the image behind a URL or local path.
    async fn download(&self, url: &str) -> Result<RgbImage, PipelineError>;

    /// Persist an output image and return its public URL.
    async fn upload(&self, job_id: &str, image: &RgbImage) -> Result<String, PipelineError>;
}

/// Job persistence contract.
///
/// Implementations must enforce the terminal-status guard: once a job
/// is `Completed`, `Failed`, or `Cancelled`, further status updates
/// are rejected.
#[async_trait]
pub trait JobStore: Send + Sync {
    async fn create_job(&self, job: Job) -> Result<(), PipelineError>;

    /// Update status and optionally stage, progress, and error
    /// message. Sets `started_at` on the transition to `Processing`
    /// and `completed_at` on the transition to a terminal status.
    async fn update_status(
        &self,
        job_id: &str,
        status: JobStatus,
        stage: Option<&str>,
        progress: Option<f64>,
        error_message: Option<&str>,
    ) -> Result<(), PipelineError>;

    async fn get_job(&self, job_id: &str) -> Result<Option<Job>, PipelineError>;

    async fn save_result(&self, result: JobResult) -> Result<(), PipelineError>;

    async fn get_result(&self, job_id: &str) -> Result<Option<JobResult>, PipelineError>;
}
