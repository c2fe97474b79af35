//! Shared fixtures for pipeline integration tests.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use image::{Rgb, RgbImage};
use planforge_core::job::{Job, JobResult, JobStatus};
use planforge_pipeline::{
    FeatureExtractor, JobStore, LayoutGenerator, MemoryJobStore, ObjectStore, PipelineError,
    ProgressCallback,
};

/// Object store stub: serves a fixed input image and keeps uploads in
/// memory. Either direction can be forced to fail.
pub struct StubObjectStore {
    pub input: RgbImage,
    pub fail_download: bool,
    pub fail_upload: bool,
    pub uploads: Mutex<HashMap<String, RgbImage>>,
}

impl StubObjectStore {
    pub fn new() -> Self {
        Self {
            input: RgbImage::from_pixel(512, 512, Rgb([180, 160, 140])),
            fail_download: false,
            fail_upload: false,
            uploads: Mutex::new(HashMap::new()),
        }
    }
}

#[async_trait]
impl ObjectStore for StubObjectStore {
    async fn download(&self, url: &str) -> Result<RgbImage, PipelineError> {
        if self.fail_download {
            return Err(PipelineError::Download(format!("stub refused {url}")));
        }
        Ok(self.input.clone())
    }

    async fn upload(&self, job_id: &str, image: &RgbImage) -> Result<String, PipelineError> {
        if self.fail_upload {
            return Err(PipelineError::Upload("stub refused upload".to_string()));
        }
        self.uploads
            .lock()
            .unwrap()
            .insert(job_id.to_string(), image.clone());
        Ok(format!("http://localhost:8000/static/{job_id}.png"))
    }
}

/// Job store decorator that records every status update in order.
pub struct RecordingStore {
    inner: MemoryJobStore,
    pub updates: Mutex<Vec<(JobStatus, Option<f64>)>>,
}

impl RecordingStore {
    pub fn new() -> Self {
        Self {
            inner: MemoryJobStore::new(),
            updates: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl JobStore for RecordingStore {
    async fn create_job(&self, job: Job) -> Result<(), PipelineError> {
        self.inner.create_job(job).await
    }

    async fn update_status(
        &self,
        job_id: &str,
        status: JobStatus,
        stage: Option<&str>,
        progress: Option<f64>,
        error_message: Option<&str>,
    ) -> Result<(), PipelineError> {
        let result = self
            .inner
            .update_status(job_id, status, stage, progress, error_message)
            .await;
        if result.is_ok() {
            self.updates.lock().unwrap().push((status, progress));
        }
        result
    }

    async fn get_job(&self, job_id: &str) -> Result<Option<Job>, PipelineError> {
        self.inner.get_job(job_id).await
    }

    async fn save_result(&self, result: JobResult) -> Result<(), PipelineError> {
        self.inner.save_result(result).await
    }

    async fn get_result(&self, job_id: &str) -> Result<Option<JobResult>, PipelineError> {
        self.inner.get_result(job_id).await
    }
}

/// Extractor that always succeeds with a tiny embedding.
pub struct OkExtractor;

#[async_trait]
impl FeatureExtractor for OkExtractor {
    async fn extract(&self, _image: &RgbImage) -> Result<Vec<f32>, PipelineError> {
        Ok(vec![0.0; 8])
    }
}

/// Extractor that always fails, driving the procedural fallback from
/// the first neural stage.
pub struct FailingExtractor;

#[async_trait]
impl FeatureExtractor for FailingExtractor {
    async fn extract(&self, _image: &RgbImage) -> Result<Vec<f32>, PipelineError> {
        Err(PipelineError::Neural("no accelerator present".to_string()))
    }
}

/// Generator that always fails, driving the procedural fallback.
pub struct FailingGenerator;

#[async_trait]
impl LayoutGenerator for FailingGenerator {
    async fn generate(
        &self,
        _embedding: &[f32],
        _control_image: &RgbImage,
        _num_inference_steps: u32,
        _guidance_scale: f64,
        _conditioning_scale: f64,
        _progress: ProgressCallback,
    ) -> Result<RgbImage, PipelineError> {
        Err(PipelineError::Neural("model exploded".to_string()))
    }
}

/// Generator that hangs long enough to trip the job timeout.
pub struct SlowGenerator;

#[async_trait]
impl LayoutGenerator for SlowGenerator {
    async fn generate(
        &self,
        _embedding: &[f32],
        _control_image: &RgbImage,
        _num_inference_steps: u32,
        _guidance_scale: f64,
        _conditioning_scale: f64,
        _progress: ProgressCallback,
    ) -> Result<RgbImage, PipelineError> {
        tokio::time::sleep(Duration::from_secs(60)).await;
        Ok(RgbImage::new(512, 512))
    }
}

/// Poll the store until the job reaches a terminal status.
pub async fn wait_for_terminal(store: &dyn JobStore, job_id: &str) -> Job {
    for _ in 0..200 {
        if let Some(job) = store.get_job(job_id).await.unwrap() {
            if job.status.is_terminal() {
                return job;
            }
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
    panic!("job {job_id} never reached a terminal status");
}
