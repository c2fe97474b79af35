//! The pipeline worker loop.
//!
//! A single loop per process: dequeue, process, release. Processing
//! walks the five stages with progress checkpoints, preferring the
//! neural collaborators when they are configured and healthy and
//! falling back to the procedural synthesizer otherwise. A neural
//! failure is never a job failure; download and upload failures have
//! their own fallbacks. Only validation errors, post-processing
//! errors, store errors, and the hard timeout fail a job.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use image::{Rgb, RgbImage};
use planforge_core::job::{JobPayload, JobResult, JobStatus};
use planforge_synth::FloorPlanSynthesizer;
use planforge_vision::PostProcessor;
use tokio::sync::OnceCell;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

use crate::config::PipelineConfig;
use crate::queue::{JobQueue, QueueEntry};
use crate::stage::{rescale_layout_progress, Stage};
use crate::traits::{FeatureExtractor, JobStore, LayoutGenerator, ObjectStore, ProgressCallback};
use crate::PipelineError;

/// Simulated per-stage wait on the procedural path, mimicking the
/// cadence of real inference.
const DEMO_STAGE_DELAY: Duration = Duration::from_millis(250);

/// Deferred constructors for the neural collaborators. Built at most
/// once, on the first job that needs them; a failure here routes the
/// job to the procedural path.
pub type ExtractorFactory =
    Box<dyn Fn() -> Result<Arc<dyn FeatureExtractor>, PipelineError> + Send + Sync>;
pub type GeneratorFactory =
    Box<dyn Fn() -> Result<Arc<dyn LayoutGenerator>, PipelineError> + Send + Sync>;

pub struct Worker {
    queue: Arc<JobQueue>,
    store: Arc<dyn JobStore>,
    objects: Arc<dyn ObjectStore>,
    synthesizer: FloorPlanSynthesizer,
    post_processor: PostProcessor,
    extractor_factory: Option<ExtractorFactory>,
    generator_factory: Option<GeneratorFactory>,
    extractor: OnceCell<Arc<dyn FeatureExtractor>>,
    generator: OnceCell<Arc<dyn LayoutGenerator>>,
    config: PipelineConfig,
    running: AtomicBool,
}

impl Worker {
    pub fn new(
        queue: Arc<JobQueue>,
        store: Arc<dyn JobStore>,
        objects: Arc<dyn ObjectStore>,
        post_processor: PostProcessor,
        config: PipelineConfig,
    ) -> Self {
        let synthesizer = FloorPlanSynthesizer {
            scale_factor: config.scale_factor,
            ..FloorPlanSynthesizer::default()
        };
        Self {
            queue,
            store,
            objects,
            synthesizer,
            post_processor,
            extractor_factory: None,
            generator_factory: None,
            extractor: OnceCell::new(),
            generator: OnceCell::new(),
            config,
            running: AtomicBool::new(false),
        }
    }

    /// Configure the neural collaborators. Without them every job
    /// takes the procedural path.
    pub fn with_neural_collaborators(
        mut self,
        extractor: ExtractorFactory,
        generator: GeneratorFactory,
    ) -> Self {
        self.extractor_factory = Some(extractor);
        self.generator_factory = Some(generator);
        self
    }

    /// Run the worker loop until the token is cancelled. Idempotent:
    /// a second call returns immediately while the first is running.
    /// Cancellation returns promptly: an in-flight job is abandoned
    /// mid-stage, not finished, and its queue entry is released.
    pub async fn run(self: Arc<Self>, shutdown: CancellationToken) {
        if self.running.swap(true, Ordering::SeqCst) {
            tracing::warn!("worker loop is already running");
            return;
        }
        tracing::info!(
            timeout_secs = self.config.job_timeout_secs,
            poll_interval_ms = self.config.poll_interval_ms,
            "worker loop started"
        );

        while !shutdown.is_cancelled() {
            match self.queue.dequeue().await {
                Some(entry) => {
                    let job_id = entry.job_id.clone();
                    tokio::select! {
                        _ = self.handle_entry(entry) => {}
                        _ = shutdown.cancelled() => {
                            tracing::warn!(job_id = %job_id, "teardown requested, abandoning in-flight job");
                            self.queue.complete(&job_id).await;
                            break;
                        }
                    }
                }
                None => {
                    tokio::select! {
                        _ = shutdown.cancelled() => break,
                        _ = tokio::time::sleep(Duration::from_millis(self.config.poll_interval_ms)) => {}
                    }
                }
            }
        }

        self.running.store(false, Ordering::SeqCst);
        tracing::info!("worker loop stopped");
    }

    /// Process one dequeued job under the hard timeout. The in-flight
    /// entry is released on every path.
    async fn handle_entry(&self, entry: QueueEntry) {
        let job_id = entry.job_id.clone();
        tracing::info!(job_id = %job_id, "processing job");

        let deadline = Duration::from_secs(self.config.job_timeout_secs);
        match tokio::time::timeout(deadline, self.process_job(&entry)).await {
            Ok(Ok(())) => tracing::info!(job_id = %job_id, "job completed"),
            Ok(Err(err)) => {
                tracing::error!(job_id = %job_id, error = %err, "job failed");
                self.fail_job(&job_id, &err.to_string()).await;
            }
            Err(_) => {
                let err = PipelineError::Timeout(self.config.job_timeout_secs);
                tracing::error!(job_id = %job_id, error = %err, "job timed out");
                self.fail_job(&job_id, &err.to_string()).await;
            }
        }

        self.queue.complete(&job_id).await;
    }

    async fn process_job(&self, entry: &QueueEntry) -> Result<(), PipelineError> {
        let job_id = &entry.job_id;
        let started = Instant::now();
        entry.payload.options.validate()?;

        let mut writes = JoinSet::new();
        self.store
            .update_status(job_id, JobStatus::Processing, Some(Stage::Download.name()), Some(0.0), None)
            .await?;

        // Stage 1: download, with a flat placeholder on failure.
        let input = match self.objects.download(&entry.payload.image_url).await {
            Ok(image) => image,
            Err(err) => {
                tracing::warn!(job_id = %job_id, error = %err, "input download failed, using placeholder");
                placeholder_image()
            }
        };
        self.spawn_progress(&mut writes, job_id, Stage::Download);

        // Stages 2-4: neural when available, procedural otherwise.
        let (raster, metadata) = match self.try_neural(job_id, &entry.payload, &input, &mut writes).await {
            Ok(raster) => {
                let metadata = self.post_processor.process(&raster).await?;
                self.spawn_progress(&mut writes, job_id, Stage::PostProcessing);
                (raster, metadata)
            }
            Err(err) => {
                tracing::warn!(job_id = %job_id, error = %err, "neural path unavailable, falling back to procedural synthesis");
                self.demo_pipeline(job_id, &entry.payload, &input, &mut writes).await
            }
        };

        // Stage 5: upload, with a best-effort local fallback.
        let output_image_url = match self.objects.upload(job_id, &raster).await {
            Ok(url) => url,
            Err(err) => {
                tracing::warn!(job_id = %job_id, error = %err, "upload failed, persisting locally");
                self.fallback_upload(job_id, &raster).await
            }
        };

        // All progress writes must land before the terminal write.
        while writes.join_next().await.is_some() {}

        self.store
            .save_result(JobResult {
                job_id: job_id.clone(),
                output_image_url,
                metadata,
                processing_time_seconds: started.elapsed().as_secs_f64(),
            })
            .await?;
        self.store
            .update_status(job_id, JobStatus::Completed, Some(Stage::Upload.name()), Some(1.0), None)
            .await?;
        Ok(())
    }

    /// Run the neural stages, returning the generated raster.
    async fn try_neural(
        &self,
        job_id: &str,
        payload: &JobPayload,
        input: &RgbImage,
        writes: &mut JoinSet<()>,
    ) -> Result<RgbImage, PipelineError> {
        let extractor = self.extractor().await?;
        let generator = self.generator().await?;

        let embedding = extractor.extract(input).await?;
        self.spawn_progress(writes, job_id, Stage::FeatureExtraction);

        // Internal diffusion progress flows through a channel so the
        // sync callback never blocks on the store.
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel::<f64>();
        let store = self.store.clone();
        let id = job_id.to_string();
        writes.spawn(async move {
            while let Some(fraction) = rx.recv().await {
                let progress = rescale_layout_progress(fraction);
                if let Err(err) = store
                    .update_status(
                        &id,
                        JobStatus::Processing,
                        Some(Stage::LayoutGeneration.name()),
                        Some(progress),
                        None,
                    )
                    .await
                {
                    tracing::warn!(job_id = %id, error = %err, "progress write failed");
                }
            }
        });
        let callback: ProgressCallback = Box::new(move |fraction| {
            let _ = tx.send(fraction);
        });

        let raster = generator
            .generate(
                &embedding,
                input,
                payload.options.num_inference_steps(),
                payload.options.guidance_scale(),
                payload.options.controlnet_conditioning_scale(),
                callback,
            )
            .await?;
        self.spawn_progress(writes, job_id, Stage::LayoutGeneration);
        Ok(raster)
    }

    /// The procedural fallback: deterministic raster and metadata
    /// from a content-derived seed, with the same checkpoint cadence
    /// as real inference.
    async fn demo_pipeline(
        &self,
        job_id: &str,
        payload: &JobPayload,
        input: &RgbImage,
        writes: &mut JoinSet<()>,
    ) -> (RgbImage, planforge_core::plan::FloorPlanMetadata) {
        let seed = self.synthesizer.seed_for(input, &payload.image_url);
        tracing::info!(job_id = %job_id, seed, "procedural synthesis");

        tokio::time::sleep(DEMO_STAGE_DELAY).await;
        self.spawn_progress(writes, job_id, Stage::FeatureExtraction);

        let raster = self.synthesizer.render(seed);
        tokio::time::sleep(DEMO_STAGE_DELAY).await;
        self.spawn_progress(writes, job_id, Stage::LayoutGeneration);

        let metadata = self.synthesizer.metadata(seed);
        tokio::time::sleep(DEMO_STAGE_DELAY).await;
        self.spawn_progress(writes, job_id, Stage::PostProcessing);

        (raster, metadata)
    }

    /// Best-effort local persistence when the object store rejects an
    /// upload. The synthesized URL is returned even if the local
    /// write fails too.
    async fn fallback_upload(&self, job_id: &str, raster: &RgbImage) -> String {
        let fallback = crate::objectstore::LocalObjectStore::new(
            self.config.output_dir.clone(),
            self.config.public_base_url.clone(),
        );
        match fallback.upload(job_id, raster).await {
            Ok(url) => url,
            Err(err) => {
                tracing::error!(job_id = %job_id, error = %err, "local fallback upload failed");
                format!("{}/{}.png", self.config.public_base_url, job_id)
            }
        }
    }

    fn spawn_progress(&self, writes: &mut JoinSet<()>, job_id: &str, stage: Stage) {
        let store = self.store.clone();
        let id = job_id.to_string();
        writes.spawn(async move {
            if let Err(err) = store
                .update_status(
                    &id,
                    JobStatus::Processing,
                    Some(stage.name()),
                    Some(stage.checkpoint()),
                    None,
                )
                .await
            {
                tracing::warn!(job_id = %id, error = %err, "progress write failed");
            }
        });
    }

    /// Record the terminal failure. Store errors here are logged and
    /// swallowed; there is nothing further to do with them.
    async fn fail_job(&self, job_id: &str, message: &str) {
        if let Err(err) = self
            .store
            .update_status(job_id, JobStatus::Failed, None, None, Some(message))
            .await
        {
            tracing::warn!(job_id = %job_id, error = %err, "failed to record job failure");
        }
    }

    async fn extractor(&self) -> Result<&Arc<dyn FeatureExtractor>, PipelineError> {
        let factory = self
            .extractor_factory
            .as_ref()
            .ok_or_else(|| PipelineError::Neural("feature extractor not configured".to_string()))?;
        self.extractor.get_or_try_init(|| async { factory() }).await
    }

    async fn generator(&self) -> Result<&Arc<dyn LayoutGenerator>, PipelineError> {
        let factory = self
            .generator_factory
            .as_ref()
            .ok_or_else(|| PipelineError::Neural("layout generator not configured".to_string()))?;
        self.generator.get_or_try_init(|| async { factory() }).await
    }
}

/// Flat gray stand-in used when the input image cannot be fetched.
fn placeholder_image() -> RgbImage {
    RgbImage::from_pixel(512, 512, Rgb([200, 200, 200]))
}
