//! Integration tests for the worker loop.
//!
//! Each test runs a real worker against stub collaborators and an
//! in-memory store, exercising the full dequeue → process → release
//! path, including the procedural fallback, the hard timeout, and
//! both storage fallbacks.

mod common;

use std::sync::Arc;
use std::time::Duration;

use common::{
    wait_for_terminal, FailingExtractor, FailingGenerator, OkExtractor, RecordingStore,
    SlowGenerator, StubObjectStore,
};
use planforge_core::job::{Job, JobPayload, JobStatus};
use planforge_core::options::GenerationOptions;
use planforge_pipeline::{
    FeatureExtractor, JobQueue, JobStore, LayoutGenerator, MemoryJobStore, PipelineConfig,
    PipelineError, Worker,
};
use planforge_vision::PostProcessor;
use tokio_util::sync::CancellationToken;

fn test_config() -> PipelineConfig {
    PipelineConfig {
        poll_interval_ms: 20,
        ..PipelineConfig::default()
    }
}

fn payload(url: &str) -> JobPayload {
    JobPayload {
        image_url: url.to_string(),
        options: GenerationOptions::default(),
    }
}

async fn submit(queue: &JobQueue, store: &dyn JobStore, job_id: &str, url: &str) {
    store
        .create_job(Job::new(job_id, "user_1", url, GenerationOptions::default()))
        .await
        .unwrap();
    queue.enqueue(job_id, payload(url)).await;
}

fn spawn_worker(worker: Worker) -> (Arc<Worker>, CancellationToken) {
    let worker = Arc::new(worker);
    let token = CancellationToken::new();
    tokio::spawn(worker.clone().run(token.clone()));
    (worker, token)
}

// ---------------------------------------------------------------------------
// Scenario: queue round trip
// ---------------------------------------------------------------------------

/// A submitted job travels pending → processing → completed, ends up
/// with a result record, and is released from the in-flight set.
#[tokio::test]
async fn queue_round_trip_completes_job() {
    let queue = Arc::new(JobQueue::new());
    let store: Arc<MemoryJobStore> = Arc::new(MemoryJobStore::new());
    let objects = Arc::new(StubObjectStore::new());
    let config = test_config();

    submit(&queue, store.as_ref(), "job_abc", "https://example.com/house.jpg").await;
    assert_eq!(queue.size(), 1);

    let worker = Worker::new(
        queue.clone(),
        store.clone(),
        objects.clone(),
        PostProcessor::new(config.scale_factor, config.num_floors),
        config,
    );
    let (_worker, token) = spawn_worker(worker);

    let job = wait_for_terminal(store.as_ref(), "job_abc").await;
    assert_eq!(job.status, JobStatus::Completed);
    assert_eq!(job.progress, 1.0);
    assert!(job.error_message.is_none());

    let result = store.get_result("job_abc").await.unwrap().unwrap();
    assert_eq!(result.output_image_url, "http://localhost:8000/static/job_abc.png");
    // No neural collaborators configured: the procedural path ran.
    assert!(result.metadata.demo_mode);
    assert!(result.processing_time_seconds > 0.0);

    assert_eq!(queue.size(), 0);
    assert!(!queue.is_processing("job_abc").await);
    assert!(objects.uploads.lock().unwrap().contains_key("job_abc"));

    token.cancel();
}

// ---------------------------------------------------------------------------
// Scenario: neural failure falls back to the procedural path
// ---------------------------------------------------------------------------

/// An extractor error at the first neural stage is not a job
/// failure: the job completes with demo-mode metadata and no error
/// message.
#[tokio::test]
async fn extraction_failure_completes_with_demo_output() {
    let queue = Arc::new(JobQueue::new());
    let store: Arc<MemoryJobStore> = Arc::new(MemoryJobStore::new());
    let objects = Arc::new(StubObjectStore::new());
    let config = test_config();

    submit(&queue, store.as_ref(), "job_neural", "https://example.com/a.jpg").await;

    let worker = Worker::new(
        queue.clone(),
        store.clone(),
        objects,
        PostProcessor::new(config.scale_factor, config.num_floors),
        config,
    )
    .with_neural_collaborators(
        Box::new(|| Ok(Arc::new(FailingExtractor) as Arc<dyn FeatureExtractor>)),
        Box::new(|| Ok(Arc::new(FailingGenerator) as Arc<dyn LayoutGenerator>)),
    );
    let (_worker, token) = spawn_worker(worker);

    let job = wait_for_terminal(store.as_ref(), "job_neural").await;
    assert_eq!(job.status, JobStatus::Completed);
    assert!(job.error_message.is_none());

    let result = store.get_result("job_neural").await.unwrap().unwrap();
    assert!(result.metadata.demo_mode);
    assert_eq!(result.metadata.total_area_sqft, {
        let sum: f64 = result.metadata.rooms.iter().map(|r| r.area_sqft).sum();
        sum
    });

    token.cancel();
}

/// A generator error after successful extraction also falls back
/// instead of failing the job.
#[tokio::test]
async fn generation_failure_completes_with_demo_output() {
    let queue = Arc::new(JobQueue::new());
    let store: Arc<MemoryJobStore> = Arc::new(MemoryJobStore::new());
    let objects = Arc::new(StubObjectStore::new());
    let config = test_config();

    submit(&queue, store.as_ref(), "job_gen", "https://example.com/a.jpg").await;

    let worker = Worker::new(
        queue.clone(),
        store.clone(),
        objects,
        PostProcessor::new(config.scale_factor, config.num_floors),
        config,
    )
    .with_neural_collaborators(
        Box::new(|| Ok(Arc::new(OkExtractor) as Arc<dyn FeatureExtractor>)),
        Box::new(|| Ok(Arc::new(FailingGenerator) as Arc<dyn LayoutGenerator>)),
    );
    let (_worker, token) = spawn_worker(worker);

    let job = wait_for_terminal(store.as_ref(), "job_gen").await;
    assert_eq!(job.status, JobStatus::Completed);
    let result = store.get_result("job_gen").await.unwrap().unwrap();
    assert!(result.metadata.demo_mode);

    token.cancel();
}

// ---------------------------------------------------------------------------
// Scenario: progress writes are monotonic and stop at the terminal write
// ---------------------------------------------------------------------------

/// Recorded progress never decreases, the last write is the terminal
/// `completed` at 1.0, and later writes are rejected.
#[tokio::test]
async fn progress_is_monotonic_and_terminal_write_is_final() {
    let queue = Arc::new(JobQueue::new());
    let store: Arc<RecordingStore> = Arc::new(RecordingStore::new());
    let objects = Arc::new(StubObjectStore::new());
    let config = test_config();

    submit(&queue, store.as_ref(), "job_prog", "https://example.com/b.jpg").await;

    let worker = Worker::new(
        queue.clone(),
        store.clone(),
        objects,
        PostProcessor::new(config.scale_factor, config.num_floors),
        config,
    );
    let (_worker, token) = spawn_worker(worker);

    wait_for_terminal(store.as_ref(), "job_prog").await;
    token.cancel();

    let updates = store.updates.lock().unwrap().clone();
    let progresses: Vec<f64> = updates.iter().filter_map(|(_, p)| *p).collect();
    assert!(progresses.len() >= 4, "updates {updates:?}");
    for pair in progresses.windows(2) {
        assert!(pair[0] <= pair[1], "progress regressed: {progresses:?}");
    }
    let (last_status, last_progress) = *updates.last().unwrap();
    assert_eq!(last_status, JobStatus::Completed);
    assert_eq!(last_progress, Some(1.0));

    let err = store
        .update_status("job_prog", JobStatus::Processing, None, Some(0.5), None)
        .await
        .unwrap_err();
    assert!(matches!(err, PipelineError::TerminalStatus(_)));
}

// ---------------------------------------------------------------------------
// Scenario: identical inputs reproduce identical output
// ---------------------------------------------------------------------------

/// Two jobs with the same input image and source URL produce byte-
/// identical rasters and identical metadata on the procedural path.
#[tokio::test]
async fn identical_inputs_reproduce_identical_output() {
    let queue = Arc::new(JobQueue::new());
    let store: Arc<MemoryJobStore> = Arc::new(MemoryJobStore::new());
    let objects = Arc::new(StubObjectStore::new());
    let config = test_config();

    submit(&queue, store.as_ref(), "job_a", "https://example.com/seedA.jpg").await;
    submit(&queue, store.as_ref(), "job_b", "https://example.com/seedA.jpg").await;

    let worker = Worker::new(
        queue.clone(),
        store.clone(),
        objects.clone(),
        PostProcessor::new(config.scale_factor, config.num_floors),
        config,
    );
    let (_worker, token) = spawn_worker(worker);

    wait_for_terminal(store.as_ref(), "job_a").await;
    wait_for_terminal(store.as_ref(), "job_b").await;
    token.cancel();

    let uploads = objects.uploads.lock().unwrap();
    assert_eq!(uploads["job_a"].as_raw(), uploads["job_b"].as_raw());

    let a = store.get_result("job_a").await.unwrap().unwrap().metadata;
    let b = store.get_result("job_b").await.unwrap().unwrap().metadata;
    assert_eq!(a.floor_plan_id, b.floor_plan_id);
    assert_eq!(a.layout_type, b.layout_type);
    assert_eq!(a.total_area_sqft, b.total_area_sqft);
}

// ---------------------------------------------------------------------------
// Scenario: hard timeout
// ---------------------------------------------------------------------------

/// A job that exceeds the deadline is failed with a timeout message
/// and released from the in-flight set.
#[tokio::test]
async fn timeout_fails_job_and_releases_queue() {
    let queue = Arc::new(JobQueue::new());
    let store: Arc<MemoryJobStore> = Arc::new(MemoryJobStore::new());
    let objects = Arc::new(StubObjectStore::new());
    let config = PipelineConfig {
        job_timeout_secs: 1,
        poll_interval_ms: 20,
        ..PipelineConfig::default()
    };

    submit(&queue, store.as_ref(), "job_slow", "https://example.com/c.jpg").await;

    let worker = Worker::new(
        queue.clone(),
        store.clone(),
        objects,
        PostProcessor::new(config.scale_factor, config.num_floors),
        config,
    )
    .with_neural_collaborators(
        Box::new(|| Ok(Arc::new(OkExtractor) as Arc<dyn FeatureExtractor>)),
        Box::new(|| Ok(Arc::new(SlowGenerator) as Arc<dyn LayoutGenerator>)),
    );
    let (_worker, token) = spawn_worker(worker);

    let job = wait_for_terminal(store.as_ref(), "job_slow").await;
    token.cancel();

    assert_eq!(job.status, JobStatus::Failed);
    let message = job.error_message.unwrap();
    assert!(message.contains("timed out"), "message: {message}");
    assert!(!queue.is_processing("job_slow").await);
}

// ---------------------------------------------------------------------------
// Scenario: teardown abandons the in-flight job
// ---------------------------------------------------------------------------

/// Cancelling the token mid-job stops the loop promptly instead of
/// waiting for the job to finish, and releases the in-flight entry.
#[tokio::test]
async fn teardown_abandons_in_flight_job() {
    let queue = Arc::new(JobQueue::new());
    let store: Arc<MemoryJobStore> = Arc::new(MemoryJobStore::new());
    let objects = Arc::new(StubObjectStore::new());
    let config = test_config();

    submit(&queue, store.as_ref(), "job_halt", "https://example.com/f.jpg").await;

    let worker = Arc::new(
        Worker::new(
            queue.clone(),
            store.clone(),
            objects,
            PostProcessor::new(config.scale_factor, config.num_floors),
            config,
        )
        .with_neural_collaborators(
            Box::new(|| Ok(Arc::new(OkExtractor) as Arc<dyn FeatureExtractor>)),
            Box::new(|| Ok(Arc::new(SlowGenerator) as Arc<dyn LayoutGenerator>)),
        ),
    );
    let token = CancellationToken::new();
    let handle = tokio::spawn(worker.clone().run(token.clone()));

    // Let the worker pick the job up, then cancel mid-generation.
    for _ in 0..200 {
        if queue.is_processing("job_halt").await {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    assert!(queue.is_processing("job_halt").await);
    token.cancel();

    tokio::time::timeout(Duration::from_secs(2), handle)
        .await
        .expect("worker loop did not stop promptly")
        .unwrap();
    assert!(!queue.is_processing("job_halt").await);

    // The abandoned job is left as-is, not gracefully finished.
    let job = store.get_job("job_halt").await.unwrap().unwrap();
    assert!(!job.status.is_terminal());
}

// ---------------------------------------------------------------------------
// Scenario: storage fallbacks never fail the job
// ---------------------------------------------------------------------------

/// A failed input download falls back to the placeholder image and
/// the job still completes.
#[tokio::test]
async fn download_failure_still_completes() {
    let queue = Arc::new(JobQueue::new());
    let store: Arc<MemoryJobStore> = Arc::new(MemoryJobStore::new());
    let objects = Arc::new(StubObjectStore {
        fail_download: true,
        ..StubObjectStore::new()
    });
    let config = test_config();

    submit(&queue, store.as_ref(), "job_dl", "https://example.com/d.jpg").await;

    let worker = Worker::new(
        queue.clone(),
        store.clone(),
        objects,
        PostProcessor::new(config.scale_factor, config.num_floors),
        config,
    );
    let (_worker, token) = spawn_worker(worker);

    let job = wait_for_terminal(store.as_ref(), "job_dl").await;
    token.cancel();

    assert_eq!(job.status, JobStatus::Completed);
    assert!(store.get_result("job_dl").await.unwrap().is_some());
}

/// A failed upload falls back to a local PNG under the configured
/// output directory, with the public URL synthesized from the base.
#[tokio::test]
async fn upload_failure_falls_back_to_local_file() {
    let dir = tempfile::tempdir().unwrap();
    let queue = Arc::new(JobQueue::new());
    let store: Arc<MemoryJobStore> = Arc::new(MemoryJobStore::new());
    let objects = Arc::new(StubObjectStore {
        fail_upload: true,
        ..StubObjectStore::new()
    });
    let config = PipelineConfig {
        poll_interval_ms: 20,
        output_dir: dir.path().to_path_buf(),
        ..PipelineConfig::default()
    };

    submit(&queue, store.as_ref(), "job_up", "https://example.com/e.jpg").await;

    let worker = Worker::new(
        queue.clone(),
        store.clone(),
        objects,
        PostProcessor::new(config.scale_factor, config.num_floors),
        config,
    );
    let (_worker, token) = spawn_worker(worker);

    let job = wait_for_terminal(store.as_ref(), "job_up").await;
    token.cancel();

    assert_eq!(job.status, JobStatus::Completed);
    let result = store.get_result("job_up").await.unwrap().unwrap();
    assert_eq!(result.output_image_url, "http://localhost:8000/static/job_up.png");
    assert!(dir.path().join("job_up.png").exists());
}
