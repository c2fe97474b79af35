//! Pipeline worker entry point.
//!
//! Builds the queue, stores, and post-processor from environment
//! configuration and runs the single worker loop until Ctrl-C.

use std::sync::Arc;

use planforge_pipeline::{JobQueue, LocalObjectStore, MemoryJobStore, PipelineConfig, Worker};
use planforge_vision::PostProcessor;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "planforge_pipeline=debug,planforge_worker=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = PipelineConfig::from_env();
    let queue = Arc::new(JobQueue::new());
    let store = Arc::new(MemoryJobStore::new());
    let objects = Arc::new(LocalObjectStore::new(
        config.output_dir.clone(),
        config.public_base_url.clone(),
    ));
    let post_processor = PostProcessor::new(config.scale_factor, config.num_floors);

    let worker = Arc::new(Worker::new(queue, store, objects, post_processor, config));

    let shutdown = CancellationToken::new();
    let loop_handle = tokio::spawn(worker.run(shutdown.clone()));

    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("shutdown signal received"),
        Err(e) => tracing::error!(error = %e, "failed to listen for shutdown signal"),
    }
    shutdown.cancel();
    let _ = loop_handle.await;
}
