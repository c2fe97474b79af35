//! Asynchronous floor-plan generation pipeline.
//!
//! Owns the in-memory job queue, the collaborator contracts, the
//! in-memory job store, the local object store, and the worker loop
//! that drives a submission through download, feature extraction,
//! layout generation, post-processing, and upload.

pub mod config;
pub mod error;
pub mod objectstore;
pub mod queue;
pub mod stage;
pub mod store;
pub mod traits;
pub mod worker;

pub use config::PipelineConfig;
pub use error::PipelineError;
pub use objectstore::LocalObjectStore;
pub use queue::{JobQueue, QueueEntry};
pub use stage::Stage;
pub use store::MemoryJobStore;
pub use traits::{FeatureExtractor, JobStore, LayoutGenerator, ObjectStore, ProgressCallback};
pub use worker::Worker;
