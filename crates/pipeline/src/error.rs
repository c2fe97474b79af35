use planforge_core::CoreError;
use planforge_vision::VisionError;

/// Errors produced by the pipeline layer.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// The referenced job does not exist in the store.
    #[error("Job not found: {0}")]
    JobNotFound(String),

    /// A write was attempted against a job already in a terminal
    /// status.
    #[error("Job {0} is already in a terminal status")]
    TerminalStatus(String),

    /// Fetching the input image failed.
    #[error("Download failed: {0}")]
    Download(String),

    /// Persisting the output image failed.
    #[error("Upload failed: {0}")]
    Upload(String),

    /// A neural collaborator failed to initialize or to run. Always
    /// recoverable: the worker falls back to the procedural path.
    #[error("Neural collaborator failed: {0}")]
    Neural(String),

    /// The job exceeded the configured processing deadline.
    #[error("Job timed out after {0} seconds")]
    Timeout(u64),

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Vision(#[from] VisionError),
}
