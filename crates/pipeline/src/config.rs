use std::path::PathBuf;

/// Pipeline worker configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Hard per-job processing deadline in seconds (default: `300`).
    pub job_timeout_secs: u64,
    /// Sleep between queue polls when idle, in milliseconds
    /// (default: `1000`).
    pub poll_interval_ms: u64,
    /// Directory for locally persisted output images
    /// (default: `temp_outputs`).
    pub output_dir: PathBuf,
    /// Base URL under which uploaded outputs are publicly served
    /// (default: `http://localhost:8000/static`).
    pub public_base_url: String,
    /// Pixel-to-feet conversion factor (default: `2.0`).
    pub scale_factor: f64,
    /// Floors to replicate in post-processed metadata (default: `1`).
    pub num_floors: u32,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            job_timeout_secs: 300,
            poll_interval_ms: 1000,
            output_dir: PathBuf::from("temp_outputs"),
            public_base_url: "http://localhost:8000/static".to_string(),
            scale_factor: 2.0,
            num_floors: 1,
        }
    }
}

impl PipelineConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                  | Default                         |
    /// |--------------------------|---------------------------------|
    /// | `JOB_TIMEOUT_SECONDS`    | `300`                           |
    /// | `QUEUE_POLL_INTERVAL_MS` | `1000`                          |
    /// | `OUTPUT_DIR`             | `temp_outputs`                  |
    /// | `PUBLIC_BASE_URL`        | `http://localhost:8000/static`  |
    /// | `SCALE_FACTOR`           | `2.0`                           |
    /// | `NUM_FLOORS`             | `1`                             |
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let job_timeout_secs: u64 = std::env::var("JOB_TIMEOUT_SECONDS")
            .unwrap_or_else(|_| defaults.job_timeout_secs.to_string())
            .parse()
            .expect("JOB_TIMEOUT_SECONDS must be a valid u64");

        let poll_interval_ms: u64 = std::env::var("QUEUE_POLL_INTERVAL_MS")
            .unwrap_or_else(|_| defaults.poll_interval_ms.to_string())
            .parse()
            .expect("QUEUE_POLL_INTERVAL_MS must be a valid u64");

        let output_dir = std::env::var("OUTPUT_DIR")
            .map(PathBuf::from)
            .unwrap_or(defaults.output_dir);

        let public_base_url = std::env::var("PUBLIC_BASE_URL")
            .unwrap_or(defaults.public_base_url)
            .trim_end_matches('/')
            .to_string();

        let scale_factor: f64 = std::env::var("SCALE_FACTOR")
            .unwrap_or_else(|_| defaults.scale_factor.to_string())
            .parse()
            .expect("SCALE_FACTOR must be a valid f64");

        let num_floors: u32 = std::env::var("NUM_FLOORS")
            .unwrap_or_else(|_| defaults.num_floors.to_string())
            .parse()
            .expect("NUM_FLOORS must be a valid u32");

        Self {
            job_timeout_secs,
            poll_interval_ms,
            output_dir,
            public_base_url,
            scale_factor,
            num_floors,
        }
    }
}
