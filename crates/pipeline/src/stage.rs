//! Pipeline stages and their progress checkpoints.

/// The five sequential stages of a generation job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Download,
    FeatureExtraction,
    LayoutGeneration,
    PostProcessing,
    Upload,
}

/// Progress window occupied by internal diffusion steps during
/// layout generation.
pub const LAYOUT_PROGRESS_WINDOW: (f64, f64) = (0.30, 0.70);

impl Stage {
    /// Stage name recorded on the job while the stage runs.
    pub fn name(self) -> &'static str {
        match self {
            Self::Download => "download",
            Self::FeatureExtraction => "feature_extraction",
            Self::LayoutGeneration => "layout_generation",
            Self::PostProcessing => "post_processing",
            Self::Upload => "upload",
        }
    }

    /// Overall progress fraction reported when the stage completes.
    pub fn checkpoint(self) -> f64 {
        match self {
            Self::Download => 0.10,
            Self::FeatureExtraction => 0.30,
            Self::LayoutGeneration => 0.70,
            Self::PostProcessing => 0.90,
            Self::Upload => 1.00,
        }
    }
}

/// Rescale an internal step fraction in `[0, 1]` into the layout
/// generation window. Out-of-range inputs are clamped.
pub fn rescale_layout_progress(step_fraction: f64) -> f64 {
    let (lo, hi) = LAYOUT_PROGRESS_WINDOW;
    lo + (hi - lo) * step_fraction.clamp(0.0, 1.0)
}
