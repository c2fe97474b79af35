/// Errors produced by the geometric post-processing engine.
#[derive(Debug, thiserror::Error)]
pub enum VisionError {
    /// The input raster could not be interpreted.
    #[error("Invalid floor-plan image: {0}")]
    InvalidImage(String),

    /// The lazy mask-generator collaborator failed to initialize or
    /// to produce masks.
    #[error("Mask generator failed: {0}")]
    MaskGenerator(String),
}
