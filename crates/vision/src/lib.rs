//! Geometric post-processing engine.
//!
//! Converts a floor-plan raster into structured geometry: watershed
//! room segmentation with a lazy high-fidelity mask-generator
//! fallback, scan-line wall extraction, polygon validation, and
//! metadata synthesis (metrics, type heuristic, furniture, insights).
//! Only the neural generation path runs through here; the procedural
//! path emits its own metadata directly.

mod contour;
mod error;
mod furnish;
mod insights;
mod mask;
mod raster;
mod rooms;
mod segmentation;
mod walls;

pub use error::VisionError;
pub use mask::{MaskGenerator, MaskGeneratorFactory, RegionMask};
pub use rooms::MIN_ROOM_AREA_PX;
pub use walls::WallSegment;

use std::sync::Arc;

use image::RgbImage;
use planforge_core::plan::FloorPlanMetadata;
use tokio::sync::OnceCell;

/// Post-processor for generated floor-plan rasters.
///
/// The mask generator is expensive to construct, so it is built at
/// most once, and only when a segmentation actually degenerates.
pub struct PostProcessor {
    scale_factor: f64,
    num_floors: u32,
    mask_factory: Option<MaskGeneratorFactory>,
    mask_generator: OnceCell<Arc<dyn MaskGenerator>>,
}

impl PostProcessor {
    pub fn new(scale_factor: f64, num_floors: u32) -> Self {
        Self {
            scale_factor,
            num_floors,
            mask_factory: None,
            mask_generator: OnceCell::new(),
        }
    }

    /// Configure the deferred mask-generator fallback. Without one,
    /// degenerate segmentations keep the watershed result.
    pub fn with_mask_generator(mut self, factory: MaskGeneratorFactory) -> Self {
        self.mask_factory = Some(factory);
        self
    }

    /// Run the full pipeline: segmentation (with fallback), wall
    /// extraction, validation, and metadata synthesis.
    pub async fn process(&self, image: &RgbImage) -> Result<FloorPlanMetadata, VisionError> {
        let (width, height) = image.dimensions();
        if width == 0 || height == 0 {
            return Err(VisionError::InvalidImage("empty image".to_string()));
        }
        let gray = image::imageops::grayscale(image);

        let mut polygons = segmentation::detect_room_polygons(&gray);
        if polygons.len() < segmentation::MIN_REGIONS {
            tracing::info!(
                regions = polygons.len(),
                "watershed found too few regions, consulting mask generator"
            );
            match self.mask_generator().await {
                Ok(generator) => match generator.generate(image).await {
                    Ok(masks) => {
                        let fallback = mask::masks_to_polygons(masks);
                        if !fallback.is_empty() {
                            polygons = fallback;
                        }
                    }
                    Err(err) => {
                        tracing::warn!(%err, "mask generation failed, keeping watershed regions")
                    }
                },
                Err(err) => {
                    tracing::warn!(%err, "mask generator unavailable, keeping watershed regions")
                }
            }
        }

        let segments = walls::detect_wall_segments(&gray);
        let polygons = rooms::validate_polygons(polygons, MIN_ROOM_AREA_PX);

        Ok(rooms::synthesize_metadata(
            [width, height],
            polygons,
            &segments,
            self.scale_factor,
            self.num_floors,
        ))
    }

    async fn mask_generator(&self) -> Result<&Arc<dyn MaskGenerator>, VisionError> {
        let factory = self
            .mask_factory
            .as_ref()
            .ok_or_else(|| VisionError::MaskGenerator("no mask generator configured".to_string()))?;
        self.mask_generator
            .get_or_try_init(|| async { factory() })
            .await
    }
}
