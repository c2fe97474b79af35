//! High-fidelity mask-generation fallback.
//!
//! When the watershed pass finds fewer regions than a plausible floor
//! plan should have, the engine escalates to a promptable mask
//! generator. The collaborator is behind a trait so the heavy model
//! stays out of this crate; construction is deferred until the first
//! degenerate segmentation actually needs it.

use async_trait::async_trait;
use image::{GrayImage, RgbImage};
use planforge_core::geometry::Point;

use crate::contour;
use crate::raster;
use crate::VisionError;

/// One binary region proposal from the mask generator, with its
/// foreground pixel count for area ranking.
pub struct RegionMask {
    pub mask: GrayImage,
    pub area: u64,
}

impl RegionMask {
    pub fn new(mask: GrayImage) -> Self {
        let area = mask.pixels().filter(|p| p.0[0] != 0).count() as u64;
        Self { mask, area }
    }
}

/// Promptable segmentation collaborator. Implementations are expected
/// to be expensive to build and cheap-ish to call.
#[async_trait]
pub trait MaskGenerator: Send + Sync {
    /// Propose candidate region masks for the given floor-plan image.
    async fn generate(&self, image: &RgbImage) -> Result<Vec<RegionMask>, VisionError>;
}

/// Deferred constructor for the mask generator. Failures here are
/// tolerated by the caller: a fallback that cannot load leaves the
/// watershed result in place.
pub type MaskGeneratorFactory =
    Box<dyn Fn() -> Result<std::sync::Arc<dyn MaskGenerator>, VisionError> + Send + Sync>;

/// Convert mask proposals to boundary polygons, largest areas first.
/// Each mask contributes its connected components independently.
pub fn masks_to_polygons(mut masks: Vec<RegionMask>) -> Vec<Vec<Point>> {
    masks.sort_by(|a, b| b.area.cmp(&a.area));
    let mut polygons = Vec::new();
    for m in &masks {
        let (w, h) = m.mask.dimensions();
        let (labels, count) = raster::connected_components(&m.mask);
        for label in 1..=count {
            if let Some(poly) = contour::region_polygon(&labels, label, w as usize, h as usize) {
                polygons.push(poly);
            }
        }
    }
    polygons
}
