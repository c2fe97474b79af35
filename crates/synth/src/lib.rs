//! Deterministic procedural floor-plan synthesizer.
//!
//! Produces a plausible-looking floor-plan raster and a matching
//! structured description without any neural inference. Used as the
//! fallback (demo) path when no accelerator is available or a model
//! call fails, so reproducibility is the contract: the same input
//! image bytes and source identifier always yield the same seed, and
//! the seed is the only randomness source.
//!
//! Output is deliberately *plausible*, not architecturally valid.

mod font;
mod layout;
mod metadata;
mod palette;
mod render;
mod seed;

pub use layout::{LayoutKind, RoomRect};
pub use seed::derive_seed;

use image::RgbImage;
use planforge_core::plan::FloorPlanMetadata;

/// Canvas and margin parameters for synthesized plans.
#[derive(Debug, Clone)]
pub struct FloorPlanSynthesizer {
    pub width: u32,
    pub height: u32,
    /// Constant margin between canvas edge and the outer wall.
    pub margin: u32,
    /// Pixel-to-feet conversion reported in metadata.
    pub scale_factor: f64,
}

impl Default for FloorPlanSynthesizer {
    fn default() -> Self {
        Self {
            width: 512,
            height: 512,
            margin: 30,
            scale_factor: 2.0,
        }
    }
}

impl FloorPlanSynthesizer {
    /// Derive the layout seed for an input image and its source
    /// identifier. See [`seed::derive_seed`].
    pub fn seed_for(&self, input: &RgbImage, source_id: &str) -> u64 {
        seed::derive_seed(input, source_id)
    }

    /// Render the floor-plan raster for a seed.
    pub fn render(&self, seed: u64) -> RgbImage {
        render::render_floor_plan(self, seed)
    }

    /// Synthesize the demo-mode structured description for a seed.
    ///
    /// Independent of the raster, but the first random draw in both
    /// paths is the archetype choice, so raster and metadata always
    /// agree on the layout type.
    pub fn metadata(&self, seed: u64) -> FloorPlanMetadata {
        metadata::demo_metadata(self, seed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    fn white_image() -> RgbImage {
        RgbImage::from_pixel(512, 512, Rgb([255, 255, 255]))
    }

    #[test]
    fn identical_inputs_produce_identical_raster() {
        let synth = FloorPlanSynthesizer::default();
        let seed = synth.seed_for(&white_image(), "seedA");
        let a = synth.render(seed);
        let b = synth.render(seed);
        assert_eq!(a.as_raw(), b.as_raw());
    }

    #[test]
    fn identical_inputs_produce_identical_metadata() {
        let synth = FloorPlanSynthesizer::default();
        let seed = synth.seed_for(&white_image(), "seedA");
        let a = synth.metadata(seed);
        let b = synth.metadata(seed);
        assert_eq!(a.layout_type, b.layout_type);
        assert_eq!(a.total_area_sqft, b.total_area_sqft);
        assert_eq!(a.rooms.len(), b.rooms.len());
        for (ra, rb) in a.rooms.iter().zip(&b.rooms) {
            assert_eq!(ra.label, rb.label);
            assert_eq!(ra.area_sqft, rb.area_sqft);
        }
    }

    #[test]
    fn source_identifier_changes_seed() {
        let synth = FloorPlanSynthesizer::default();
        let img = white_image();
        assert_ne!(synth.seed_for(&img, "seedA"), synth.seed_for(&img, "seedB"));
    }

    #[test]
    fn image_content_changes_seed() {
        let synth = FloorPlanSynthesizer::default();
        let gray = RgbImage::from_pixel(512, 512, Rgb([200, 200, 200]));
        assert_ne!(
            synth.seed_for(&white_image(), "seedA"),
            synth.seed_for(&gray, "seedA")
        );
    }

    #[test]
    fn raster_and_metadata_agree_on_archetype() {
        let synth = FloorPlanSynthesizer::default();
        for seed in [1u64, 42, 999, 123_456] {
            let meta = synth.metadata(seed);
            // The raster draws its archetype with the same first rng
            // draw; re-deriving via the layout module must match.
            let kind = layout::choose_kind(seed);
            assert_eq!(meta.layout_type.as_deref(), Some(kind.name()));
        }
    }
}
