//! Demo-mode structured metadata.
//!
//! Synthesized independently of the raster from the same seed. Areas
//! are allocated by proportional random splits with the final room
//! absorbing the remainder, so per-room areas always sum exactly to
//! the declared total. Validation scores are drawn from fixed bands
//! and are explicitly non-authoritative.

use planforge_core::geometry::{bounding_box, Point};
use planforge_core::plan::{FloorPlanMetadata, Room, ValidationScores};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::layout;
use crate::FloorPlanSynthesizer;

pub fn demo_metadata(p: &FloorPlanSynthesizer, seed: u64) -> FloorPlanMetadata {
    let mut rng = StdRng::seed_from_u64(seed);
    // First draw: archetype, shared with the renderer.
    let kind = layout::draw_kind(&mut rng);

    let names = kind.name_template();
    let total_area: i64 = rng.random_range(800..=3200);

    let mut rooms = Vec::with_capacity(names.len());
    let mut remaining = total_area;
    for (i, name) in names.iter().enumerate() {
        let area = if i == names.len() - 1 {
            // Last room absorbs the remainder: areas sum exactly.
            remaining
        } else {
            let slice = rng.random_range((remaining / 10).max(1)..=(remaining * 35 / 100).max(1));
            remaining -= slice;
            slice
        };
        rooms.push(demo_room(i as u32 + 1, name, area as f64));
    }

    // Rounding can land on the open upper bound; clamp back inside.
    let spatial = round2(rng.random_range(0.72..0.95)).min(0.94);
    let structural = round2(spatial + rng.random_range(-0.05..0.05)).min(0.99);
    let scale_factor = round1(rng.random_range(1.5..3.0));

    // Deterministic v4 id: the seeded rng is the entropy source.
    let floor_plan_id = uuid::Builder::from_random_bytes(rng.random::<[u8; 16]>()).into_uuid();

    let mut meta = FloorPlanMetadata {
        floor_plan_id,
        layout_type: Some(kind.name().to_string()),
        image_size: [p.width, p.height],
        scale_factor,
        total_area_sqft: total_area as f64,
        num_rooms: 0,
        num_bedrooms: 0,
        num_bathrooms: 0,
        rooms,
        walls: Vec::new(),
        validation: ValidationScores {
            spatial_consistency_score: spatial,
            structural_validity_score: structural,
            issues: Vec::new(),
        },
        demo_mode: true,
    };
    meta.refresh_counts();
    meta
}

/// A demo room record. Demo metadata carries no polygon geometry;
/// only ids, types, labels, and areas are meaningful.
fn demo_room(id: u32, name: &str, area_sqft: f64) -> Room {
    let mut room_type = name.to_lowercase().replace(' ', "_");
    if room_type.starts_with("bedroom") {
        room_type = "bedroom".to_string();
    }
    Room {
        id,
        floor: 0,
        room_type,
        label: name.to_string(),
        polygon: Vec::new(),
        centroid: Point::new(0.0, 0.0),
        area_pixels: 0.0,
        area_sqft,
        perimeter_pixels: 0.0,
        bounding_box: bounding_box(&[]),
        convexity: 1.0,
        furniture: Vec::new(),
        insights: Vec::new(),
    }
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

fn round1(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn areas_sum_exactly_to_total() {
        let p = FloorPlanSynthesizer::default();
        for seed in [0u64, 1, 42, 7777, u64::MAX] {
            let meta = demo_metadata(&p, seed);
            let sum: f64 = meta.rooms.iter().map(|r| r.area_sqft).sum();
            assert_eq!(sum, meta.total_area_sqft, "seed {seed}");
        }
    }

    #[test]
    fn total_area_within_band() {
        let p = FloorPlanSynthesizer::default();
        for seed in 0..20u64 {
            let meta = demo_metadata(&p, seed);
            assert!((800.0..=3200.0).contains(&meta.total_area_sqft));
        }
    }

    #[test]
    fn bedroom_names_collapse_to_bedroom_type() {
        let r = demo_room(1, "Bedroom 2", 120.0);
        assert_eq!(r.room_type, "bedroom");
        let r = demo_room(2, "Dining Room", 120.0);
        assert_eq!(r.room_type, "dining_room");
    }

    #[test]
    fn demo_mode_is_flagged() {
        let meta = demo_metadata(&FloorPlanSynthesizer::default(), 5);
        assert!(meta.demo_mode);
    }

    #[test]
    fn validation_scores_in_demo_bands() {
        let p = FloorPlanSynthesizer::default();
        for seed in 0..200u64 {
            let v = demo_metadata(&p, seed).validation;
            assert!((0.72..0.95).contains(&v.spatial_consistency_score));
            assert!((0.67..1.0).contains(&v.structural_validity_score));
        }
    }

    #[test]
    fn floor_plan_id_is_deterministic_per_seed() {
        let p = FloorPlanSynthesizer::default();
        assert_eq!(demo_metadata(&p, 9).floor_plan_id, demo_metadata(&p, 9).floor_plan_id);
        assert_ne!(demo_metadata(&p, 9).floor_plan_id, demo_metadata(&p, 10).floor_plan_id);
    }

    #[test]
    fn counts_are_refreshed() {
        let meta = demo_metadata(&FloorPlanSynthesizer::default(), 3);
        assert_eq!(meta.num_rooms, meta.rooms.len());
        assert!(meta.num_bedrooms >= 1);
        assert!(meta.num_bathrooms >= 1);
    }
}
