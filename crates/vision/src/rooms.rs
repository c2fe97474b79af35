//! Room validation and metadata synthesis.
//!
//! Turns surviving region polygons and wall segments into a complete
//! [`FloorPlanMetadata`]: per-room geometry metrics, an area-banded
//! type heuristic, optional multi-floor replication with global id
//! re-numbering, furniture, and insights.

use planforge_core::geometry::{
    area, bounding_box, centroid, convexity, is_simple, perimeter, Point,
};
use planforge_core::plan::{
    FloorPlanMetadata, Room, ValidationScores, Wall, DEFAULT_WALL_THICKNESS_PX,
};
use uuid::Uuid;

use crate::walls::WallSegment;

/// Polygons below this pixel area are discarded before synthesis.
pub const MIN_ROOM_AREA_PX: f64 = 500.0;

/// Placeholder validation scores for the neural path. Stand-ins for
/// a real spatial validator; see the plan-level score docs.
const SPATIAL_CONSISTENCY_PLACEHOLDER: f64 = 0.85;
const STRUCTURAL_VALIDITY_PLACEHOLDER: f64 = 0.90;

/// Area-band boundaries, as fractions of the largest room's area.
const LIVING_BAND: f64 = 0.55;
const BEDROOM_BAND: f64 = 0.25;

/// Drop polygons that are too small or self-intersecting.
pub fn validate_polygons(polygons: Vec<Vec<Point>>, min_area_px: f64) -> Vec<Vec<Point>> {
    let before = polygons.len();
    let valid: Vec<_> = polygons
        .into_iter()
        .filter(|p| area(p) >= min_area_px && is_simple(p))
        .collect();
    if valid.len() < before {
        tracing::debug!(kept = valid.len(), dropped = before - valid.len(), "room validation");
    }
    valid
}

/// Area-banded room-type heuristic. A placeholder for semantic
/// classification: the largest band is called the living room,
/// mid-sized rooms bedrooms, small ones bathrooms.
pub fn classify_room_type(area_px: f64, max_area_px: f64) -> &'static str {
    let ratio = if max_area_px > 0.0 { area_px / max_area_px } else { 1.0 };
    if ratio >= LIVING_BAND {
        "Living Room"
    } else if ratio >= BEDROOM_BAND {
        "Bedroom"
    } else {
        "Bathroom"
    }
}

/// Assemble the full metadata record from validated polygons and
/// extracted wall segments. The room set is replicated across
/// `num_floors` floors with globally unique ids.
pub fn synthesize_metadata(
    image_size: [u32; 2],
    polygons: Vec<Vec<Point>>,
    segments: &[WallSegment],
    scale_factor: f64,
    num_floors: u32,
) -> FloorPlanMetadata {
    let num_floors = num_floors.max(1);
    let max_area = polygons.iter().map(|p| area(p)).fold(0.0f64, f64::max);

    let mut rooms = Vec::with_capacity(polygons.len() * num_floors as usize);
    let mut next_id = 1u32;
    for floor in 0..num_floors {
        let mut type_counts: std::collections::HashMap<&str, u32> = std::collections::HashMap::new();
        for poly in &polygons {
            let area_px = area(poly);
            let room_type = classify_room_type(area_px, max_area);
            let ordinal = type_counts.entry(room_type).or_insert(0);
            *ordinal += 1;
            let label = if *ordinal == 1 {
                room_type.to_string()
            } else {
                format!("{room_type} {ordinal}")
            };

            let area_sqft = area_px * scale_factor * scale_factor;
            let conv = convexity(poly);
            rooms.push(Room {
                id: next_id,
                floor,
                room_type: room_type.to_string(),
                label,
                polygon: poly.clone(),
                centroid: centroid(poly),
                area_pixels: area_px,
                area_sqft,
                perimeter_pixels: perimeter(poly),
                bounding_box: bounding_box(poly),
                convexity: conv,
                furniture: crate::furnish::furnish_room(room_type, poly, area_sqft),
                insights: crate::insights::room_insights(room_type, area_sqft, conv),
            });
            next_id += 1;
        }
    }

    let walls = segments
        .iter()
        .enumerate()
        .map(|(i, s)| Wall {
            id: i as u32 + 1,
            start: s.start,
            end: s.end,
            length_pixels: s.length(),
            length_feet: s.length() * scale_factor,
            thickness_pixels: DEFAULT_WALL_THICKNESS_PX,
        })
        .collect();

    let mut meta = FloorPlanMetadata {
        floor_plan_id: Uuid::new_v4(),
        layout_type: None,
        image_size,
        scale_factor,
        total_area_sqft: rooms.iter().map(|r| r.area_sqft).sum(),
        num_rooms: 0,
        num_bedrooms: 0,
        num_bathrooms: 0,
        rooms,
        walls,
        validation: ValidationScores {
            spatial_consistency_score: SPATIAL_CONSISTENCY_PLACEHOLDER,
            structural_validity_score: STRUCTURAL_VALIDITY_PLACEHOLDER,
            issues: Vec::new(),
        },
        demo_mode: false,
    };
    meta.refresh_counts();
    meta
}
