//! Rule-based furniture layout.
//!
//! Candidates are placed at fixed fractions of the room's bounding
//! box, keyed by substring match on the classified room type. Every
//! candidate is point-in-polygon checked; items that land outside an
//! irregular room are silently skipped rather than clipped.

use planforge_core::geometry::{bounding_box, contains_point, Point};
use planforge_core::plan::Furniture;

/// Kitchens and dining areas above this size get a full dining table
/// instead of an island.
const DINING_TABLE_MIN_SQFT: f64 = 120.0;

struct Candidate {
    kind: &'static str,
    width_ft: f64,
    length_ft: f64,
    /// Position as a fraction of the bounding box.
    fx: f64,
    fy: f64,
    rotation_deg: f64,
}

const fn cand(kind: &'static str, width_ft: f64, length_ft: f64, fx: f64, fy: f64) -> Candidate {
    Candidate {
        kind,
        width_ft,
        length_ft,
        fx,
        fy,
        rotation_deg: 0.0,
    }
}

/// Derive a furniture layout for one room. Positions are in image
/// pixel coordinates.
pub fn furnish_room(room_type: &str, polygon: &[Point], area_sqft: f64) -> Vec<Furniture> {
    let kind = room_type.to_lowercase();
    let candidates: Vec<Candidate> = if kind.contains("bedroom") {
        vec![
            cand("bed", 5.0, 6.5, 0.5, 0.3),
            cand("nightstand", 1.5, 1.5, 0.28, 0.22),
            cand("nightstand", 1.5, 1.5, 0.72, 0.22),
        ]
    } else if kind.contains("living") {
        vec![
            cand("sofa", 7.0, 3.0, 0.5, 0.25),
            cand("rug", 8.0, 5.0, 0.5, 0.55),
            cand("tv_stand", 5.0, 1.5, 0.5, 0.88),
        ]
    } else if kind.contains("bathroom") {
        vec![
            cand("toilet", 1.5, 2.3, 0.2, 0.2),
            cand("tub", 2.5, 5.0, 0.75, 0.72),
        ]
    } else if kind.contains("kitchen") || kind.contains("dining") {
        if kind.contains("dining") || area_sqft > DINING_TABLE_MIN_SQFT {
            vec![cand("dining_table", 6.0, 3.5, 0.5, 0.5)]
        } else {
            vec![cand("island", 4.0, 2.5, 0.5, 0.5)]
        }
    } else {
        Vec::new()
    };

    let bbox = bounding_box(polygon);
    let (w, h) = (bbox.max_x - bbox.min_x, bbox.max_y - bbox.min_y);

    let mut placed = Vec::new();
    for c in candidates {
        let position = Point::new(bbox.min_x + c.fx * w, bbox.min_y + c.fy * h);
        if !contains_point(polygon, position) {
            continue;
        }
        placed.push(Furniture {
            id: placed.len() as u32 + 1,
            kind: c.kind.to_string(),
            width_ft: c.width_ft,
            length_ft: c.length_ft,
            position,
            rotation_deg: c.rotation_deg,
        });
    }
    placed
}
