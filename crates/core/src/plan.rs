//! Structured floor-plan records.
//!
//! These are the tagged replacements for what used to be free-form
//! metadata dictionaries: every field the API exposes is typed here.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::geometry::{BoundingBox, Point};
use crate::options::GenerationOptions;

/// Default wall thickness when line extraction has no better estimate.
pub const DEFAULT_WALL_THICKNESS_PX: u32 = 5;

/// A classified room with geometry, furnishing, and insights.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Room {
    /// Globally unique room id, re-numbered across floors.
    pub id: u32,
    /// Zero-based floor index.
    pub floor: u32,
    /// Classified type label, e.g. `"Living Room"`. Heuristic, not a
    /// semantic classification.
    pub room_type: String,
    /// Display label as rendered on the plan.
    pub label: String,
    /// Closed boundary polygon (closing edge implied).
    pub polygon: Vec<Point>,
    pub centroid: Point,
    pub area_pixels: f64,
    pub area_sqft: f64,
    pub perimeter_pixels: f64,
    pub bounding_box: BoundingBox,
    /// Area / convex-hull area, in `(0, 1]`.
    pub convexity: f64,
    pub furniture: Vec<Furniture>,
    pub insights: Vec<String>,
}

/// A straight wall segment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Wall {
    pub id: u32,
    pub start: Point,
    pub end: Point,
    pub length_pixels: f64,
    pub length_feet: f64,
    pub thickness_pixels: u32,
}

/// A placed furniture item. The position is guaranteed to lie inside
/// the owning room's polygon; items failing that test are never
/// emitted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Furniture {
    pub id: u32,
    /// Type tag, e.g. `"bed"`, `"sofa"`, `"dining_table"`.
    pub kind: String,
    pub width_ft: f64,
    pub length_ft: f64,
    pub position: Point,
    pub rotation_deg: f64,
}

/// Plan-level validation scores.
///
/// In demo mode these are synthesized in fixed bands; on the neural
/// path they are fixed placeholder values. Neither is authoritative.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationScores {
    pub spatial_consistency_score: f64,
    pub structural_validity_score: f64,
    pub issues: Vec<String>,
}

/// Complete structured description of a generated floor plan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FloorPlanMetadata {
    pub floor_plan_id: Uuid,
    /// Layout archetype name; only set by the procedural path.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub layout_type: Option<String>,
    /// `[width, height]` of the raster in pixels.
    pub image_size: [u32; 2],
    /// Pixel-to-feet conversion factor.
    pub scale_factor: f64,
    pub total_area_sqft: f64,
    pub num_rooms: usize,
    pub num_bedrooms: usize,
    pub num_bathrooms: usize,
    pub rooms: Vec<Room>,
    pub walls: Vec<Wall>,
    pub validation: ValidationScores,
    /// True when the plan came from the procedural fallback rather
    /// than neural generation.
    pub demo_mode: bool,
}

impl FloorPlanMetadata {
    /// Count bedrooms and bathrooms by substring match on room types
    /// and refresh the cached counters.
    pub fn refresh_counts(&mut self) {
        self.num_rooms = self.rooms.len();
        self.num_bedrooms = self
            .rooms
            .iter()
            .filter(|r| r.room_type.to_lowercase().contains("bedroom"))
            .count();
        self.num_bathrooms = self
            .rooms
            .iter()
            .filter(|r| r.room_type.to_lowercase().contains("bathroom"))
            .count();
    }
}

/// Parameters the worker needs to process one submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub image_url: String,
    pub options: GenerationOptions,
}
