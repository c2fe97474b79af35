//! Textual design insights per room.
//!
//! Driven by the classified type and area thresholds, plus one
//! shape-based rule that fires for any room whose convexity ratio
//! indicates a non-rectangular footprint.

/// Rooms below this convexity get the built-ins suggestion.
const CONVEXITY_INSIGHT_THRESHOLD: f64 = 0.75;

pub fn room_insights(room_type: &str, area_sqft: f64, convexity: f64) -> Vec<String> {
    let kind = room_type.to_lowercase();
    let mut insights = Vec::new();

    if kind.contains("living") {
        if area_sqft > 300.0 {
            insights.push("Spacious living area with room for multiple seating zones.".to_string());
        } else if area_sqft < 150.0 {
            insights.push("Compact living area; low-profile furniture keeps it open.".to_string());
        }
    } else if kind.contains("bedroom") {
        if area_sqft > 200.0 {
            insights.push("Large bedroom with space for a dedicated seating nook.".to_string());
        } else if area_sqft < 100.0 {
            insights.push("Cozy bedroom; wall-mounted storage frees up floor space.".to_string());
        }
    } else if kind.contains("bathroom") {
        if area_sqft > 80.0 {
            insights.push("Generous bathroom footprint could fit a double vanity.".to_string());
        }
    } else if kind.contains("kitchen") || kind.contains("dining") {
        if area_sqft > 150.0 {
            insights.push("Open kitchen layout with space for casual dining.".to_string());
        }
    }

    if convexity < CONVEXITY_INSIGHT_THRESHOLD {
        insights.push(
            "Irregular room shape; built-in furniture can make use of the recessed corners."
                .to_string(),
        );
    }

    insights
}
