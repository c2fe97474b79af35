//! Per-room-type color palettes.
//!
//! Colors are for visual distinction only and carry no semantic
//! meaning. Unmatched room names fall back to a random pastel.

use image::Rgb;
use rand::rngs::StdRng;
use rand::Rng;

/// Candidate fill colors per room-type prefix.
const PALETTES: &[(&str, &[Rgb<u8>])] = &[
    ("Living", &[Rgb([230, 245, 255]), Rgb([220, 240, 250]), Rgb([235, 240, 255])]),
    ("Kitchen", &[Rgb([255, 245, 230]), Rgb([255, 240, 220]), Rgb([250, 245, 235])]),
    ("Bedroom", &[Rgb([240, 255, 240]), Rgb([255, 240, 245]), Rgb([245, 240, 255]), Rgb([255, 250, 230])]),
    ("Bathroom", &[Rgb([230, 230, 255]), Rgb([220, 240, 255]), Rgb([235, 235, 250])]),
    ("Dining", &[Rgb([255, 250, 235]), Rgb([250, 248, 230]), Rgb([255, 245, 240])]),
    ("Study", &[Rgb([245, 240, 230]), Rgb([240, 245, 235]), Rgb([250, 245, 240])]),
    ("Hall", &[Rgb([250, 250, 240]), Rgb([245, 245, 240]), Rgb([248, 248, 245])]),
    ("Garage", &[Rgb([235, 235, 235]), Rgb([230, 230, 230]), Rgb([240, 240, 235])]),
    ("Balcony", &[Rgb([240, 255, 245]), Rgb([245, 255, 240]), Rgb([235, 250, 240])]),
    ("Laundry", &[Rgb([240, 240, 255]), Rgb([245, 240, 250]), Rgb([240, 245, 255])]),
];

/// Pick a fill color for a room name, consuming draws from `rng`.
pub fn room_color(name: &str, rng: &mut StdRng) -> Rgb<u8> {
    let lower = name.to_lowercase();
    for (prefix, colors) in PALETTES {
        if lower.starts_with(&prefix.to_lowercase()) {
            return colors[rng.random_range(0..colors.len())];
        }
    }
    // Random pastel fallback.
    Rgb([
        rng.random_range(230..=255),
        rng.random_range(230..=255),
        rng.random_range(230..=255),
    ])
}
