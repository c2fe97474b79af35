//! Floor-plan raster rendering.
//!
//! Draws the outer wall, per-room fills and borders, centered labels,
//! door gaps, and the title/compass annotation. Every random draw
//! comes from the seeded rng, in a fixed order, so a seed always
//! produces the same bytes.

use image::{Rgb, RgbImage};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::font;
use crate::layout::{self, LayoutKind, Rect};
use crate::palette;
use crate::FloorPlanSynthesizer;

const WALL_COLOR: Rgb<u8> = Rgb([40, 40, 40]);
const LABEL_COLOR: Rgb<u8> = Rgb([60, 60, 60]);
const ANNOTATION_COLOR: Rgb<u8> = Rgb([100, 100, 100]);
const DOOR_COLOR: Rgb<u8> = Rgb([255, 255, 255]);

const OUTER_WALL_WIDTH: i32 = 4;
const ROOM_BORDER_WIDTH: i32 = 2;
const DOOR_LENGTH: i32 = 22;

pub fn render_floor_plan(p: &FloorPlanSynthesizer, seed: u64) -> RgbImage {
    let mut rng = StdRng::seed_from_u64(seed);
    let kind = layout::draw_kind(&mut rng);
    let bedrooms = if kind == LayoutKind::Standard {
        rng.random_range(2..=4)
    } else {
        0
    };

    tracing::debug!(seed, kind = kind.name(), "rendering floor plan");

    let (width, height) = (p.width as i32, p.height as i32);
    let m = p.margin as i32;
    let inner_w = width - 2 * m;
    let inner_h = height - 2 * m;

    let mut img = RgbImage::from_pixel(p.width, p.height, Rgb([255, 255, 255]));

    let rooms = layout::generate_rooms(kind, m, inner_w, inner_h, bedrooms, &mut rng);

    // Colors are assigned in a separate pass so the draw order stays
    // independent of render details.
    let colors: Vec<Rgb<u8>> = rooms
        .iter()
        .map(|r| palette::room_color(&r.name, &mut rng))
        .collect();

    stroke_rect(
        &mut img,
        Rect { x1: m, y1: m, x2: width - m, y2: height - m },
        WALL_COLOR,
        OUTER_WALL_WIDTH,
    );

    for (room, color) in rooms.iter().zip(&colors) {
        fill_rect(&mut img, room.rect, *color);
        stroke_rect(&mut img, room.rect, WALL_COLOR, ROOM_BORDER_WIDTH);

        let label = room.name.to_uppercase();
        let (tw, th) = font::measure(&label);
        // Skip the label when the room cannot contain its measured box.
        if room.rect.width() > tw as i32 + 6 && room.rect.height() > th as i32 + 6 {
            let cx = (room.rect.x1 + room.rect.x2) / 2;
            let cy = (room.rect.y1 + room.rect.y2) / 2;
            font::draw_text(&mut img, cx - tw as i32 / 2, cy - th as i32 / 2, &label, LABEL_COLOR);
        }
    }

    for room in &rooms {
        draw_door(&mut img, room.rect, m, width, height, &mut rng);
    }

    let title = format!("Floor Plan - {} Layout", kind.title());
    font::draw_text(&mut img, m + 5, 8, &title.to_uppercase(), ANNOTATION_COLOR);
    let compass = ["N ^", "N >", "N V", "N <"];
    let dir = compass[rng.random_range(0..compass.len())];
    font::draw_text(&mut img, width - 60, 8, dir, ANNOTATION_COLOR);

    img
}

/// Punch a white door gap through one randomly chosen wall of the
/// room. Walls on the building perimeter are skipped so doors never
/// open to the outside.
fn draw_door(img: &mut RgbImage, r: Rect, m: i32, width: i32, height: i32, rng: &mut StdRng) {
    let side = rng.random_range(0..4u8);
    match side {
        0 if r.y1 > m + 4 => {
            let dx = door_offset(rng, r.x1, r.x2);
            fill_rect(img, Rect { x1: dx, y1: r.y1 - 2, x2: dx + DOOR_LENGTH, y2: r.y1 + 2 }, DOOR_COLOR);
        }
        1 if r.y2 < height - m - 4 => {
            let dx = door_offset(rng, r.x1, r.x2);
            fill_rect(img, Rect { x1: dx, y1: r.y2 - 2, x2: dx + DOOR_LENGTH, y2: r.y2 + 2 }, DOOR_COLOR);
        }
        2 if r.x1 > m + 4 => {
            let dy = door_offset(rng, r.y1, r.y2);
            fill_rect(img, Rect { x1: r.x1 - 2, y1: dy, x2: r.x1 + 2, y2: dy + DOOR_LENGTH }, DOOR_COLOR);
        }
        3 if r.x2 < width - m - 4 => {
            let dy = door_offset(rng, r.y1, r.y2);
            fill_rect(img, Rect { x1: r.x2 - 2, y1: dy, x2: r.x2 + 2, y2: dy + DOOR_LENGTH }, DOOR_COLOR);
        }
        _ => {}
    }
}

/// Random door start along an edge, kept clear of the room corners.
fn door_offset(rng: &mut StdRng, lo: i32, hi: i32) -> i32 {
    let upper = (hi - DOOR_LENGTH - 5).max(lo + 11);
    rng.random_range(lo + 10..upper)
}

fn fill_rect(img: &mut RgbImage, r: Rect, color: Rgb<u8>) {
    let x1 = r.x1.max(0);
    let y1 = r.y1.max(0);
    let x2 = r.x2.min(img.width() as i32);
    let y2 = r.y2.min(img.height() as i32);
    for y in y1..y2 {
        for x in x1..x2 {
            img.put_pixel(x as u32, y as u32, color);
        }
    }
}

fn stroke_rect(img: &mut RgbImage, r: Rect, color: Rgb<u8>, width: i32) {
    fill_rect(img, Rect { x1: r.x1, y1: r.y1, x2: r.x2, y2: r.y1 + width }, color);
    fill_rect(img, Rect { x1: r.x1, y1: r.y2 - width, x2: r.x2, y2: r.y2 }, color);
    fill_rect(img, Rect { x1: r.x1, y1: r.y1, x2: r.x1 + width, y2: r.y2 }, color);
    fill_rect(img, Rect { x1: r.x2 - width, y1: r.y1, x2: r.x2, y2: r.y2 }, color);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canvas_has_requested_dimensions() {
        let img = render_floor_plan(&FloorPlanSynthesizer::default(), 7);
        assert_eq!(img.dimensions(), (512, 512));
    }

    #[test]
    fn outer_wall_is_drawn() {
        let p = FloorPlanSynthesizer::default();
        let img = render_floor_plan(&p, 7);
        // A pixel on the top outer wall stroke.
        assert_eq!(*img.get_pixel(256, p.margin + 1), WALL_COLOR);
    }

    #[test]
    fn margin_stays_white_outside_annotations() {
        let img = render_floor_plan(&FloorPlanSynthesizer::default(), 7);
        // Below the title band, left of the outer wall.
        assert_eq!(*img.get_pixel(5, 256), Rgb([255, 255, 255]));
    }

    #[test]
    fn different_seeds_differ() {
        let p = FloorPlanSynthesizer::default();
        let a = render_floor_plan(&p, 1);
        let b = render_floor_plan(&p, 2);
        assert_ne!(a.as_raw(), b.as_raw());
    }
}
