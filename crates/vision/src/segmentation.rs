//! Watershed room segmentation.
//!
//! The classic marker-based recipe: binarize, open to drop speckle,
//! take the distance transform, threshold its peaks into sure-
//! foreground seeds, grow sure-background by dilation, then flood the
//! unknown band between them in order of increasing "height" (darker
//! pixels are higher, so fronts from neighboring rooms meet at the
//! walls). Each marker that survives becomes one room polygon.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use image::GrayImage;
use planforge_core::geometry::Point;

use crate::contour;
use crate::raster;

/// Binarization split between wall ink and room fill.
pub const BINARY_THRESHOLD: u8 = 127;
/// Opening iterations applied before the distance transform.
const OPEN_ITERATIONS: u32 = 2;
/// Dilation iterations that grow the sure-background mask.
const BG_DILATE_ITERATIONS: u32 = 3;
/// Distance-transform peaks above this fraction of the global
/// maximum become sure-foreground seeds.
const FG_DISTANCE_RATIO: f32 = 0.5;
/// Below this many detected regions the watershed result is treated
/// as degenerate and the mask-generator fallback is consulted.
pub const MIN_REGIONS: usize = 2;

/// Detect room regions in a grayscale floor plan and return one
/// simplified boundary polygon per region, in image coordinates.
pub fn detect_room_polygons(gray: &GrayImage) -> Vec<Vec<Point>> {
    let (w, h) = gray.dimensions();
    let (w, h) = (w as usize, h as usize);

    let binary = raster::threshold(gray, BINARY_THRESHOLD);
    let opened = raster::open(&binary, OPEN_ITERATIONS);

    let dist = raster::distance_transform(&opened);
    let max_dist = dist.iter().copied().fold(0.0f32, f32::max);
    if max_dist <= 0.0 {
        return Vec::new();
    }

    let mut sure_fg = opened.clone();
    for (i, p) in sure_fg.pixels_mut().enumerate() {
        p.0[0] = if dist[i] > FG_DISTANCE_RATIO * max_dist { 255 } else { 0 };
    }
    let sure_bg = raster::dilate(&opened, BG_DILATE_ITERATIONS);

    let (seeds, seed_count) = raster::connected_components(&sure_fg);
    if seed_count == 0 {
        return Vec::new();
    }

    // Markers: 1 is definite background, seeds start at 2, 0 is the
    // unknown band the flood resolves.
    let mut markers = vec![0u32; w * h];
    for i in 0..w * h {
        if seeds[i] != 0 {
            markers[i] = seeds[i] + 1;
        } else if sure_bg.as_raw()[i] == 0 {
            markers[i] = 1;
        }
    }

    flood(gray, &mut markers, w, h);

    let mut polygons = Vec::new();
    for label in 2..=seed_count + 1 {
        if let Some(poly) = contour::region_polygon(&markers, label, w, h) {
            polygons.push(poly);
        }
    }
    tracing::debug!(regions = polygons.len(), "watershed segmentation complete");
    polygons
}

/// Priority-flood the unknown band. Bright pixels (room interiors)
/// are low terrain and flood first; dark wall ink floods last, so
/// competing fronts collide there and the collision pixels stay
/// unlabeled as region boundaries.
fn flood(gray: &GrayImage, markers: &mut [u32], w: usize, h: usize) {
    let height = |i: usize| 255 - gray.as_raw()[i];
    let mut heap: BinaryHeap<Reverse<(u8, u64, usize)>> = BinaryHeap::new();
    let mut order = 0u64;
    let mut queued = vec![false; w * h];

    let neighbors = |i: usize| {
        let (x, y) = (i % w, i / w);
        let mut n = [usize::MAX; 4];
        if x > 0 {
            n[0] = i - 1;
        }
        if x + 1 < w {
            n[1] = i + 1;
        }
        if y > 0 {
            n[2] = i - w;
        }
        if y + 1 < h {
            n[3] = i + w;
        }
        n
    };

    for i in 0..w * h {
        if markers[i] == 0 {
            continue;
        }
        for j in neighbors(i) {
            if j != usize::MAX && markers[j] == 0 && !queued[j] {
                queued[j] = true;
                heap.push(Reverse((height(j), order, j)));
                order += 1;
            }
        }
    }

    while let Some(Reverse((_, _, i))) = heap.pop() {
        if markers[i] != 0 {
            continue;
        }
        // Adopt the label of the flooding front, unless two distinct
        // fronts meet here.
        let mut label = 0u32;
        let mut collision = false;
        for j in neighbors(i) {
            if j == usize::MAX || markers[j] == 0 {
                continue;
            }
            if label == 0 {
                label = markers[j];
            } else if markers[j] != label {
                collision = true;
            }
        }
        if label == 0 {
            continue;
        }
        if collision {
            // Boundary pixel: park it on the background label so no
            // region claims it.
            markers[i] = 1;
            continue;
        }
        markers[i] = label;
        for j in neighbors(i) {
            if j != usize::MAX && markers[j] == 0 && !queued[j] {
                queued[j] = true;
                heap.push(Reverse((height(j), order, j)));
                order += 1;
            }
        }
    }
}
