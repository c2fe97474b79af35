//! Region contour extraction.
//!
//! Traces the outer boundary of a labeled region with Moore-neighbor
//! tracing and collapses near-collinear runs with a tolerance
//! proportional to the contour length.

use planforge_core::geometry::{perimeter, simplify, Point};

/// Simplification tolerance as a fraction of the contour perimeter.
const SIMPLIFY_RATIO: f64 = 0.01;

/// Clockwise Moore neighborhood, starting west.
const NEIGHBORS: [(i32, i32); 8] = [
    (-1, 0),
    (-1, -1),
    (0, -1),
    (1, -1),
    (1, 0),
    (1, 1),
    (0, 1),
    (-1, 1),
];

/// Extract the simplified boundary polygon of `label` within the
/// label buffer. Returns `None` for regions too small to form a
/// polygon.
pub fn region_polygon(labels: &[u32], label: u32, w: usize, h: usize) -> Option<Vec<Point>> {
    let contour = trace_boundary(labels, label, w, h)?;
    if contour.len() < 3 {
        return None;
    }
    let epsilon = SIMPLIFY_RATIO * perimeter(&contour);
    let poly = simplify(&contour, epsilon);
    (poly.len() >= 3).then_some(poly)
}

/// Moore-neighbor boundary trace with Jacob's stopping criterion.
fn trace_boundary(labels: &[u32], label: u32, w: usize, h: usize) -> Option<Vec<Point>> {
    let inside = |x: i32, y: i32| {
        x >= 0
            && y >= 0
            && (x as usize) < w
            && (y as usize) < h
            && labels[y as usize * w + x as usize] == label
    };

    // Topmost-leftmost pixel of the region.
    let start = labels.iter().position(|&l| l == label)?;
    let (sx, sy) = ((start % w) as i32, (start / w) as i32);

    let mut contour = vec![Point::new(sx as f64, sy as f64)];
    // Entered the start pixel from the west.
    let mut current = (sx, sy);
    let mut backtrack_dir = 0usize;
    let mut first_move: Option<((i32, i32), usize)> = None;
    let step_cap = 4 * w * h;

    for _ in 0..step_cap {
        let mut found = None;
        for k in 0..8 {
            let dir = (backtrack_dir + k) % 8;
            let (dx, dy) = NEIGHBORS[dir];
            let (nx, ny) = (current.0 + dx, current.1 + dy);
            if inside(nx, ny) {
                found = Some(((nx, ny), dir));
                break;
            }
        }
        let ((nx, ny), dir) = match found {
            Some(f) => f,
            // Isolated pixel.
            None => return Some(contour),
        };

        // Stop once we re-enter the start pixel the same way we
        // first left it.
        if (nx, ny) == (sx, sy) {
            match first_move {
                Some(fm) if fm.1 == dir => break,
                None => break,
                _ => {}
            }
        }
        if first_move.is_none() {
            first_move = Some(((nx, ny), dir));
        }

        contour.push(Point::new(nx as f64, ny as f64));
        current = (nx, ny);
        // Restart the scan from the neighbor after the one we came
        // from (Moore backtracking).
        backtrack_dir = (dir + 5) % 8;
    }

    Some(contour)
}
