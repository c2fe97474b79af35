//! Polygon geometry primitives.
//!
//! All polygons are ordered vertex lists without a repeated closing
//! vertex; the edge from the last vertex back to the first is
//! implied. Coordinates are in pixel space.

use serde::{Deserialize, Serialize};

/// A 2D point in pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point.
    pub fn distance(self, other: Point) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }
}

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl BoundingBox {
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }
}

/// Signed shoelace area. Positive for counter-clockwise winding.
pub fn signed_area(polygon: &[Point]) -> f64 {
    if polygon.len() < 3 {
        return 0.0;
    }
    let mut sum = 0.0;
    for (i, a) in polygon.iter().enumerate() {
        let b = polygon[(i + 1) % polygon.len()];
        sum += a.x * b.y - b.x * a.y;
    }
    sum / 2.0
}

/// Absolute polygon area.
pub fn area(polygon: &[Point]) -> f64 {
    signed_area(polygon).abs()
}

/// Perimeter, including the implied closing edge.
pub fn perimeter(polygon: &[Point]) -> f64 {
    if polygon.len() < 2 {
        return 0.0;
    }
    polygon
        .iter()
        .enumerate()
        .map(|(i, a)| a.distance(polygon[(i + 1) % polygon.len()]))
        .sum()
}

/// Area-weighted centroid. Falls back to the vertex mean when the
/// polygon is degenerate (near-zero area).
pub fn centroid(polygon: &[Point]) -> Point {
    let a = signed_area(polygon);
    if polygon.is_empty() {
        return Point::new(0.0, 0.0);
    }
    if a.abs() < f64::EPSILON {
        let n = polygon.len() as f64;
        let (sx, sy) = polygon
            .iter()
            .fold((0.0, 0.0), |(sx, sy), p| (sx + p.x, sy + p.y));
        return Point::new(sx / n, sy / n);
    }
    let mut cx = 0.0;
    let mut cy = 0.0;
    for (i, p) in polygon.iter().enumerate() {
        let q = polygon[(i + 1) % polygon.len()];
        let cross = p.x * q.y - q.x * p.y;
        cx += (p.x + q.x) * cross;
        cy += (p.y + q.y) * cross;
    }
    Point::new(cx / (6.0 * a), cy / (6.0 * a))
}

/// Axis-aligned bounding box of a vertex list.
pub fn bounding_box(polygon: &[Point]) -> BoundingBox {
    let mut bb = BoundingBox {
        min_x: f64::INFINITY,
        min_y: f64::INFINITY,
        max_x: f64::NEG_INFINITY,
        max_y: f64::NEG_INFINITY,
    };
    for p in polygon {
        bb.min_x = bb.min_x.min(p.x);
        bb.min_y = bb.min_y.min(p.y);
        bb.max_x = bb.max_x.max(p.x);
        bb.max_y = bb.max_y.max(p.y);
    }
    bb
}

/// Convex hull via Andrew's monotone chain. Returns vertices in
/// counter-clockwise order; collinear points are dropped.
pub fn convex_hull(points: &[Point]) -> Vec<Point> {
    let mut pts: Vec<Point> = points.to_vec();
    if pts.len() < 3 {
        return pts;
    }
    pts.sort_by(|a, b| {
        a.x.partial_cmp(&b.x)
            .unwrap()
            .then(a.y.partial_cmp(&b.y).unwrap())
    });
    pts.dedup_by(|a, b| a.x == b.x && a.y == b.y);
    if pts.len() < 3 {
        return pts;
    }

    fn cross(o: Point, a: Point, b: Point) -> f64 {
        (a.x - o.x) * (b.y - o.y) - (a.y - o.y) * (b.x - o.x)
    }

    let mut lower: Vec<Point> = Vec::with_capacity(pts.len());
    for &p in &pts {
        while lower.len() >= 2 && cross(lower[lower.len() - 2], lower[lower.len() - 1], p) <= 0.0 {
            lower.pop();
        }
        lower.push(p);
    }

    let mut upper: Vec<Point> = Vec::with_capacity(pts.len());
    for &p in pts.iter().rev() {
        while upper.len() >= 2 && cross(upper[upper.len() - 2], upper[upper.len() - 1], p) <= 0.0 {
            upper.pop();
        }
        upper.push(p);
    }

    // The last point of each chain duplicates the first of the other.
    lower.pop();
    upper.pop();
    lower.extend(upper);
    lower
}

/// Convexity ratio: polygon area divided by convex-hull area.
///
/// Always in `(0, 1]` for a non-degenerate polygon; a degenerate
/// input reports 1.0.
pub fn convexity(polygon: &[Point]) -> f64 {
    let poly_area = area(polygon);
    let hull_area = area(&convex_hull(polygon));
    if hull_area < f64::EPSILON || poly_area < f64::EPSILON {
        return 1.0;
    }
    (poly_area / hull_area).min(1.0)
}

/// Ray-casting point-in-polygon test. Points on the boundary count
/// as inside.
pub fn contains_point(polygon: &[Point], p: Point) -> bool {
    if polygon.len() < 3 {
        return false;
    }
    let mut inside = false;
    let n = polygon.len();
    let mut j = n - 1;
    for i in 0..n {
        let a = polygon[i];
        let b = polygon[j];
        // Boundary check: p on segment a-b.
        let cross = (b.x - a.x) * (p.y - a.y) - (b.y - a.y) * (p.x - a.x);
        if cross.abs() < 1e-9
            && p.x >= a.x.min(b.x) - 1e-9
            && p.x <= a.x.max(b.x) + 1e-9
            && p.y >= a.y.min(b.y) - 1e-9
            && p.y <= a.y.max(b.y) + 1e-9
        {
            return true;
        }
        if (a.y > p.y) != (b.y > p.y) {
            let x_at_y = a.x + (p.y - a.y) / (b.y - a.y) * (b.x - a.x);
            if p.x < x_at_y {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

/// Whether the polygon is simple: no two non-adjacent edges
/// properly intersect. O(n²), fine for the vertex counts produced
/// by contour simplification.
pub fn is_simple(polygon: &[Point]) -> bool {
    let n = polygon.len();
    if n < 3 {
        return false;
    }
    for i in 0..n {
        let a1 = polygon[i];
        let a2 = polygon[(i + 1) % n];
        for j in (i + 1)..n {
            // Skip adjacent edges (they share a vertex by construction).
            if j == i || (j + 1) % n == i || (i + 1) % n == j {
                continue;
            }
            let b1 = polygon[j];
            let b2 = polygon[(j + 1) % n];
            if segments_properly_intersect(a1, a2, b1, b2) {
                return false;
            }
        }
    }
    true
}

fn segments_properly_intersect(p1: Point, p2: Point, q1: Point, q2: Point) -> bool {
    fn orient(a: Point, b: Point, c: Point) -> f64 {
        (b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x)
    }
    let d1 = orient(q1, q2, p1);
    let d2 = orient(q1, q2, p2);
    let d3 = orient(p1, p2, q1);
    let d4 = orient(p1, p2, q2);
    ((d1 > 0.0 && d2 < 0.0) || (d1 < 0.0 && d2 > 0.0))
        && ((d3 > 0.0 && d4 < 0.0) || (d3 < 0.0 && d4 > 0.0))
}

/// Simplify a closed contour with Douglas-Peucker, collapsing
/// near-collinear runs.
///
/// The contour is split at its two mutually farthest extreme
/// vertices so the open-path algorithm applies to each half.
pub fn simplify(contour: &[Point], epsilon: f64) -> Vec<Point> {
    if contour.len() <= 4 || epsilon <= 0.0 {
        return contour.to_vec();
    }

    // Anchor the split at the min-x and max-x vertices.
    let (mut lo, mut hi) = (0usize, 0usize);
    for (i, p) in contour.iter().enumerate() {
        if p.x < contour[lo].x {
            lo = i;
        }
        if p.x > contour[hi].x {
            hi = i;
        }
    }
    if lo == hi {
        return contour.to_vec();
    }
    let (lo, hi) = (lo.min(hi), lo.max(hi));

    let first_half = &contour[lo..=hi];
    let mut second_half: Vec<Point> = contour[hi..].to_vec();
    second_half.extend_from_slice(&contour[..=lo]);

    let mut out = douglas_peucker(first_half, epsilon);
    let tail = douglas_peucker(&second_half, epsilon);
    // Both halves include the shared endpoints; drop duplicates.
    out.extend_from_slice(&tail[1..tail.len() - 1]);
    out
}

fn douglas_peucker(path: &[Point], epsilon: f64) -> Vec<Point> {
    if path.len() < 3 {
        return path.to_vec();
    }
    let (first, last) = (path[0], path[path.len() - 1]);
    let mut max_dist = 0.0;
    let mut index = 0;
    for (i, p) in path.iter().enumerate().skip(1).take(path.len() - 2) {
        let d = point_to_segment_distance(*p, first, last);
        if d > max_dist {
            max_dist = d;
            index = i;
        }
    }
    if max_dist > epsilon {
        let mut left = douglas_peucker(&path[..=index], epsilon);
        let right = douglas_peucker(&path[index..], epsilon);
        left.pop();
        left.extend(right);
        left
    } else {
        vec![first, last]
    }
}

fn point_to_segment_distance(p: Point, a: Point, b: Point) -> f64 {
    let len_sq = (b.x - a.x).powi(2) + (b.y - a.y).powi(2);
    if len_sq < f64::EPSILON {
        return p.distance(a);
    }
    let t = (((p.x - a.x) * (b.x - a.x) + (p.y - a.y) * (b.y - a.y)) / len_sq).clamp(0.0, 1.0);
    p.distance(Point::new(a.x + t * (b.x - a.x), a.y + t * (b.y - a.y)))
}
