//! Wall segment extraction.
//!
//! Floor-plan walls are drawn as dark axis-aligned strokes, so a
//! row/column run scan over the inverted binary image recovers them:
//! runs of wall ink longer than a minimum, with small gaps (door
//! openings aside) bridged. Runs from adjacent scan lines covering
//! the same span are collapsed into one centerline segment.

use image::GrayImage;
use planforge_core::geometry::Point;

use crate::raster;
use crate::segmentation::BINARY_THRESHOLD;

/// Shortest run of wall ink reported as a wall.
const MIN_LINE_LENGTH: u32 = 20;
/// Largest break bridged inside a single run.
const MAX_LINE_GAP: u32 = 10;
/// Scan lines within this distance collapse into one wall.
const MERGE_DISTANCE: f64 = 6.0;

/// An axis-aligned wall centerline in pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WallSegment {
    pub start: Point,
    pub end: Point,
}

impl WallSegment {
    pub fn length(&self) -> f64 {
        self.start.distance(self.end)
    }

    fn horizontal(&self) -> bool {
        (self.end.y - self.start.y).abs() < (self.end.x - self.start.x).abs()
    }
}

/// Detect horizontal and vertical wall segments in a grayscale
/// floor-plan image.
pub fn detect_wall_segments(gray: &GrayImage) -> Vec<WallSegment> {
    let ink = raster::threshold_inv(gray, BINARY_THRESHOLD);
    let (w, h) = ink.dimensions();

    let mut raw = Vec::new();
    for y in 0..h {
        for (x1, x2) in scan_runs(|x| ink.get_pixel(x, y).0[0] != 0, w) {
            raw.push(WallSegment {
                start: Point::new(x1 as f64, y as f64),
                end: Point::new(x2 as f64, y as f64),
            });
        }
    }
    for x in 0..w {
        for (y1, y2) in scan_runs(|y| ink.get_pixel(x, y).0[0] != 0, h) {
            raw.push(WallSegment {
                start: Point::new(x as f64, y1 as f64),
                end: Point::new(x as f64, y2 as f64),
            });
        }
    }

    let merged = merge_parallel(raw);
    tracing::debug!(segments = merged.len(), "wall extraction complete");
    merged
}

/// Runs of set pixels along one scan line, bridging gaps up to
/// [`MAX_LINE_GAP`] and keeping runs at least [`MIN_LINE_LENGTH`]
/// long. Returns inclusive (start, end) coordinates.
fn scan_runs(set: impl Fn(u32) -> bool, len: u32) -> Vec<(u32, u32)> {
    let mut runs = Vec::new();
    let mut start: Option<u32> = None;
    let mut last_set = 0u32;
    for i in 0..len {
        if set(i) {
            if let Some(s) = start {
                if i - last_set > MAX_LINE_GAP {
                    if last_set - s + 1 >= MIN_LINE_LENGTH {
                        runs.push((s, last_set));
                    }
                    start = Some(i);
                }
            } else {
                start = Some(i);
            }
            last_set = i;
        }
    }
    if let Some(s) = start {
        if last_set - s + 1 >= MIN_LINE_LENGTH {
            runs.push((s, last_set));
        }
    }
    runs
}

/// Collapse parallel segments from neighboring scan lines. A thick
/// wall produces one run per row or column it crosses; overlapping
/// runs within [`MERGE_DISTANCE`] average into a single centerline.
fn merge_parallel(raw: Vec<WallSegment>) -> Vec<WallSegment> {
    let mut merged: Vec<(WallSegment, u32)> = Vec::new();
    for seg in raw {
        let horizontal = seg.horizontal();
        let (lo, hi, pos) = if horizontal {
            (seg.start.x, seg.end.x, seg.start.y)
        } else {
            (seg.start.y, seg.end.y, seg.start.x)
        };

        let mut absorbed = false;
        for (m, count) in merged.iter_mut() {
            if m.horizontal() != horizontal {
                continue;
            }
            let (mlo, mhi, mpos) = if horizontal {
                (m.start.x, m.end.x, m.start.y)
            } else {
                (m.start.y, m.end.y, m.start.x)
            };
            if (pos - mpos).abs() > MERGE_DISTANCE || hi < mlo || lo > mhi {
                continue;
            }
            let new_lo = lo.min(mlo);
            let new_hi = hi.max(mhi);
            let new_pos = (mpos * *count as f64 + pos) / (*count as f64 + 1.0);
            *m = if horizontal {
                WallSegment {
                    start: Point::new(new_lo, new_pos),
                    end: Point::new(new_hi, new_pos),
                }
            } else {
                WallSegment {
                    start: Point::new(new_pos, new_lo),
                    end: Point::new(new_pos, new_hi),
                }
            };
            *count += 1;
            absorbed = true;
            break;
        }
        if !absorbed {
            merged.push((seg, 1));
        }
    }
    merged.into_iter().map(|(m, _)| m).collect()
}
