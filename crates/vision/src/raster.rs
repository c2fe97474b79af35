//! Low-level raster operations on grayscale buffers.
//!
//! Binarization, 3x3 morphology, an L2-chamfer distance transform,
//! and connected-component labeling. These feed the watershed room
//! segmentation in [`crate::segmentation`].

use image::GrayImage;

/// Binarize: pixels strictly above `t` become 255, the rest 0.
pub fn threshold(gray: &GrayImage, t: u8) -> GrayImage {
    let mut out = gray.clone();
    for p in out.pixels_mut() {
        p.0[0] = if p.0[0] > t { 255 } else { 0 };
    }
    out
}

/// Inverted binarization: pixels at or below `t` become 255.
pub fn threshold_inv(gray: &GrayImage, t: u8) -> GrayImage {
    let mut out = gray.clone();
    for p in out.pixels_mut() {
        p.0[0] = if p.0[0] > t { 0 } else { 255 };
    }
    out
}

/// 3x3 erosion, `iterations` times.
pub fn erode(binary: &GrayImage, iterations: u32) -> GrayImage {
    morph(binary, iterations, true)
}

/// 3x3 dilation, `iterations` times.
pub fn dilate(binary: &GrayImage, iterations: u32) -> GrayImage {
    morph(binary, iterations, false)
}

/// Morphological opening: erosion followed by dilation, suppressing
/// speckle noise smaller than the kernel.
pub fn open(binary: &GrayImage, iterations: u32) -> GrayImage {
    dilate(&erode(binary, iterations), iterations)
}

fn morph(binary: &GrayImage, iterations: u32, erode: bool) -> GrayImage {
    let (w, h) = binary.dimensions();
    let mut src = binary.clone();
    let mut dst = binary.clone();
    for _ in 0..iterations {
        for y in 0..h as i32 {
            for x in 0..w as i32 {
                let mut hit = erode;
                'kernel: for dy in -1..=1 {
                    for dx in -1..=1 {
                        let (nx, ny) = (x + dx, y + dy);
                        let v = if nx < 0 || ny < 0 || nx >= w as i32 || ny >= h as i32 {
                            0
                        } else {
                            src.get_pixel(nx as u32, ny as u32).0[0]
                        };
                        if erode && v == 0 {
                            hit = false;
                            break 'kernel;
                        }
                        if !erode && v != 0 {
                            hit = true;
                            break 'kernel;
                        }
                    }
                }
                dst.get_pixel_mut(x as u32, y as u32).0[0] = if hit { 255 } else { 0 };
            }
        }
        std::mem::swap(&mut src, &mut dst);
    }
    src
}

/// Two-pass 3-4 chamfer distance transform: for each foreground
/// pixel, the approximate L2 distance to the nearest background
/// pixel, in pixel units.
pub fn distance_transform(binary: &GrayImage) -> Vec<f32> {
    const ORTHO: f32 = 3.0;
    const DIAG: f32 = 4.0;
    let (w, h) = binary.dimensions();
    let (w, h) = (w as usize, h as usize);
    let big = (w + h) as f32 * DIAG;
    let mut dist = vec![0.0f32; w * h];

    for y in 0..h {
        for x in 0..w {
            let i = y * w + x;
            if binary.get_pixel(x as u32, y as u32).0[0] == 0 {
                dist[i] = 0.0;
                continue;
            }
            let mut d = big;
            if x > 0 {
                d = d.min(dist[i - 1] + ORTHO);
            }
            if y > 0 {
                d = d.min(dist[i - w] + ORTHO);
                if x > 0 {
                    d = d.min(dist[i - w - 1] + DIAG);
                }
                if x + 1 < w {
                    d = d.min(dist[i - w + 1] + DIAG);
                }
            }
            dist[i] = d;
        }
    }
    for y in (0..h).rev() {
        for x in (0..w).rev() {
            let i = y * w + x;
            if dist[i] == 0.0 {
                continue;
            }
            let mut d = dist[i];
            if x + 1 < w {
                d = d.min(dist[i + 1] + ORTHO);
            }
            if y + 1 < h {
                d = d.min(dist[i + w] + ORTHO);
                if x + 1 < w {
                    d = d.min(dist[i + w + 1] + DIAG);
                }
                if x > 0 {
                    d = d.min(dist[i + w - 1] + DIAG);
                }
            }
            dist[i] = d;
        }
    }
    // Chamfer weights are scaled by 3; normalize back to pixels.
    for d in &mut dist {
        *d /= ORTHO;
    }
    dist
}

/// Label 4-connected foreground components. Returns the label buffer
/// (0 = background, labels start at 1) and the label count.
pub fn connected_components(binary: &GrayImage) -> (Vec<u32>, u32) {
    let (w, h) = binary.dimensions();
    let (w, h) = (w as usize, h as usize);
    let mut labels = vec![0u32; w * h];
    let mut next = 0u32;
    let mut stack = Vec::new();

    for start in 0..w * h {
        if labels[start] != 0 || binary.as_raw()[start] == 0 {
            continue;
        }
        next += 1;
        labels[start] = next;
        stack.push(start);
        while let Some(i) = stack.pop() {
            let (x, y) = (i % w, i / w);
            let mut visit = |j: usize| {
                if labels[j] == 0 && binary.as_raw()[j] != 0 {
                    labels[j] = next;
                    stack.push(j);
                }
            };
            if x > 0 {
                visit(i - 1);
            }
            if x + 1 < w {
                visit(i + 1);
            }
            if y > 0 {
                visit(i - w);
            }
            if y + 1 < h {
                visit(i + w);
            }
        }
    }
    (labels, next)
}
