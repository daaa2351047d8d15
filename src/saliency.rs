//! Edge saliency: where the "interesting" part of an image is.
//!
//! Grayscale, box blur to suppress noise, then a 3×3 Laplacian-style kernel
//! with a negative bias so only strong high-frequency content survives. The
//! bounding box of what is left approximates the salient region.

use image::{GrayImage, RgbImage, imageops};

use crate::filter::box_blur;
use crate::geometry::MmRect;

/// Blur radius applied before edge detection.
pub const NOISE_BLUR_RADIUS: u32 = 5;

/// Center 8, all neighbours -1.
const EDGE_KERNEL: [f32; 9] = [-1.0, -1.0, -1.0, -1.0, 8.0, -1.0, -1.0, -1.0, -1.0];

/// Subtracted from every kernel response.
const EDGE_BIAS: u8 = 30;

/// Edge response map, same size as `image`.
pub fn edge_map(image: &RgbImage) -> GrayImage {
    let gray = imageops::grayscale(image);
    let blurred = box_blur(&gray, NOISE_BLUR_RADIUS);
    let mut edges: GrayImage = imageops::filter3x3(&blurred, &EDGE_KERNEL);
    for p in edges.pixels_mut() {
        p.0[0] = p.0[0].saturating_sub(EDGE_BIAS);
    }
    edges
}

/// Bounding box of non-zero edge response, ignoring the one pixel border,
/// grown by one pixel on each side. `None` when nothing responds.
///
/// The box runs from the first to the last responding pixel coordinate, so
/// its center is the midpoint of those two coordinates.
pub fn salient_region(image: &RgbImage) -> Option<MmRect> {
    bounding_box(&edge_map(image)).map(|r| r.grow(1.0))
}

fn bounding_box(edges: &GrayImage) -> Option<MmRect> {
    let (w, h) = edges.dimensions();
    if w <= 2 || h <= 2 {
        return None;
    }

    let mut found: Option<(u32, u32, u32, u32)> = None;
    for y in 1..h - 1 {
        for x in 1..w - 1 {
            if edges.get_pixel(x, y).0[0] == 0 {
                continue;
            }
            found = Some(match found {
                None => (x, y, x, y),
                Some((x0, y0, x1, y1)) => (x0.min(x), y0.min(y), x1.max(x), y1.max(y)),
            });
        }
    }

    found.map(|(x0, y0, x1, y1)| {
        MmRect::new(
            f64::from(x0),
            f64::from(y0),
            f64::from(x1 - x0),
            f64::from(y1 - y0),
        )
    })
}
