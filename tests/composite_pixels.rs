//! Compositor pixel tests with a coordinate-encoding source image.
//!
//! Every source pixel stores its own (x, y) in the red and green channels,
//! so a wrong crop, scale or placement shows up as mismatched coordinates
//! in the output.

use image::{DynamicImage, Rgb, RgbImage};
use spanwall::*;

// ---- Fixtures ----

/// Source image: pixel at (x, y) is `Rgb([x, y, 0])`. Both sides ≤ 256.
fn coordinates(w: u32, h: u32) -> RgbImage {
    assert!(w <= 256 && h <= 256);
    RgbImage::from_fn(w, h, |x, y| Rgb([x as u8, y as u8, 0]))
}

fn decode(p: &Rgb<u8>) -> (i32, i32) {
    (i32::from(p.0[0]), i32::from(p.0[1]))
}

fn near(actual: (i32, i32), expected: (i32, i32), tolerance: i32) -> bool {
    (actual.0 - expected.0).abs() <= tolerance && (actual.1 - expected.1).abs() <= tolerance
}

/// Two 100×50 px displays side by side, 1 px per mm.
fn side_by_side() -> ResolvedLayout {
    resolve(
        &[
            DisplayRecord::new("a", 0, 0, 100, 50).with_size_mm(100.0, 50.0),
            DisplayRecord::new("b", 100, 0, 100, 50).with_size_mm(100.0, 50.0),
        ],
        &LayoutHints::new(),
    )
}

/// A large display with a small one hanging off its top-right corner.
fn uneven() -> ResolvedLayout {
    resolve(
        &[
            DisplayRecord::new("big", 0, 0, 100, 100).with_size_mm(100.0, 100.0),
            DisplayRecord::new("small", 100, 0, 50, 50).with_size_mm(50.0, 50.0),
        ],
        &LayoutHints::new(),
    )
}

fn compose(layout: &ResolvedLayout, image: &RgbImage, config: &CompositionConfig) -> RgbImage {
    let dynamic = DynamicImage::ImageRgb8(image.clone());
    composite(layout, Some(&dynamic), config).unwrap()
}

// ============================================================
// Matching aspect ratio
// ============================================================

#[test]
fn one_to_one_scale_reproduces_source() {
    let layout = side_by_side();
    let source = coordinates(200, 50);
    let out = compose(&layout, &source, &CompositionConfig::default());
    assert_eq!(out, source);
}

#[test]
fn source_rects_partition_fit_rect() {
    let layout = side_by_side();
    let config = CompositionConfig::default();
    let canvas = Canvas::new(&layout, &config).unwrap();
    let fit = canvas.fit_rect(Size::new(256, 64));
    assert_eq!(fit, MmRect::new(0.0, 0.0, 256.0, 64.0));

    let a = canvas.source_rect(&fit, layout.get("a").unwrap());
    let b = canvas.source_rect(&fit, layout.get("b").unwrap());
    assert_eq!(a, MmRect::new(0.0, 0.0, 128.0, 64.0));
    assert_eq!(b, MmRect::new(128.0, 0.0, 128.0, 64.0));
}

#[test]
fn downscaled_slices_sample_their_share() {
    let layout = side_by_side();
    let source = coordinates(256, 64);
    let out = compose(&layout, &source, &CompositionConfig::default());
    assert_eq!(out.dimensions(), (200, 50));

    // Output pixel centers map to (out + 0.5) * 1.28 - 0.5 in the source.
    assert!(near(decode(out.get_pixel(50, 25)), (64, 32), 2));
    assert!(near(decode(out.get_pixel(150, 25)), (192, 32), 2));
}

#[test]
fn area_outside_every_display_stays_black() {
    let layout = uneven();
    let white = RgbImage::from_pixel(150, 100, Rgb([255, 255, 255]));
    let out = compose(&layout, &white, &CompositionConfig::default());
    assert_eq!(out.dimensions(), (150, 100));
    assert_eq!(out.get_pixel(120, 25), &Rgb([255, 255, 255]));
    assert_eq!(out.get_pixel(120, 75), &Rgb([0, 0, 0]));
    assert_eq!(out.get_pixel(50, 75), &Rgb([255, 255, 255]));
}

#[test]
fn uneven_layout_maps_physical_positions() {
    let layout = uneven();
    let source = coordinates(150, 100);
    let out = compose(&layout, &source, &CompositionConfig::default());
    // Same scale everywhere, so every covered pixel is its own coordinate.
    assert_eq!(decode(out.get_pixel(10, 90)), (10, 90));
    assert_eq!(decode(out.get_pixel(149, 49)), (149, 49));
}

// ============================================================
// Crop and padding
// ============================================================

#[test]
fn crop_keeps_rounded_share_of_width() {
    let layout = side_by_side();
    // Canvas is 4:1, the image 6:1.
    let source = coordinates(240, 40);
    let config = CompositionConfig::default().with_crop(10.0);
    let compositor = Compositor::new(&layout, &config).unwrap();
    let fitted = compositor.fit(&source);

    // round(240 * 0.9) = 216, starting at round(120 - 120 * 0.9) = 12.
    assert_eq!(fitted.size(), Size::new(216, 40));
    assert_eq!(decode(fitted.image.get_pixel(0, 0)), (12, 0));
    assert_eq!(decode(fitted.image.get_pixel(215, 39)), (227, 39));
    // 216×40 is still wider than 4:1 → centered 160×40.
    assert_eq!(fitted.fit_rect, MmRect::new(28.0, 0.0, 160.0, 40.0));
}

#[test]
fn crop_of_tall_image_keeps_rounded_share_of_height() {
    let layout = side_by_side();
    let source = coordinates(100, 100);
    let config = CompositionConfig::default().with_crop(25.0);
    let fitted = Compositor::new(&layout, &config).unwrap().fit(&source);
    assert_eq!(fitted.size(), Size::new(100, 75));
}

#[test]
fn crop_share_rounds_half_to_even() {
    let layout = side_by_side();
    let source = coordinates(102, 10);
    let config = CompositionConfig::default().with_crop(25.0);
    let fitted = Compositor::new(&layout, &config).unwrap().fit(&source);

    // 102 * 0.75 = 76.5 → 76; origin 51 - 51 * 0.75 = 12.75 → 13.
    assert_eq!(fitted.size(), Size::new(76, 10));
    assert_eq!(decode(fitted.image.get_pixel(0, 0)), (13, 0));
}

#[test]
fn trim_pulls_crop_toward_edge_detail() {
    let layout = side_by_side();
    // Smooth ramp in red, plus a bright green block near the left edge.
    let source = RgbImage::from_fn(240, 40, |x, y| {
        let green = if (10..40).contains(&x) && (5..35).contains(&y) { 255 } else { 0 };
        Rgb([x as u8, green, 0])
    });
    let plain = CompositionConfig::default().with_crop(10.0);
    let trimmed = plain.clone().with_trim(true);

    let centered = Compositor::new(&layout, &plain).unwrap().fit(&source);
    let salient = Compositor::new(&layout, &trimmed).unwrap().fit(&source);
    assert_eq!(centered.size(), salient.size());

    let (centered_x, _) = decode(centered.image.get_pixel(0, 0));
    let (salient_x, _) = decode(salient.image.get_pixel(0, 0));
    assert_eq!(centered_x, 12);
    // The block's center (≈25) minus 120 * 0.9 is negative → leading edge.
    assert_eq!(salient_x, 0);
    assert!(salient_x < centered_x);
}

#[test]
fn output_size_is_pixel_union_for_every_setting() {
    let source = coordinates(240, 40);
    let tall = coordinates(60, 200);
    let configs = [
        CompositionConfig::default(),
        CompositionConfig::default().with_crop(20.0),
        CompositionConfig::default().with_padding(true),
        CompositionConfig::default().with_crop(34.0).with_padding(true),
        CompositionConfig::default().with_crop(15.0).with_trim(true),
        CompositionConfig::default().with_center("small"),
    ];
    for layout in [side_by_side(), uneven()] {
        let expected = layout.pixel_bounds().unwrap().size();
        for config in &configs {
            for image in [&source, &tall] {
                let out = compose(&layout, image, config);
                assert_eq!(
                    out.dimensions(),
                    (expected.width, expected.height),
                    "{config:?}"
                );
            }
        }
    }
}

#[test]
fn padding_keeps_whole_source_visible() {
    let layout = side_by_side();
    let source = coordinates(100, 50);
    let config = CompositionConfig::default().with_padding(true);
    let fitted = Compositor::new(&layout, &config).unwrap().fit(&source);
    assert_eq!(fitted.size(), Size::new(200, 50));
    // Original sits unblurred in the middle.
    assert_eq!(decode(fitted.image.get_pixel(50, 0)), (0, 0));
    assert_eq!(decode(fitted.image.get_pixel(149, 49)), (99, 49));

    let out = compose(&layout, &source, &config);
    assert_eq!(decode(out.get_pixel(60, 10)), (10, 10));
}

// ============================================================
// Degenerate input
// ============================================================

#[test]
fn no_image_is_all_black() {
    let layout = uneven();
    let out = composite(&layout, None, &CompositionConfig::default()).unwrap();
    assert_eq!(out.dimensions(), (150, 100));
    assert!(out.pixels().all(|p| *p == Rgb([0, 0, 0])));
}

#[test]
fn no_displays_is_an_error() {
    let source = DynamicImage::ImageRgb8(coordinates(10, 10));
    let result = composite(
        &ResolvedLayout::default(),
        Some(&source),
        &CompositionConfig::default(),
    );
    assert!(matches!(result, Err(Error::NoDisplays)));
}
