//! Compositor geometry: how the source image maps onto the physical canvas.
//!
//! Pure geometry, no pixel operations. [`Canvas`] holds the aggregate pixel
//! and physical rects of a [`ResolvedLayout`] and answers:
//!
//! - which sub-rect of the image (the *fit rect*) matches the canvas aspect,
//! - which crop window to take when the configured crop applies,
//! - how large a padded image must be,
//! - which source rect each display samples.
//!
//! ```text
//!   image (source pixels)            canvas (mm)
//!   ┌──────────────────────┐
//!   │   ┌──────────────┐   │         ┌──────┬────────┐
//!   │   │   fit rect   │   │  ◄────  │  A   │   B    │
//!   │   └──────────────┘   │         └──────┴────────┘
//!   └──────────────────────┘
//! ```

use crate::config::CompositionConfig;
use crate::display::DisplayLayout;
use crate::error::Error;
use crate::geometry::{MmRect, PixelRect, Rect, Size};
use crate::resolve::ResolvedLayout;

/// Tolerance for treating two aspect ratios as equal.
const RATIO_EPSILON: f64 = 1e-9;

/// Whether two `height / width` ratios match.
pub fn same_ratio(a: f64, b: f64) -> bool {
    (a - b).abs() <= RATIO_EPSILON
}

/// Aggregate geometry of a resolved layout plus composition settings.
#[derive(Clone, Debug)]
pub struct Canvas<'a> {
    layout: &'a ResolvedLayout,
    config: &'a CompositionConfig,
    pixel_rect: PixelRect,
    mm_rect: MmRect,
}

/// How to extend an image to the canvas aspect ratio.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PadPlan {
    /// Size of the padded image.
    pub size: Size,
    /// Where the original image is placed in the padded one.
    pub placement: (i64, i64),
    /// Region of the (blurred) original that is stretched to fill `size`.
    pub background: MmRect,
}

impl<'a> Canvas<'a> {
    /// Fails with [`Error::NoDisplays`] for an empty layout.
    pub fn new(layout: &'a ResolvedLayout, config: &'a CompositionConfig) -> Result<Self, Error> {
        let (Some(pixel_rect), Some(mm_rect)) = (layout.pixel_bounds(), layout.mm_bounds()) else {
            return Err(Error::NoDisplays);
        };
        Ok(Self {
            layout,
            config,
            pixel_rect,
            mm_rect,
        })
    }

    pub fn layout(&self) -> &'a ResolvedLayout {
        self.layout
    }

    pub fn config(&self) -> &'a CompositionConfig {
        self.config
    }

    /// Union of all display pixel rects; the output image covers exactly this.
    pub fn pixel_rect(&self) -> PixelRect {
        self.pixel_rect
    }

    /// Union of all resolved physical rects.
    pub fn mm_rect(&self) -> MmRect {
        self.mm_rect
    }

    /// Canvas `height / width` in physical space.
    pub fn ratio(&self) -> f64 {
        self.mm_rect.vh_ratio()
    }

    /// Whether an image of `size` already has the canvas aspect ratio.
    pub fn matches(&self, size: Size) -> bool {
        same_ratio(self.ratio(), MmRect::of_size(size).vh_ratio())
    }

    /// Whether the configured crop applies to an image of `size`.
    pub fn needs_crop(&self, size: Size) -> bool {
        self.config.crop > 0.0 && !self.matches(size)
    }

    /// Whether an image of `size` is wider (relative to its height) than the canvas.
    pub fn is_wider(&self, size: Size) -> bool {
        MmRect::of_size(size).vh_ratio() < self.ratio()
    }

    /// Physical center of the configured anchor display, relative to the canvas origin.
    pub fn center_anchor(&self) -> Option<(f64, f64)> {
        let name = self.config.center.as_deref()?;
        let display = self.layout.get(name)?;
        let (cx, cy) = display.mm_rect.center();
        Some((cx - self.mm_rect.x, cy - self.mm_rect.y))
    }

    /// Largest sub-rect of an image of `size` with the canvas aspect ratio.
    ///
    /// Centered, unless a center anchor is configured: then it slides so the
    /// anchor display's center lands on the image center, as far as the
    /// image bounds allow.
    pub fn fit_rect(&self, size: Size) -> MmRect {
        let centered = self.centered_fit(size);
        let Some((ax, ay)) = self.center_anchor() else {
            return centered;
        };
        let image = MmRect::of_size(size);
        let k = centered.width / self.mm_rect.width;
        let (icx, icy) = image.center();
        let x = (icx - k * ax).clamp(0.0, (image.width - centered.width).max(0.0));
        let y = (icy - k * ay).clamp(0.0, (image.height - centered.height).max(0.0));
        MmRect::new(x, y, centered.width, centered.height)
    }

    fn centered_fit(&self, size: Size) -> MmRect {
        let mut fit = MmRect::of_size(size);
        if self.matches(size) {
            return fit;
        }
        let ratio = self.ratio();
        if ratio < fit.vh_ratio() {
            fit.height = fit.width * ratio;
            fit.y = (size.height as f64 - fit.height) * 0.5;
        } else {
            fit.width = fit.height / ratio;
            fit.x = (size.width as f64 - fit.width) * 0.5;
        }
        fit
    }

    /// Padded size for an image of `size`, with the image centered on the
    /// axis that grows.
    pub fn pad_plan(&self, size: Size) -> PadPlan {
        let ratio = self.ratio();
        let image = MmRect::of_size(size);
        let background = self.centered_fit(size);
        if image.vh_ratio() > ratio {
            let width = image.height / ratio;
            PadPlan {
                size: Size::new(width.round_ties_even() as u32, size.height),
                placement: (((width - image.width) * 0.5).round_ties_even() as i64, 0),
                background,
            }
        } else {
            let height = image.width * ratio;
            PadPlan {
                size: Size::new(size.width, height.round_ties_even() as u32),
                placement: (0, ((height - image.height) * 0.5).round_ties_even() as i64),
                background,
            }
        }
    }

    /// Rect of the fitted image that `display` shows.
    pub fn source_rect(&self, fit: &MmRect, display: &DisplayLayout) -> MmRect {
        let k = fit.width / self.mm_rect.width;
        display
            .mm_rect
            .translate(-self.mm_rect.x, -self.mm_rect.y)
            .scale_offset(k, fit.x, fit.y)
    }

    /// Where `display` lands in the output image.
    pub fn output_position(&self, display: &DisplayLayout) -> (i64, i64) {
        let r = display.rect();
        (
            i64::from(r.x) - i64::from(self.pixel_rect.x),
            i64::from(r.y) - i64::from(self.pixel_rect.y),
        )
    }
}

/// Crop window for an image of `size`, removing `crop` percent of the
/// over-sized axis (width when `wider`, else height).
///
/// The window is centered on `region`'s center, pulled back by that center
/// scaled with the kept fraction, so it stays biased toward the image center.
/// A window that would run past the trailing edge slides back to end one
/// pixel before it.
pub fn crop_window(size: Size, region: &MmRect, crop: f64, wider: bool) -> Rect<i64> {
    let keep = (100.0 - crop) * 0.01;
    let image = MmRect::of_size(size);
    let (cx, cy) = image.center();
    let (bx, by) = region.center();
    let (w, h) = (i64::from(size.width), i64::from(size.height));

    if wider {
        let width = (image.width * keep).round_ties_even() as i64;
        let mut x = ((bx - cx * keep).round_ties_even() as i64).max(0);
        if x + width > w {
            x = (w - width - 1).max(0);
        }
        Rect::new(x, 0, width, h)
    } else {
        let height = (image.height * keep).round_ties_even() as i64;
        let mut y = ((by - cy * keep).round_ties_even() as i64).max(0);
        if y + height > h {
            y = (h - height - 1).max(0);
        }
        Rect::new(0, y, w, height)
    }
}
