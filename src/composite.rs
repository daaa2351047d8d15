//! Pixel pipeline: fit the source image to the canvas and slice it per display.
//!
//! 1. If the configured crop applies, crop the over-sized axis (optionally
//!    biased toward salient content).
//! 2. Fit: select the canvas-aspect sub-rect, or with padding, grow the image
//!    to the canvas aspect over a blurred backdrop.
//! 3. For every display, crop its source rect out of the fitted image,
//!    resample to the display's pixel size and paste it at the display's
//!    position in the output.

use std::borrow::Cow;

use image::imageops::{self, FilterType};
use image::{DynamicImage, RgbImage};

use crate::canvas::{Canvas, crop_window};
use crate::config::CompositionConfig;
use crate::error::Error;
use crate::filter::box_blur;
use crate::geometry::{MmRect, Size};
use crate::resolve::ResolvedLayout;
use crate::saliency;

/// Blur radius of the padding backdrop.
pub const PADDING_BLUR_RADIUS: u32 = 16;

/// Source image prepared for slicing: the (possibly cropped or padded) image
/// and the rect of it that maps onto the whole canvas.
#[derive(Clone, Debug)]
pub struct FittedImage<'i> {
    pub image: Cow<'i, RgbImage>,
    pub fit_rect: MmRect,
}

impl FittedImage<'_> {
    pub fn size(&self) -> Size {
        Size::new(self.image.width(), self.image.height())
    }
}

/// Composes one source image across a resolved layout.
#[derive(Clone, Debug)]
pub struct Compositor<'a> {
    canvas: Canvas<'a>,
}

impl<'a> Compositor<'a> {
    /// Fails with [`Error::NoDisplays`] for an empty layout.
    pub fn new(layout: &'a ResolvedLayout, config: &'a CompositionConfig) -> Result<Self, Error> {
        Ok(Self {
            canvas: Canvas::new(layout, config)?,
        })
    }

    pub fn canvas(&self) -> &Canvas<'a> {
        &self.canvas
    }

    /// Crop and fit `image` to the canvas aspect ratio.
    pub fn fit<'i>(&self, image: &'i RgbImage) -> FittedImage<'i> {
        let size = Size::new(image.width(), image.height());
        if self.canvas.matches(size) {
            return FittedImage {
                image: Cow::Borrowed(image),
                fit_rect: MmRect::of_size(size),
            };
        }

        let cropped = if self.canvas.needs_crop(size) {
            Cow::Owned(self.crop(image))
        } else {
            Cow::Borrowed(image)
        };
        let cropped_size = Size::new(cropped.width(), cropped.height());

        if self.canvas.config().padding && !self.canvas.matches(cropped_size) {
            let padded = self.pad(&cropped);
            let fit_rect = MmRect::of_size(Size::new(padded.width(), padded.height()));
            return FittedImage {
                image: Cow::Owned(padded),
                fit_rect,
            };
        }

        let fit_rect = self.canvas.fit_rect(cropped_size);
        FittedImage {
            image: cropped,
            fit_rect,
        }
    }

    /// Crop away the configured share of the over-sized axis.
    fn crop(&self, image: &RgbImage) -> RgbImage {
        let size = Size::new(image.width(), image.height());
        let full = MmRect::of_size(size);
        let region = if self.canvas.config().trim {
            saliency::salient_region(image).unwrap_or(full)
        } else {
            full
        };
        let window = crop_window(
            size,
            &region,
            self.canvas.config().crop,
            self.canvas.is_wider(size),
        );
        log::debug!("salient region: {region}, crop window: {window:?}");

        let x = window.x.clamp(0, i64::from(size.width)) as u32;
        let y = window.y.clamp(0, i64::from(size.height)) as u32;
        let w = (window.width.max(1) as u32).min(size.width - x).max(1);
        let h = (window.height.max(1) as u32).min(size.height - y).max(1);
        imageops::crop_imm(image, x, y, w, h).to_image()
    }

    /// Grow `image` to the canvas aspect: a blurred, stretched copy of its
    /// centered fit region as backdrop, the sharp original centered on top.
    fn pad(&self, image: &RgbImage) -> RgbImage {
        let size = Size::new(image.width(), image.height());
        let plan = self.canvas.pad_plan(size);
        log::debug!("padding {}×{} to {}×{}", size.width, size.height, plan.size.width, plan.size.height);

        let blurred = box_blur(image, PADDING_BLUR_RADIUS);
        let backdrop = match plan.background.pixel_box().clip_to(size) {
            Some((x, y, w, h)) => imageops::crop_imm(&blurred, x, y, w, h).to_image(),
            None => blurred,
        };
        let mut target = imageops::resize(
            &backdrop,
            plan.size.width,
            plan.size.height,
            FilterType::Triangle,
        );
        imageops::replace(&mut target, image, plan.placement.0, plan.placement.1);
        target
    }

    /// Paint the output image. Without a source image the result is the
    /// all-black canvas.
    pub fn paint(&self, fitted: Option<&FittedImage<'_>>) -> RgbImage {
        let bounds = self.canvas.pixel_rect().size();
        let mut target = RgbImage::new(bounds.width, bounds.height);
        let Some(fitted) = fitted else {
            return target;
        };

        log::debug!("image_rect: {}", MmRect::of_size(fitted.size()));
        log::debug!("fit_rect: {}", fitted.fit_rect);
        log::debug!("canvas_rect: {}", self.canvas.mm_rect());

        for display in self.canvas.layout() {
            let source = self.canvas.source_rect(&fitted.fit_rect, display);
            log::debug!("display: {display}");
            log::debug!("source_rect: {source}");

            let out = display.rect().size();
            if out.is_empty() {
                continue;
            }
            let Some((x, y, w, h)) = source.pixel_box().clip_to(fitted.size()) else {
                log::warn!("{}: source rect {source} lies outside the image", display.name());
                continue;
            };
            let slice = imageops::crop_imm(fitted.image.as_ref(), x, y, w, h).to_image();
            let resized = imageops::resize(&slice, out.width, out.height, FilterType::CatmullRom);
            let (px, py) = self.canvas.output_position(display);
            imageops::replace(&mut target, &resized, px, py);
        }
        target
    }

    /// Fit and paint in one step.
    pub fn compose(&self, image: Option<&RgbImage>) -> RgbImage {
        let fitted = image.map(|img| self.fit(img));
        self.paint(fitted.as_ref())
    }
}

/// Compose `image` across `layout`: output sized to the union of the display
/// pixel rects, each display showing its physical share of the image.
///
/// # Example
///
/// ```
/// use image::{DynamicImage, RgbImage};
/// use spanwall::{CompositionConfig, DisplayRecord, LayoutHints, composite, resolve};
///
/// let layout = resolve(
///     &[
///         DisplayRecord::new("a", 0, 0, 800, 600),
///         DisplayRecord::new("b", 800, 0, 800, 600),
///     ],
///     &LayoutHints::new(),
/// );
/// let image = DynamicImage::ImageRgb8(RgbImage::new(320, 120));
/// let out = composite(&layout, Some(&image), &CompositionConfig::default()).unwrap();
/// assert_eq!(out.dimensions(), (1600, 600));
/// ```
pub fn composite(
    layout: &ResolvedLayout,
    image: Option<&DynamicImage>,
    config: &CompositionConfig,
) -> Result<RgbImage, Error> {
    let compositor = Compositor::new(layout, config)?;
    let rgb = image.map(DynamicImage::to_rgb8);
    Ok(compositor.compose(rgb.as_ref()))
}
