//! Axis-aligned rectangles shared by pixel space and physical (millimeter) space.
//!
//! The same [`Rect`] type is used for both spaces, parameterized by its scalar:
//! [`PixelRect`] (`i32`) for OS-reported display geometry and [`MmRect`] (`f64`)
//! for resolved physical geometry. Converting between the two always goes
//! through an explicit scale factor; there is no implicit mixing.

use core::fmt;

use num_traits::{Num, ToPrimitive};

/// One of the two layout axes.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Axis {
    /// Horizontal.
    X,
    /// Vertical.
    Y,
}

impl Axis {
    /// The perpendicular axis.
    pub const fn other(self) -> Self {
        match self {
            Axis::X => Axis::Y,
            Axis::Y => Axis::X,
        }
    }
}

/// Width × height dimensions in pixels.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Size {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Size {
    /// Create a new size.
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Whether either side is zero.
    pub const fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Axis-aligned rectangle, origin at the top-left.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Rect<T> {
    pub x: T,
    pub y: T,
    pub width: T,
    pub height: T,
}

/// Rectangle in OS pixel coordinates.
pub type PixelRect = Rect<i32>;

/// Rectangle in physical millimeters (or any other continuous space, such as
/// sub-pixel source-image coordinates).
pub type MmRect = Rect<f64>;

impl<T> Rect<T> {
    /// Create a new rect.
    pub const fn new(x: T, y: T, width: T, height: T) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

impl<T: Copy + Num + PartialOrd> Rect<T> {
    /// Right edge (exclusive).
    pub fn right(&self) -> T {
        self.x + self.width
    }

    /// Bottom edge (exclusive).
    pub fn bottom(&self) -> T {
        self.y + self.height
    }

    /// Start coordinate on `axis`.
    pub fn start(&self, axis: Axis) -> T {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
        }
    }

    /// Extent (width or height) on `axis`.
    pub fn extent(&self, axis: Axis) -> T {
        match axis {
            Axis::X => self.width,
            Axis::Y => self.height,
        }
    }

    /// Far edge (start + extent) on `axis`.
    pub fn far(&self, axis: Axis) -> T {
        self.start(axis) + self.extent(axis)
    }

    /// Translate by `(dx, dy)`.
    pub fn translate(self, dx: T, dy: T) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            ..self
        }
    }

    /// Smallest rect covering both.
    pub fn union(&self, other: &Self) -> Self {
        let x = min(self.x, other.x);
        let y = min(self.y, other.y);
        let right = max(self.right(), other.right());
        let bottom = max(self.bottom(), other.bottom());
        Self {
            x,
            y,
            width: right - x,
            height: bottom - y,
        }
    }

    /// Union of every rect in `rects`, or `None` when empty.
    pub fn union_all<'a, I>(rects: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a Self>,
        T: 'a,
    {
        rects
            .into_iter()
            .fold(None, |acc: Option<Self>, r| match acc {
                None => Some(*r),
                Some(u) => Some(u.union(r)),
            })
    }
}

impl<T: Copy + ToPrimitive> Rect<T> {
    /// Widen to `f64` coordinates.
    pub fn to_f64(&self) -> Rect<f64> {
        Rect {
            x: self.x.to_f64().unwrap_or(0.0),
            y: self.y.to_f64().unwrap_or(0.0),
            width: self.width.to_f64().unwrap_or(0.0),
            height: self.height.to_f64().unwrap_or(0.0),
        }
    }
}

impl PixelRect {
    /// Pixel dimensions. Negative extents clamp to zero.
    pub fn size(&self) -> Size {
        Size::new(self.width.max(0) as u32, self.height.max(0) as u32)
    }
}

impl MmRect {
    /// Full rect of a `width × height` image.
    pub fn of_size(size: Size) -> Self {
        Self::new(0.0, 0.0, size.width as f64, size.height as f64)
    }

    /// Vertical-over-horizontal aspect ratio (`height / width`).
    pub fn vh_ratio(&self) -> f64 {
        self.height / self.width
    }

    /// Center point as `(x, y)`.
    pub fn center(&self) -> (f64, f64) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Inset by `n` on every side.
    pub fn shrink(&self, n: f64) -> Self {
        Self::new(
            self.x + n,
            self.y + n,
            self.width - n * 2.0,
            self.height - n * 2.0,
        )
    }

    /// Outset by `n` on every side.
    pub fn grow(&self, n: f64) -> Self {
        self.shrink(-n)
    }

    /// Scale every component by `k`, then offset by `(dx, dy)`.
    pub fn scale_offset(&self, k: f64, dx: f64, dy: f64) -> Self {
        Self::new(
            k * self.x + dx,
            k * self.y + dy,
            k * self.width,
            k * self.height,
        )
    }

    /// Inclusive-exclusive pixel bounds, each edge rounded independently.
    ///
    /// Rounding `x` and `x + width` separately can make adjacent boxes
    /// overlap or leave a one pixel seam between them.
    pub fn pixel_box(&self) -> PixelBox {
        PixelBox {
            left: self.x.round_ties_even() as i64,
            top: self.y.round_ties_even() as i64,
            right: (self.x + self.width).round_ties_even() as i64,
            bottom: (self.y + self.height).round_ties_even() as i64,
        }
    }
}

impl fmt::Display for MmRect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({:.2}, {:.2}, {:.2}×{:.2})",
            self.x, self.y, self.width, self.height
        )
    }
}

impl fmt::Display for PixelRect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}×{}+{}+{}", self.width, self.height, self.x, self.y)
    }
}

/// Integer crop box with exclusive right/bottom edges.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct PixelBox {
    pub left: i64,
    pub top: i64,
    pub right: i64,
    pub bottom: i64,
}

impl PixelBox {
    pub fn width(&self) -> i64 {
        self.right - self.left
    }

    pub fn height(&self) -> i64 {
        self.bottom - self.top
    }

    /// Intersect with `(0, 0, size)`, returning `(x, y, w, h)` or `None` when
    /// nothing is left.
    pub fn clip_to(&self, size: Size) -> Option<(u32, u32, u32, u32)> {
        let left = self.left.clamp(0, size.width as i64);
        let top = self.top.clamp(0, size.height as i64);
        let right = self.right.clamp(0, size.width as i64);
        let bottom = self.bottom.clamp(0, size.height as i64);
        if right <= left || bottom <= top {
            return None;
        }
        Some((
            left as u32,
            top as u32,
            (right - left) as u32,
            (bottom - top) as u32,
        ))
    }
}

fn min<T: PartialOrd>(a: T, b: T) -> T {
    if b < a { b } else { a }
}

fn max<T: PartialOrd>(a: T, b: T) -> T {
    if b > a { b } else { a }
}
