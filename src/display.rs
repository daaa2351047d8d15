//! Display records, reference modes, and resolved per-display layouts.

use core::fmt;

use crate::geometry::{Axis, MmRect, PixelRect};

/// Fallback pixel density when a display does not report its physical size:
/// 120 dots per inch, expressed in dots per millimeter.
pub const DEFAULT_DOTS_PER_MM: f64 = 120.0 / 25.4;

/// One attached display as reported by the OS. Immutable input.
#[derive(Clone, Debug, PartialEq)]
pub struct DisplayRecord {
    /// Unique, stable key (connector name).
    pub name: String,
    /// Position and size in OS pixel coordinates.
    pub rect: PixelRect,
    /// Reported physical width, if known.
    pub width_mm: Option<f64>,
    /// Reported physical height, if known.
    pub height_mm: Option<f64>,
    pub is_primary: bool,
}

impl DisplayRecord {
    /// A non-primary display with unknown physical size.
    pub fn new(name: impl Into<String>, x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            name: name.into(),
            rect: PixelRect::new(x, y, width, height),
            width_mm: None,
            height_mm: None,
            is_primary: false,
        }
    }

    /// Set the reported physical size.
    pub fn with_size_mm(mut self, width_mm: f64, height_mm: f64) -> Self {
        self.width_mm = Some(width_mm);
        self.height_mm = Some(height_mm);
        self
    }

    /// Mark as the primary display.
    pub fn primary(mut self) -> Self {
        self.is_primary = true;
        self
    }

    /// Physical `(width, height)` in millimeters.
    ///
    /// Missing (or non-positive) sides are derived from the pixel size at
    /// [`DEFAULT_DOTS_PER_MM`]. When the physical orientation disagrees with
    /// the pixel orientation (size metadata not rotated with the display),
    /// the sides are swapped.
    pub fn physical_size(&self) -> (f64, f64) {
        let width_mm = positive(self.width_mm)
            .unwrap_or_else(|| f64::from(self.rect.width) / DEFAULT_DOTS_PER_MM);
        let height_mm = positive(self.height_mm)
            .unwrap_or_else(|| f64::from(self.rect.height) / DEFAULT_DOTS_PER_MM);

        let pixel_portrait = self.rect.width < self.rect.height;
        let physical_portrait = width_mm < height_mm;
        if pixel_portrait == physical_portrait {
            (width_mm, height_mm)
        } else {
            (height_mm, width_mm)
        }
    }
}

fn positive(v: Option<f64>) -> Option<f64> {
    v.filter(|v| v.is_finite() && *v > 0.0)
}

impl fmt::Display for DisplayRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mm = |v: Option<f64>| v.map_or_else(|| String::from("None"), |v| format!("{v}"));
        write!(
            f,
            "Display(name={}, x={}, y={}, width={}, height={}, width_mm={}, height_mm={}, is_primary={})",
            self.name,
            self.rect.x,
            self.rect.y,
            self.rect.width,
            self.rect.height,
            mm(self.width_mm),
            mm(self.height_mm),
            self.is_primary
        )
    }
}

/// How a display's position on one axis relates to its reference display.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum ReferenceMode {
    /// Position is the configured offset; no reference involved.
    Absolute,
    /// Starts where the reference starts.
    #[default]
    StartToStart,
    /// Starts where the reference ends.
    FarToStart,
    /// Ends where the reference ends.
    FarToFar,
}

impl ReferenceMode {
    /// Parse a mode name: the short codes `ABS`, `S2S`, `F2S`, `F2F` or the
    /// long hyphenated names. Case-insensitive.
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        [
            (Self::Absolute, "abs", "absolute"),
            (Self::StartToStart, "s2s", "start-to-start"),
            (Self::FarToStart, "f2s", "far-to-start"),
            (Self::FarToFar, "f2f", "far-to-far"),
        ]
        .into_iter()
        .find(|(_, short, long)| s.eq_ignore_ascii_case(short) || s.eq_ignore_ascii_case(long))
        .map(|(mode, _, _)| mode)
    }

    /// Short code used in configuration files and logs.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Absolute => "ABS",
            Self::StartToStart => "S2S",
            Self::FarToStart => "F2S",
            Self::FarToFar => "F2F",
        }
    }

    /// Start coordinate of a display of size `extent`, given its reference's
    /// resolved `(start, extent)` on the same axis.
    ///
    /// For [`Absolute`](Self::Absolute) the reference is ignored and the
    /// offset is the position.
    pub fn place(self, reference: (f64, f64), extent: f64, offset: f64) -> f64 {
        let (ref_start, ref_extent) = reference;
        match self {
            Self::Absolute => offset,
            Self::StartToStart => ref_start + offset,
            Self::FarToStart => ref_start + ref_extent + offset,
            Self::FarToFar => ref_start + ref_extent - extent + offset,
        }
    }
}

impl fmt::Display for ReferenceMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resolved relationship of a display to another one along a single axis.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AxisReference {
    /// Name of the reference display; `None` for anchored displays.
    pub reference: Option<String>,
    pub mode: ReferenceMode,
    pub offset_mm: f64,
    /// How many other displays reference this one on this axis.
    pub reference_count: u32,
}

impl AxisReference {
    /// Anchored at `offset_mm` with no reference.
    pub fn anchored(offset_mm: f64) -> Self {
        Self {
            reference: None,
            mode: ReferenceMode::Absolute,
            offset_mm,
            reference_count: 0,
        }
    }
}

/// A display with its resolved physical geometry. Frozen once produced by
/// [`resolve`](crate::resolve::resolve).
#[derive(Clone, Debug, PartialEq)]
pub struct DisplayLayout {
    pub record: DisplayRecord,
    /// Physical rect in the shared millimeter space.
    pub mm_rect: MmRect,
    /// Horizontal relationship.
    pub x: AxisReference,
    /// Vertical relationship.
    pub y: AxisReference,
}

impl DisplayLayout {
    pub fn name(&self) -> &str {
        &self.record.name
    }

    /// Pixel rect as reported by the OS.
    pub fn rect(&self) -> PixelRect {
        self.record.rect
    }

    pub fn is_primary(&self) -> bool {
        self.record.is_primary
    }

    /// Relationship on `axis`.
    pub fn reference(&self, axis: Axis) -> &AxisReference {
        match axis {
            Axis::X => &self.x,
            Axis::Y => &self.y,
        }
    }
}

impl fmt::Display for DisplayLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let describe = |r: &AxisReference| match &r.reference {
            Some(name) => format!("{} {} {:+}", r.mode, name, r.offset_mm),
            None => format!("{} {:+}", r.mode, r.offset_mm),
        };
        write!(
            f,
            "{} px={} mm={} x=[{}] y=[{}]",
            self.record.name,
            self.record.rect,
            self.mm_rect,
            describe(&self.x),
            describe(&self.y)
        )
    }
}
