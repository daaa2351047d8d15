//! Typed settings derived from a [`ConfigStore`].

use std::collections::BTreeMap;

use super::{ConfigStore, ConfigValue, ParseWarning};
use crate::display::ReferenceMode;
use crate::geometry::Axis;

/// Section holding the global composition settings.
pub const GLOBAL_SECTION: &str = "Config";

/// Largest accepted crop percentage. Values outside `0..=MAX_CROP` read as 0.
pub const MAX_CROP: f64 = 34.0;

/// `offsetXFrom` / `offsetYFrom` sentinel meaning "absolute position".
pub const ZERO_ANCHOR: &str = "Zero";

/// How the source image is fitted onto the combined physical canvas.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompositionConfig {
    /// Percentage of the over-sized axis to crop away, in `0..=MAX_CROP`.
    pub crop: f64,
    /// Extend the image with a blurred border instead of cropping to the canvas aspect.
    pub padding: bool,
    /// Bias the crop window toward edge-rich content.
    pub trim: bool,
    /// Display whose center should land on the image center.
    pub center: Option<String>,
}

impl CompositionConfig {
    /// Builder: set the crop percentage (clamped to the accepted range, else 0).
    pub fn with_crop(mut self, crop: f64) -> Self {
        self.crop = clamp_crop(crop);
        self
    }

    /// Builder: enable padding.
    pub fn with_padding(mut self, padding: bool) -> Self {
        self.padding = padding;
        self
    }

    /// Builder: enable content-aware trim.
    pub fn with_trim(mut self, trim: bool) -> Self {
        self.trim = trim;
        self
    }

    /// Builder: set the center anchor display.
    pub fn with_center(mut self, name: impl Into<String>) -> Self {
        self.center = Some(name.into());
        self
    }
}

fn clamp_crop(crop: f64) -> f64 {
    if (0.0..=MAX_CROP).contains(&crop) {
        crop
    } else {
        0.0
    }
}

/// Where an axis offset is measured from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HintTarget {
    /// Offset is an absolute position.
    Absolute,
    /// Offset is relative to another display.
    Display { name: String, mode: ReferenceMode },
}

/// Configured relationship on one axis.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AxisHint {
    /// `None` when no reference is configured; the position is then discovered.
    pub from: Option<HintTarget>,
    /// Offset in millimeters.
    pub offset_mm: f64,
}

impl AxisHint {
    /// Relative to `name` using `mode`.
    pub fn relative(name: impl Into<String>, mode: ReferenceMode, offset_mm: f64) -> Self {
        Self {
            from: Some(HintTarget::Display {
                name: name.into(),
                mode,
            }),
            offset_mm,
        }
    }

    /// Absolute position.
    pub fn absolute(offset_mm: f64) -> Self {
        Self {
            from: Some(HintTarget::Absolute),
            offset_mm,
        }
    }
}

/// Configured relationships for one display.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DisplayHints {
    pub x: AxisHint,
    pub y: AxisHint,
}

impl DisplayHints {
    pub fn axis(&self, axis: Axis) -> &AxisHint {
        match axis {
            Axis::X => &self.x,
            Axis::Y => &self.y,
        }
    }
}

/// Per-display hints keyed by display name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LayoutHints {
    displays: BTreeMap<String, DisplayHints>,
}

impl LayoutHints {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: set the hint for `name` on `axis`.
    pub fn with(mut self, name: impl Into<String>, axis: Axis, hint: AxisHint) -> Self {
        let entry = self.displays.entry(name.into()).or_default();
        match axis {
            Axis::X => entry.x = hint,
            Axis::Y => entry.y = hint,
        }
        self
    }

    /// Hint for `name` on `axis`, if any was configured.
    pub fn get(&self, name: &str, axis: Axis) -> Option<&AxisHint> {
        self.displays.get(name).map(|h| h.axis(axis))
    }

    pub fn is_empty(&self) -> bool {
        self.displays.is_empty()
    }
}

/// Everything the configuration file controls.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Settings {
    pub composition: CompositionConfig,
    /// Verbose logging and debug artifacts.
    pub debug: bool,
    pub hints: LayoutHints,
}

impl Settings {
    /// Derive settings from a parsed store.
    pub fn from_store(store: &ConfigStore) -> (Self, Vec<ParseWarning>) {
        let mut warnings = Vec::new();
        let composition = read_composition(store, &mut warnings);
        let debug = store.get_bool(GLOBAL_SECTION, "debug").unwrap_or(false);

        let mut hints = LayoutHints::new();
        for section in store.sections().filter(|s| *s != GLOBAL_SECTION) {
            let display = DisplayHints {
                x: read_axis_hint(store, section, Axis::X, &mut warnings),
                y: read_axis_hint(store, section, Axis::Y, &mut warnings),
            };
            if display != DisplayHints::default() {
                hints.displays.insert(String::from(section), display);
            }
        }

        (
            Self {
                composition,
                debug,
                hints,
            },
            warnings,
        )
    }

    /// Parse configuration text straight into settings, collecting warnings
    /// from both stages.
    pub fn from_ini(text: &str) -> (Self, Vec<ParseWarning>) {
        let parsed = super::parse(text);
        let (settings, mut warnings) = Self::from_store(&parsed.store);
        let mut all = parsed.warnings;
        all.append(&mut warnings);
        (settings, all)
    }
}

fn read_composition(store: &ConfigStore, warnings: &mut Vec<ParseWarning>) -> CompositionConfig {
    let crop = match store.get_f64(GLOBAL_SECTION, "crop") {
        ConfigValue::Missing => 0.0,
        ConfigValue::Invalid(raw) => {
            warnings.push(invalid(GLOBAL_SECTION, "crop", raw, "expected a number"));
            0.0
        }
        ConfigValue::Set(v) => {
            let clamped = clamp_crop(v);
            if clamped != v {
                warnings.push(invalid(
                    GLOBAL_SECTION,
                    "crop",
                    v.to_string(),
                    "expected 0 to 34",
                ));
            }
            clamped
        }
    };

    CompositionConfig {
        crop,
        padding: store.get_bool(GLOBAL_SECTION, "padding").unwrap_or(false),
        trim: store.get_bool(GLOBAL_SECTION, "trim").unwrap_or(false),
        center: store
            .get_str(GLOBAL_SECTION, "center")
            .set()
            .map(String::from),
    }
}

fn read_axis_hint(
    store: &ConfigStore,
    section: &str,
    axis: Axis,
    warnings: &mut Vec<ParseWarning>,
) -> AxisHint {
    let (offset_key, from_key, mode_key) = match axis {
        Axis::X => ("offsetX", "offsetXFrom", "offsetXMode"),
        Axis::Y => ("offsetY", "offsetYFrom", "offsetYMode"),
    };

    let offset_mm = match store.get_f64(section, offset_key) {
        ConfigValue::Invalid(raw) => {
            warnings.push(invalid(section, offset_key, raw, "expected millimeters"));
            0.0
        }
        other => other.unwrap_or(0.0),
    };

    let from = store.get_str(section, from_key).set().map(|name| {
        if name.eq_ignore_ascii_case(ZERO_ANCHOR) {
            return HintTarget::Absolute;
        }
        let mode = match store.get_mode(section, mode_key) {
            ConfigValue::Invalid(raw) => {
                warnings.push(invalid(
                    section,
                    mode_key,
                    raw,
                    "expected S2S|F2S|F2F|ABS",
                ));
                ReferenceMode::StartToStart
            }
            other => other.unwrap_or(ReferenceMode::StartToStart),
        };
        HintTarget::Display {
            name: String::from(name),
            mode,
        }
    });

    AxisHint { from, offset_mm }
}

fn invalid(section: &str, key: &'static str, value: String, reason: &'static str) -> ParseWarning {
    ParseWarning::ValueInvalid {
        section: String::from(section),
        key,
        value,
        reason,
    }
}
