//! Display enumeration.
//!
//! [`DisplaySource`] is the seam between the OS and the resolver. The stock
//! implementation, [`SystemDisplays`], asks the platform through the
//! `display-info` crate.

use display_info::DisplayInfo;

use crate::display::DisplayRecord;
use crate::error::Error;

/// Something that can list the attached displays.
pub trait DisplaySource {
    fn displays(&self) -> Result<Vec<DisplayRecord>, Error>;
}

/// Fixed list of displays, for tests and callers with their own enumeration.
impl DisplaySource for [DisplayRecord] {
    fn displays(&self) -> Result<Vec<DisplayRecord>, Error> {
        Ok(self.to_vec())
    }
}

/// The displays currently attached to this machine.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemDisplays;

impl SystemDisplays {
    pub fn new() -> Self {
        Self
    }
}

impl DisplaySource for SystemDisplays {
    fn displays(&self) -> Result<Vec<DisplayRecord>, Error> {
        let infos = DisplayInfo::all().map_err(|e| Error::Enumerate(e.to_string()))?;
        let displays: Vec<DisplayRecord> = infos.iter().map(DisplayRecord::from).collect();
        if displays.is_empty() {
            return Err(Error::Enumerate(String::from("no active displays reported")));
        }
        Ok(displays)
    }
}

impl From<&DisplayInfo> for DisplayRecord {
    fn from(info: &DisplayInfo) -> Self {
        to_record(
            &info.name,
            (info.x, info.y, info.width, info.height),
            (info.width_mm, info.height_mm),
            info.is_primary,
        )
    }
}

/// Build a record from platform values: pixel `(x, y, width, height)` and
/// physical `(width_mm, height_mm)`. A side reported as 0 mm (or less) is
/// unknown; both must be known for the size to be kept.
fn to_record(
    name: &str,
    (x, y, width, height): (i32, i32, u32, u32),
    (width_mm, height_mm): (i32, i32),
    is_primary: bool,
) -> DisplayRecord {
    let clamp = |v: u32| i32::try_from(v).unwrap_or(i32::MAX);
    let mut record = DisplayRecord::new(name, x, y, clamp(width), clamp(height));
    if width_mm > 0 && height_mm > 0 {
        record = record.with_size_mm(f64::from(width_mm), f64::from(height_mm));
    }
    if is_primary {
        record = record.primary();
    }
    record
}
