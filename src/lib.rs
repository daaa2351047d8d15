//! Spanned wallpapers across multiple displays of differing size and density.
//!
//! Resolves where each display physically sits relative to the others, then
//! slices a single source image so it appears continuous across all of them.
//!
//! # Modules
//!
//! - [`geometry`]: `Rect<T>` over pixel and millimeter coordinates
//! - [`display`]: display records, reference modes, resolved layouts
//! - [`resolve`]: physical layout resolution from pixel rects and hints
//! - [`canvas`]: fit rect, crop window and padding geometry
//! - [`composite`]: the pixel pipeline producing the output image
//! - [`config`]: configuration file parsing and typed settings
//! - [`enumerate`]: display enumeration through `display-info`
//!
//! # Example
//!
//! ```
//! use spanwall::{DisplayRecord, LayoutHints, resolve};
//!
//! let layout = resolve(
//!     &[
//!         DisplayRecord::new("a", 0, 0, 800, 600).with_size_mm(8000.0, 6000.0),
//!         DisplayRecord::new("b", 800, 0, 1024, 768).with_size_mm(10240.0, 7680.0),
//!         DisplayRecord::new("c", 1824, 0, 1024, 768).with_size_mm(10240.0, 7680.0),
//!     ],
//!     &LayoutHints::new(),
//! );
//! assert_eq!(layout.get("b").unwrap().mm_rect.x, 8000.0);
//! assert_eq!(layout.get("c").unwrap().mm_rect.x, 18240.0);
//! ```

#![forbid(unsafe_code)]

pub mod canvas;
pub mod composite;
pub mod config;
pub mod display;
pub mod enumerate;
pub mod error;
mod filter;
pub mod geometry;
pub mod resolve;
pub mod saliency;

#[cfg(feature = "svg")]
pub mod svg;

pub use canvas::Canvas;
pub use composite::{Compositor, composite};
pub use config::{AxisHint, CompositionConfig, LayoutHints, Settings};
pub use display::{AxisReference, DisplayLayout, DisplayRecord, ReferenceMode};
pub use enumerate::{DisplaySource, SystemDisplays};
pub use error::Error;
pub use geometry::{Axis, MmRect, PixelRect, Rect, Size};
pub use resolve::{LayoutResolver, ResolvedLayout, find_display_above, find_display_left, resolve};
