//! Crate error type.
//!
//! Layout resolution and configuration never fail; they fall back to
//! documented defaults. Errors come from the edges: an empty display set,
//! image decode/encode, and display enumeration.

/// Errors surfaced to the caller.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Compositing needs at least one display.
    #[error("no displays to compose onto")]
    NoDisplays,
    /// Image decode or encode failed.
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// Display enumeration failed or produced nothing usable.
    #[error("display enumeration failed: {0}")]
    Enumerate(String),
}
