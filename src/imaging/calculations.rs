//! Pure calculation functions for thumbnail dimensions.
//!
//! All functions here are pure and testable without any I/O or images.

use super::params::Scale;

/// Source height that triggers the minimum-scale floor.
pub const FLOOR_HEIGHT: u32 = 900;

/// Smallest scale applied to [`FLOOR_HEIGHT`] images.
pub const FLOOR_SCALE: f64 = 0.2;

/// Resolve the scale actually applied to an image of the given height.
///
/// Images exactly [`FLOOR_HEIGHT`] tall are scaled by at least
/// [`FLOOR_SCALE`]. Every other height uses the requested scale unchanged.
///
/// # Examples
/// ```
/// # use coinjoin_web::imaging::{Scale, effective_scale};
/// let requested = Scale::new(0.1).unwrap();
/// assert_eq!(effective_scale(900, requested), 0.2);
/// assert_eq!(effective_scale(901, requested), 0.1);
/// ```
pub fn effective_scale(height: u32, requested: Scale) -> f64 {
    if height == FLOOR_HEIGHT {
        requested.value().max(FLOOR_SCALE)
    } else {
        requested.value()
    }
}

/// Calculate output dimensions for a source image and requested scale.
///
/// Each edge is multiplied independently and truncated toward zero, so the
/// result may be `0` for tiny sources. Callers decide whether that is an error.
///
/// # Arguments
/// * `source` - Original image dimensions (width, height)
/// * `requested` - Scale from the command line
///
/// # Returns
/// * `(width, height)` - Truncated output dimensions
pub fn scaled_dimensions(source: (u32, u32), requested: Scale) -> (u32, u32) {
    let (width, height) = source;
    let scale = effective_scale(height, requested);
    (
        (width as f64 * scale) as u32,
        (height as f64 * scale) as u32,
    )
}
