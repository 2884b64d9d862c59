//! Parameter types for image operations.
//!
//! These structs describe *what* to do, not *how* to do it. They sit between
//! [`operations`](super::operations), which decides the output size, and the
//! [`backend`](super::backend), which does the pixel work. Keeping them plain
//! data lets the thumbnail pipeline be tested against a recording mock.
//!
//! ## Types
//!
//! - [`Scale`]: resize factor in `(0, 1]`. Rejected on construction otherwise.
//! - [`ResizeParams`]: everything a resize needs: source, output path, exact target dimensions.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Resize factor applied to both edges of a source image.
///
/// Only shrinking is supported: the value must be finite and in `(0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Scale(f64);

impl Scale {
    /// Default thumbnail scale.
    pub const DEFAULT: Scale = Scale(0.15);

    pub fn new(value: f64) -> Result<Self, InvalidScale> {
        if value.is_finite() && value > 0.0 && value <= 1.0 {
            Ok(Self(value))
        } else {
            Err(InvalidScale(value.to_string()))
        }
    }

    pub fn value(self) -> f64 {
        self.0
    }
}

impl Default for Scale {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for Scale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Scale {
    type Err = InvalidScale;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value: f64 = s.trim().parse().map_err(|_| InvalidScale(s.to_string()))?;
        Self::new(value)
    }
}

/// A scale value outside `(0, 1]`, or not a number at all.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("scale must be a number in (0, 1], got {0}")]
pub struct InvalidScale(pub String);

/// Parameters for a resize to exact dimensions.
#[derive(Debug, Clone, PartialEq)]
pub struct ResizeParams {
    pub source: PathBuf,
    pub output: PathBuf,
    pub width: u32,
    pub height: u32,
}
