//! Image processing in pure Rust, no system libraries.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Identify** | `image::image_dimensions` |
//! | **Scaled copy** | `resize_exact` (Lanczos3), format from output extension |
//!
//! Scale math lives in `calculations` and never touches a file. `params`
//! holds the validated [`Scale`] and the [`ResizeParams`] handed to a
//! backend. [`create_scaled_copy`] glues the two to an [`ImageBackend`].

pub mod backend;
mod calculations;
pub mod operations;
mod params;
pub mod rust_backend;

pub use backend::{BackendError, Dimensions, ImageBackend};
pub use calculations::effective_scale;
pub use operations::create_scaled_copy;
pub use params::{InvalidScale, ResizeParams, Scale};
pub use rust_backend::RustBackend;
