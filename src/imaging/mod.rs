//! Image editing core. Pure Rust, one in-memory raster.
//!
//! | Operation | Function |
//! |---|---|
//! | **Brightness / contrast / saturation** | [`adjust`] per-pixel transforms |
//! | **Sharpen** | 3×3 convolution, border untouched |
//! | **Enhance** | fixed contrast + saturation boost |
//! | **Resize** | `image::imageops::resize` onto the [`Surface`] |
//! | **Rotate** | save / translate / rotate / draw / restore on the [`Surface`] |
//! | **Crop** | bounds-checked `image::imageops::crop_imm` |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for channel and dimension math (unit testable)
//! - **Parameters**: Data structures describing operations
//! - **Surface**: [`Surface`] trait + [`Canvas`]
//! - **Adjust / Geometry**: the operations themselves

pub mod adjust;
pub mod calculations;
pub mod canvas;
pub mod geometry;
mod params;
pub mod surface;

pub use canvas::Canvas;
pub use params::{CompressionLevel, CropArea, ResampleFilter};
pub use surface::{Dimensions, EditError, Surface};
