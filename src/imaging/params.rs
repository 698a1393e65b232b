//! Parameter types for editing operations.
//!
//! These structs describe *what* to do, not *how* to do it. They are shared by
//! the operation modules, the session, and the config layer.
//!
//! ## Types
//!
//! - [`CropArea`]: Axis-aligned rectangle in surface coordinates.
//! - [`CompressionLevel`]: Export quality (0.1–1.0, default 0.8). Clamped on construction.
//! - [`ResampleFilter`]: Resampling kernel used when resizing.

use image::imageops::FilterType;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Rectangular region of a surface, top-left corner plus size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CropArea {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl CropArea {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Exclusive right edge, `None` on overflow.
    pub fn right(&self) -> Option<u32> {
        self.x.checked_add(self.width)
    }

    /// Exclusive bottom edge, `None` on overflow.
    pub fn bottom(&self) -> Option<u32> {
        self.y.checked_add(self.height)
    }
}

impl fmt::Display for CropArea {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}x{}+{}+{}",
            self.width, self.height, self.x, self.y
        )
    }
}

/// Lossy export quality in `[0.1, 1.0]`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct CompressionLevel(f32);

impl CompressionLevel {
    pub const MIN: f32 = 0.1;
    pub const MAX: f32 = 1.0;

    /// Clamp into range. NaN falls back to the default level.
    pub fn new(value: f32) -> Self {
        if value.is_nan() {
            return Self::default();
        }
        Self(value.clamp(Self::MIN, Self::MAX))
    }

    pub fn value(self) -> f32 {
        self.0
    }

    /// Encoder quality on the 1–100 scale.
    pub fn quality(self) -> u8 {
        (self.0 * 100.0).round() as u8
    }
}

impl Default for CompressionLevel {
    fn default() -> Self {
        Self(0.8)
    }
}

/// Resampling kernel for [`resize`](super::geometry::resize).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResampleFilter {
    Nearest,
    /// Bilinear; closest to what a browser canvas does when scaling.
    #[default]
    Triangle,
    CatmullRom,
    Gaussian,
    Lanczos3,
}

impl ResampleFilter {
    pub fn to_filter(self) -> FilterType {
        match self {
            Self::Nearest => FilterType::Nearest,
            Self::Triangle => FilterType::Triangle,
            Self::CatmullRom => FilterType::CatmullRom,
            Self::Gaussian => FilterType::Gaussian,
            Self::Lanczos3 => FilterType::Lanczos3,
        }
    }
}
