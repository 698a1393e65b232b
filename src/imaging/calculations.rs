//! Pure calculation functions for editing operations.
//!
//! All functions here are pure and testable without any pixels or surfaces.

use super::params::CropArea;
use super::surface::{Dimensions, EditError};

/// Round and clamp a float channel value into `u8` range.
pub fn clamp_channel(value: f32) -> u8 {
    value.clamp(0.0, 255.0).round() as u8
}

/// Rec. 601 luma of an RGB triple.
pub fn luma(r: f32, g: f32, b: f32) -> f32 {
    0.299 * r + 0.587 * g + 0.114 * b
}

/// Contrast gain for a contrast value in `[-255, 255]`.
///
/// ```
/// # use retouch::imaging::calculations::contrast_factor;
/// assert_eq!(contrast_factor(0.0), 1.0);
/// assert!(contrast_factor(50.0) > 1.0);
/// assert!(contrast_factor(-50.0) < 1.0);
/// ```
pub fn contrast_factor(value: f32) -> f32 {
    (259.0 * (value + 255.0)) / (255.0 * (259.0 - value))
}

/// Dimensions after scaling both axes by `scale`.
///
/// Products are rounded to the nearest pixel so that a scale followed by its
/// reciprocal lands back on the starting size whenever the intermediate size
/// is integral. Returns `None` for non-finite or non-positive scales and for
/// results that would collapse an axis to zero.
pub fn scaled_dimensions(dims: Dimensions, scale: f64) -> Option<Dimensions> {
    if !scale.is_finite() || scale <= 0.0 {
        return None;
    }
    let width = (dims.width as f64 * scale).round();
    let height = (dims.height as f64 * scale).round();
    if width < 1.0 || height < 1.0 || width > u32::MAX as f64 || height > u32::MAX as f64 {
        return None;
    }
    Some(Dimensions {
        width: width as u32,
        height: height as u32,
    })
}

/// Check that `area` is non-empty and lies entirely inside `bounds`.
pub fn validate_crop(area: CropArea, bounds: Dimensions) -> Result<(), EditError> {
    if area.width == 0 || area.height == 0 {
        return Err(EditError::EmptyCrop(area));
    }
    let fits = matches!(
        (area.right(), area.bottom()),
        (Some(r), Some(b)) if r <= bounds.width && b <= bounds.height
    );
    if !fits {
        return Err(EditError::CropOutOfBounds {
            area,
            width: bounds.width,
            height: bounds.height,
        });
    }
    Ok(())
}

/// 2D affine transform in canvas convention.
///
/// Maps `(x, y)` to `(a·x + c·y + e, b·x + d·y + f)`. Composition methods
/// post-multiply, so `identity().translate(..).rotate(..)` applies the
/// rotation first and the translation last, the way a canvas context does.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Affine {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub e: f64,
    pub f: f64,
}

impl Affine {
    pub const IDENTITY: Affine = Affine {
        a: 1.0,
        b: 0.0,
        c: 0.0,
        d: 1.0,
        e: 0.0,
        f: 0.0,
    };

    pub fn then(self, n: Affine) -> Affine {
        Affine {
            a: self.a * n.a + self.c * n.b,
            b: self.b * n.a + self.d * n.b,
            c: self.a * n.c + self.c * n.d,
            d: self.b * n.c + self.d * n.d,
            e: self.a * n.e + self.c * n.f + self.e,
            f: self.b * n.e + self.d * n.f + self.f,
        }
    }

    pub fn translate(self, dx: f64, dy: f64) -> Affine {
        self.then(Affine {
            e: dx,
            f: dy,
            ..Affine::IDENTITY
        })
    }

    /// Clockwise on screen (y grows downward).
    pub fn rotate(self, radians: f64) -> Affine {
        let (sin, cos) = radians.sin_cos();
        self.then(Affine {
            a: cos,
            b: sin,
            c: -sin,
            d: cos,
            e: 0.0,
            f: 0.0,
        })
    }

    pub fn apply(&self, x: f64, y: f64) -> (f64, f64) {
        (
            self.a * x + self.c * y + self.e,
            self.b * x + self.d * y + self.f,
        )
    }

    /// `None` when the transform is singular.
    pub fn invert(&self) -> Option<Affine> {
        let det = self.a * self.d - self.b * self.c;
        if det.abs() < f64::EPSILON {
            return None;
        }
        Some(Affine {
            a: self.d / det,
            b: -self.b / det,
            c: -self.c / det,
            d: self.a / det,
            e: (self.c * self.f - self.d * self.e) / det,
            f: (self.b * self.e - self.a * self.f) / det,
        })
    }
}

impl Default for Affine {
    fn default() -> Self {
        Self::IDENTITY
    }
}
