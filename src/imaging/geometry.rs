//! Geometric operations that change the shape or orientation of a surface.
//!
//! These work against any [`Surface`] rather than a raw pixel buffer because
//! they replace the backing store (resize, crop) or draw under a transform
//! (rotate).

use super::calculations::{scaled_dimensions, validate_crop};
use super::params::{CropArea, ResampleFilter};
use super::surface::{Dimensions, EditError, Surface, ensure_not_empty};
use image::imageops;
use tracing::debug;

/// Scale both axes by `scale` and swap the result in.
///
/// Output size is `round(width × scale) × round(height × scale)`; a uniform
/// scale therefore keeps the aspect ratio up to rounding. No upper size limit
/// is enforced here.
pub fn resize<S: Surface>(
    surface: &mut S,
    scale: f64,
    filter: ResampleFilter,
) -> Result<Dimensions, EditError> {
    let from = surface.dimensions();
    ensure_not_empty(from)?;
    let to = scaled_dimensions(from, scale).ok_or_else(|| {
        EditError::InvalidParameter(format!("scale {scale} is not usable for a {from} surface"))
    })?;

    let source = surface.snapshot();
    let scaled = imageops::resize(&source, to.width, to.height, filter.to_filter());
    surface.replace(scaled)?;
    debug!(%from, %to, scale, "resized surface");
    Ok(to)
}

/// Rotate the contents clockwise by `degrees` about the surface centre.
///
/// The surface keeps its size, so anything rotated past the edges is lost and
/// pixels no longer covered keep their previous contents. Any angle is
/// accepted; quarter turns on non-square surfaces clip as well.
pub fn rotate<S: Surface>(surface: &mut S, degrees: f64) -> Result<(), EditError> {
    let dims = surface.dimensions();
    ensure_not_empty(dims)?;
    if !degrees.is_finite() {
        return Err(EditError::InvalidParameter(format!(
            "rotation must be finite, got {degrees}"
        )));
    }

    let center_x = dims.width as f64 / 2.0;
    let center_y = dims.height as f64 / 2.0;
    let source = surface.snapshot();

    surface.save();
    surface.translate(center_x, center_y);
    surface.rotate(degrees.to_radians());
    surface.draw_image(&source, -center_x, -center_y);
    surface.restore();
    debug!(degrees, %dims, "rotated surface");
    Ok(())
}

/// Cut the surface down to `area`.
///
/// `area` must be non-empty and lie fully inside the current bounds; nothing
/// is clamped.
pub fn crop<S: Surface>(surface: &mut S, area: CropArea) -> Result<Dimensions, EditError> {
    let dims = surface.dimensions();
    ensure_not_empty(dims)?;
    validate_crop(area, dims)?;

    let source = surface.snapshot();
    let cropped = imageops::crop_imm(&source, area.x, area.y, area.width, area.height).to_image();
    surface.replace(cropped)?;
    debug!(%area, "cropped surface");
    Ok(Dimensions {
        width: area.width,
        height: area.height,
    })
}
