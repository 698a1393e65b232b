//! Pixel transforms: colour adjustments applied in place.
//!
//! Every function takes the working buffer, mutates it, and hands the same
//! buffer back so calls can be chained with `?`:
//!
//! ```
//! # use retouch::imaging::adjust::{brightness, contrast};
//! # let mut image = image::RgbaImage::new(4, 4);
//! contrast(brightness(&mut image, 110.0)?, 20.0)?;
//! # Ok::<(), retouch::imaging::EditError>(())
//! ```
//!
//! Only the colour channels are touched; alpha passes through. Results are
//! clamped to `[0, 255]` and rounded. A zero-area buffer is a caller error.

use super::calculations::{clamp_channel, contrast_factor, luma};
use super::surface::{Dimensions, EditError, ensure_not_empty};
use image::RgbaImage;

/// Fixed gain used by [`enhance`].
pub const ENHANCE_CONTRAST_GAIN: f32 = 1.2;
/// Fixed saturation factor used by [`enhance`].
pub const ENHANCE_SATURATION: f32 = 1.1;

const SHARPEN_KERNEL: [[i32; 3]; 3] = [[0, -1, 0], [-1, 5, -1], [0, -1, 0]];

pub type Result<'a> = std::result::Result<&'a mut RgbaImage, EditError>;

fn ensure_finite(name: &str, value: f32) -> std::result::Result<(), EditError> {
    if !value.is_finite() {
        return Err(EditError::InvalidParameter(format!(
            "{name} must be finite, got {value}"
        )));
    }
    Ok(())
}

/// Scale R, G, B by `factor_percent / 100`. `100` is the identity.
pub fn brightness(image: &mut RgbaImage, factor_percent: f32) -> Result<'_> {
    ensure_not_empty(Dimensions::of(image))?;
    ensure_finite("brightness", factor_percent)?;
    if factor_percent < 0.0 {
        return Err(EditError::InvalidParameter(format!(
            "brightness must be non-negative, got {factor_percent}"
        )));
    }
    let factor = factor_percent / 100.0;
    for pixel in image.pixels_mut() {
        for c in 0..3 {
            pixel[c] = clamp_channel(pixel[c] as f32 * factor);
        }
    }
    Ok(image)
}

/// Stretch or compress channel values about mid-grey. `0` is the identity;
/// accepted range is `[-255, 255]`.
pub fn contrast(image: &mut RgbaImage, value: f32) -> Result<'_> {
    ensure_not_empty(Dimensions::of(image))?;
    ensure_finite("contrast", value)?;
    if !(-255.0..=255.0).contains(&value) {
        return Err(EditError::InvalidParameter(format!(
            "contrast must be within [-255, 255], got {value}"
        )));
    }
    let factor = contrast_factor(value);
    for pixel in image.pixels_mut() {
        for c in 0..3 {
            pixel[c] = clamp_channel(factor * (pixel[c] as f32 - 128.0) + 128.0);
        }
    }
    Ok(image)
}

/// Blend each channel toward (below 100) or away from (above 100) the pixel's
/// luma. `100` is the identity, `0` is full greyscale.
pub fn saturation(image: &mut RgbaImage, percent: f32) -> Result<'_> {
    ensure_not_empty(Dimensions::of(image))?;
    ensure_finite("saturation", percent)?;
    if percent < 0.0 {
        return Err(EditError::InvalidParameter(format!(
            "saturation must be non-negative, got {percent}"
        )));
    }
    let factor = percent / 100.0;
    for pixel in image.pixels_mut() {
        let [r, g, b, _] = pixel.0.map(f32::from);
        let gray = luma(r, g, b);
        for c in 0..3 {
            pixel[c] = clamp_channel(gray + factor * (pixel[c] as f32 - gray));
        }
    }
    Ok(image)
}

/// 3×3 sharpen convolution on the colour channels.
///
/// The outermost row and column on every side are left exactly as they were.
/// Reads come from a copy of the input, so already-sharpened neighbours never
/// feed back into the pass.
pub fn sharpen(image: &mut RgbaImage) -> Result<'_> {
    ensure_not_empty(Dimensions::of(image))?;
    let (width, height) = image.dimensions();
    if width < 3 || height < 3 {
        return Ok(image);
    }
    let source = image.clone();

    for y in 1..height - 1 {
        for x in 1..width - 1 {
            let mut sums = [0i32; 3];
            for (ky, row) in SHARPEN_KERNEL.iter().enumerate() {
                for (kx, &weight) in row.iter().enumerate() {
                    if weight == 0 {
                        continue;
                    }
                    let neighbour = source.get_pixel(x + kx as u32 - 1, y + ky as u32 - 1);
                    for (c, sum) in sums.iter_mut().enumerate() {
                        *sum += neighbour[c] as i32 * weight;
                    }
                }
            }
            let pixel = image.get_pixel_mut(x, y);
            for (c, sum) in sums.into_iter().enumerate() {
                pixel[c] = sum.clamp(0, 255) as u8;
            }
        }
    }
    Ok(image)
}

/// Fixed "auto enhance": contrast gain of [`ENHANCE_CONTRAST_GAIN`] about
/// mid-grey, then a saturation boost of [`ENHANCE_SATURATION`].
///
/// This is deterministic and does not look at the image content; the same
/// input always yields the same output.
pub fn enhance(image: &mut RgbaImage) -> Result<'_> {
    ensure_not_empty(Dimensions::of(image))?;
    for pixel in image.pixels_mut() {
        let mut rgb = [0.0f32; 3];
        for (c, value) in rgb.iter_mut().enumerate() {
            *value = clamp_channel(ENHANCE_CONTRAST_GAIN * (pixel[c] as f32 - 128.0) + 128.0)
                as f32;
        }
        let gray = luma(rgb[0], rgb[1], rgb[2]);
        for (c, value) in rgb.into_iter().enumerate() {
            pixel[c] = clamp_channel(gray + ENHANCE_SATURATION * (value - gray));
        }
    }
    Ok(image)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::*;

    // =========================================================================
    // Identity laws
    // =========================================================================

    #[test]
    fn brightness_100_is_identity() {
        let mut image = gradient(16, 9);
        let before = image.clone();
        brightness(&mut image, 100.0).unwrap();
        assert_eq!(image, before);
    }

    #[test]
    fn contrast_0_is_identity() {
        let mut image = noise(12, 12, 3);
        let before = image.clone();
        contrast(&mut image, 0.0).unwrap();
        assert_eq!(image, before);
    }

    #[test]
    fn saturation_100_is_identity() {
        let mut image = noise(12, 12, 4);
        let before = image.clone();
        saturation(&mut image, 100.0).unwrap();
        assert_images_close(&image, &before, 1);
    }

    // =========================================================================
    // Behaviour
    // =========================================================================

    #[test]
    fn brightness_scales_and_saturates() {
        let mut image = solid(2, 2, [100, 200, 10, 77]);
        brightness(&mut image, 150.0).unwrap();
        assert_eq!(image.get_pixel(0, 0).0, [150, 255, 15, 77]);
    }

    #[test]
    fn brightness_zero_is_black_with_alpha_kept() {
        let mut image = gradient(5, 5);
        let before = image.clone();
        brightness(&mut image, 0.0).unwrap();
        assert!(image.pixels().all(|p| p[0] == 0 && p[1] == 0 && p[2] == 0));
        assert_alpha_preserved(&image, &before);
    }

    #[test]
    fn contrast_pushes_values_away_from_mid_grey() {
        let mut image = solid(1, 2, [100, 128, 160, 255]);
        contrast(&mut image, 60.0).unwrap();
        let [r, g, b, _] = image.get_pixel(0, 0).0;
        assert!(r < 100);
        assert_eq!(g, 128);
        assert!(b > 160);
    }

    #[test]
    fn contrast_minimum_is_flat_grey() {
        let mut image = noise(4, 4, 9);
        contrast(&mut image, -255.0).unwrap();
        assert!(image.pixels().all(|p| p[0] == 128 && p[1] == 128 && p[2] == 128));
    }

    #[test]
    fn contrast_out_of_range_is_rejected() {
        let mut image = gradient(3, 3);
        assert!(matches!(
            contrast(&mut image, 259.0),
            Err(EditError::InvalidParameter(_))
        ));
    }

    #[test]
    fn saturation_zero_makes_channels_equal() {
        let mut image = noise(6, 6, 1);
        saturation(&mut image, 0.0).unwrap();
        for p in image.pixels() {
            assert!(p[0].abs_diff(p[1]) <= 1 && p[1].abs_diff(p[2]) <= 1, "{p:?}");
        }
    }

    #[test]
    fn desaturating_white_leaves_it_unchanged() {
        let mut image = solid(4, 4, [255, 255, 255, 255]);
        saturation(&mut image, 0.0).unwrap();
        assert_eq!(image, solid(4, 4, [255, 255, 255, 255]));
    }

    #[test]
    fn sharpen_leaves_border_bit_identical() {
        let mut image = noise(7, 5, 11);
        let before = image.clone();
        sharpen(&mut image).unwrap();
        assert_eq!(border_pixels(&image), border_pixels(&before));
        assert_ne!(image, before, "interior should change on a noisy image");
    }

    #[test]
    fn sharpen_flat_image_is_unchanged() {
        let mut image = solid(5, 5, [90, 40, 200, 255]);
        sharpen(&mut image).unwrap();
        assert_eq!(image, solid(5, 5, [90, 40, 200, 255]));
    }

    #[test]
    fn sharpen_reads_from_unmodified_copy() {
        // Bright centre line: each interior pixel only sees original values.
        let mut image = solid(5, 3, [0, 0, 0, 255]);
        image.get_pixel_mut(2, 1).0 = [100, 100, 100, 255];
        sharpen(&mut image).unwrap();
        assert_eq!(image.get_pixel(1, 1).0, [0, 0, 0, 255]);
        assert_eq!(image.get_pixel(2, 1).0, [255, 255, 255, 255]);
        assert_eq!(image.get_pixel(3, 1).0, [0, 0, 0, 255]);
    }

    #[test]
    fn sharpen_tiny_image_is_noop() {
        let mut image = noise(2, 9, 5);
        let before = image.clone();
        sharpen(&mut image).unwrap();
        assert_eq!(image, before);
    }

    #[test]
    fn enhance_is_deterministic() {
        let mut a = noise(8, 8, 21);
        let mut b = a.clone();
        enhance(&mut a).unwrap();
        enhance(&mut b).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn enhance_keeps_mid_grey() {
        let mut image = solid(2, 2, [128, 128, 128, 200]);
        enhance(&mut image).unwrap();
        assert_eq!(image.get_pixel(1, 1).0, [128, 128, 128, 200]);
    }

    // =========================================================================
    // Preconditions and bounds
    // =========================================================================

    #[test]
    fn empty_buffer_fails_fast_for_every_transform() {
        let mut empty = RgbaImage::new(0, 4);
        assert!(matches!(brightness(&mut empty, 120.0), Err(EditError::EmptyBuffer { .. })));
        assert!(matches!(contrast(&mut empty, 10.0), Err(EditError::EmptyBuffer { .. })));
        assert!(matches!(saturation(&mut empty, 50.0), Err(EditError::EmptyBuffer { .. })));
        assert!(matches!(sharpen(&mut empty), Err(EditError::EmptyBuffer { .. })));
        assert!(matches!(enhance(&mut empty), Err(EditError::EmptyBuffer { .. })));
    }

    #[test]
    fn non_finite_parameters_are_rejected() {
        let mut image = gradient(3, 3);
        assert!(brightness(&mut image, f32::NAN).is_err());
        assert!(contrast(&mut image, f32::INFINITY).is_err());
        assert!(saturation(&mut image, -5.0).is_err());
    }

    #[test]
    fn extreme_parameters_stay_in_range_and_keep_alpha() {
        let original = noise(9, 9, 77);
        let runs: [fn(&mut RgbaImage) -> std::result::Result<(), EditError>; 6] = [
            |i| brightness(i, 1000.0).map(|_| ()),
            |i| contrast(i, 255.0).map(|_| ()),
            |i| contrast(i, -200.0).map(|_| ()),
            |i| saturation(i, 900.0).map(|_| ()),
            |i| sharpen(i).map(|_| ()),
            |i| enhance(i).map(|_| ()),
        ];
        // Channel bounds hold by construction of u8; alpha must be untouched.
        for run in runs {
            let mut image = original.clone();
            run(&mut image).unwrap();
            assert_alpha_preserved(&image, &original);
        }
    }

    #[test]
    fn transforms_chain() {
        let mut image = gradient(4, 4);
        let out = contrast(brightness(&mut image, 110.0).unwrap(), 10.0).unwrap();
        assert_eq!(out.dimensions(), (4, 4));
    }
}
