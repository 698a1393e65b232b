//! Shared test utilities for the retouch test suite.
//!
//! Provides deterministic fixture images and pixel-level assertions that work
//! on plain `RgbaImage` buffers.
//!
//! # Usage
//!
//! ```text
//! use crate::test_helpers::*;
//!
//! let mut image = gradient(8, 8);
//! let before = image.clone();
//! brightness(&mut image, 100.0).unwrap();
//! assert_images_close(&image, &before, 0);
//! ```

use image::{Rgba, RgbaImage};

// =========================================================================
// Fixture images
// =========================================================================

/// Every pixel set to `rgba`.
pub fn solid(width: u32, height: u32, rgba: [u8; 4]) -> RgbaImage {
    RgbaImage::from_pixel(width, height, Rgba(rgba))
}

/// Smooth, fully opaque colour ramp. Red follows x, green follows y, blue
/// follows the diagonal, so neighbouring pixels always differ.
pub fn gradient(width: u32, height: u32) -> RgbaImage {
    RgbaImage::from_fn(width, height, |x, y| {
        let r = (x * 255 / width.max(2).saturating_sub(1)).min(255) as u8;
        let g = (y * 255 / height.max(2).saturating_sub(1)).min(255) as u8;
        let b = ((x + y) * 255 / (width + height).max(2).saturating_sub(1)).min(255) as u8;
        Rgba([r, g, b, 255])
    })
}

/// Pseudo-random texture from a fixed LCG. Hard to compress, which makes
/// encoder size comparisons meaningful.
pub fn noise(width: u32, height: u32, seed: u32) -> RgbaImage {
    let mut state = seed.wrapping_mul(2_654_435_761).wrapping_add(1);
    RgbaImage::from_fn(width, height, |_, _| {
        let mut next = || {
            state = state.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
            (state >> 24) as u8
        };
        Rgba([next(), next(), next(), 255])
    })
}

/// Single distinct pixel per position so geometry tests can track where each
/// one ends up.
pub fn numbered(width: u32, height: u32) -> RgbaImage {
    RgbaImage::from_fn(width, height, |x, y| {
        Rgba([(x * 16) as u8, (y * 16) as u8, 100, 255])
    })
}

// =========================================================================
// Assertions
// =========================================================================

/// Same dimensions and every channel within `tolerance`. Panics with the
/// first differing pixel.
pub fn assert_images_close(actual: &RgbaImage, expected: &RgbaImage, tolerance: u8) {
    assert_eq!(
        actual.dimensions(),
        expected.dimensions(),
        "dimension mismatch"
    );
    for (x, y, a) in actual.enumerate_pixels() {
        let e = expected.get_pixel(x, y);
        let close = a
            .0
            .iter()
            .zip(e.0.iter())
            .all(|(&ac, &ec)| ac.abs_diff(ec) <= tolerance);
        assert!(
            close,
            "pixel ({x}, {y}) differs: got {:?}, expected {:?} (tolerance {tolerance})",
            a.0, e.0
        );
    }
}

/// Alpha channel of every pixel unchanged.
pub fn assert_alpha_preserved(actual: &RgbaImage, expected: &RgbaImage) {
    for (x, y, a) in actual.enumerate_pixels() {
        assert_eq!(
            a[3],
            expected.get_pixel(x, y)[3],
            "alpha changed at ({x}, {y})"
        );
    }
}

/// Pixels on the one-pixel frame of the image.
pub fn border_pixels(image: &RgbaImage) -> Vec<(u32, u32, Rgba<u8>)> {
    let (w, h) = image.dimensions();
    image
        .enumerate_pixels()
        .filter(|(x, y, _)| *x == 0 || *y == 0 || *x == w - 1 || *y == h - 1)
        .map(|(x, y, p)| (x, y, *p))
        .collect()
}
