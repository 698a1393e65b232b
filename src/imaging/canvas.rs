//! In-memory canvas, the production [`Surface`].
//!
//! | Surface call | Implementation |
//! |---|---|
//! | `snapshot` / `replace` | clone / swap the owned `RgbaImage` |
//! | `save` / `restore` | push / pop on a transform stack |
//! | `translate` / `rotate` | post-multiply the current [`Affine`] |
//! | `draw_image` | inverse-mapped bilinear sampling, source-over blend |
//!
//! Pixel transforms reach the backing store directly through
//! [`Canvas::image_mut`]; only geometric operations go through the transform
//! machinery.

use super::calculations::{Affine, clamp_channel};
use super::surface::{Dimensions, EditError, Surface, ensure_not_empty};
use image::{Rgba, RgbaImage};
use std::fmt;

/// Slack for destination pixels whose centres land exactly on a source edge
/// after floating-point rotation.
const EDGE_TOLERANCE: f64 = 1e-6;

pub struct Canvas {
    image: RgbaImage,
    transform: Affine,
    saved: Vec<Affine>,
}

impl Canvas {
    /// Wrap a decoded image. Zero-area images are rejected.
    pub fn new(image: RgbaImage) -> Result<Self, EditError> {
        ensure_not_empty(Dimensions::of(&image))?;
        Ok(Self {
            image,
            transform: Affine::IDENTITY,
            saved: Vec::new(),
        })
    }

    /// Fully transparent canvas.
    pub fn blank(width: u32, height: u32) -> Result<Self, EditError> {
        Self::new(RgbaImage::new(width, height))
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn image_mut(&mut self) -> &mut RgbaImage {
        &mut self.image
    }

    pub fn into_image(self) -> RgbaImage {
        self.image
    }

    /// Transform currently applied to `draw_image`.
    pub fn transform(&self) -> Affine {
        self.transform
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }
}

impl fmt::Debug for Canvas {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Canvas")
            .field("dimensions", &Dimensions::of(&self.image))
            .field("transform", &self.transform)
            .field("saved", &self.saved.len())
            .finish()
    }
}

impl Surface for Canvas {
    fn dimensions(&self) -> Dimensions {
        Dimensions::of(&self.image)
    }

    fn snapshot(&self) -> RgbaImage {
        self.image.clone()
    }

    fn replace(&mut self, image: RgbaImage) -> Result<(), EditError> {
        ensure_not_empty(Dimensions::of(&image))?;
        self.image = image;
        Ok(())
    }

    fn save(&mut self) {
        self.saved.push(self.transform);
    }

    fn restore(&mut self) {
        if let Some(transform) = self.saved.pop() {
            self.transform = transform;
        }
    }

    fn translate(&mut self, dx: f64, dy: f64) {
        self.transform = self.transform.translate(dx, dy);
    }

    fn rotate(&mut self, radians: f64) {
        self.transform = self.transform.rotate(radians);
    }

    fn draw_image(&mut self, source: &RgbaImage, dx: f64, dy: f64) {
        if source.width() == 0 || source.height() == 0 {
            return;
        }
        let Some(inverse) = self.transform.translate(dx, dy).invert() else {
            tracing::debug!("skipping draw under a singular transform");
            return;
        };
        let (src_w, src_h) = (source.width() as f64, source.height() as f64);

        for (x, y, pixel) in self.image.enumerate_pixels_mut() {
            let (u, v) = inverse.apply(x as f64 + 0.5, y as f64 + 0.5);
            if u < -EDGE_TOLERANCE
                || v < -EDGE_TOLERANCE
                || u >= src_w + EDGE_TOLERANCE
                || v >= src_h + EDGE_TOLERANCE
            {
                continue;
            }
            let sample = sample_bilinear(source, u - 0.5, v - 0.5);
            blend_over(pixel, sample);
        }
    }
}

/// Bilinear sample at continuous pixel index `(fx, fy)`, clamped to the edges.
fn sample_bilinear(image: &RgbaImage, fx: f64, fy: f64) -> [f32; 4] {
    let max_x = (image.width() - 1) as f64;
    let max_y = (image.height() - 1) as f64;
    let fx = fx.clamp(0.0, max_x);
    let fy = fy.clamp(0.0, max_y);

    let x0 = fx.floor();
    let y0 = fy.floor();
    let tx = (fx - x0) as f32;
    let ty = (fy - y0) as f32;
    let x0 = x0 as u32;
    let y0 = y0 as u32;
    let x1 = (x0 + 1).min(image.width() - 1);
    let y1 = (y0 + 1).min(image.height() - 1);

    let p00 = image.get_pixel(x0, y0).0;
    let p10 = image.get_pixel(x1, y0).0;
    let p01 = image.get_pixel(x0, y1).0;
    let p11 = image.get_pixel(x1, y1).0;

    let mut out = [0.0f32; 4];
    for c in 0..4 {
        let top = p00[c] as f32 * (1.0 - tx) + p10[c] as f32 * tx;
        let bottom = p01[c] as f32 * (1.0 - tx) + p11[c] as f32 * tx;
        out[c] = top * (1.0 - ty) + bottom * ty;
    }
    out
}

/// Porter-Duff source-over with straight (non-premultiplied) alpha.
fn blend_over(dst: &mut Rgba<u8>, src: [f32; 4]) {
    let src_a = src[3] / 255.0;
    if src_a <= 0.0 {
        return;
    }
    let dst_a = dst[3] as f32 / 255.0;
    let out_a = src_a + dst_a * (1.0 - src_a);
    for c in 0..3 {
        let value = (src[c] * src_a + dst[c] as f32 * dst_a * (1.0 - src_a)) / out_a;
        dst[c] = clamp_channel(value);
    }
    dst[3] = clamp_channel(out_a * 255.0);
}
