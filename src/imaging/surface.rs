//! Drawing surface trait and shared types.
//!
//! The [`Surface`] trait is the mutable 2D raster target that geometric
//! operations work against. It exposes just enough of a canvas-style API for
//! resize, rotate, and crop: read the current pixels, swap in a new backing
//! store, and draw under a scoped transform.
//!
//! The production implementation is [`Canvas`](super::canvas::Canvas). Tests
//! use a recording mock so the call discipline of each operation can be
//! asserted without touching pixels.

use super::params::CropArea;
use image::RgbaImage;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EditError {
    #[error("Buffer has no pixels ({width}x{height})")]
    EmptyBuffer { width: u32, height: u32 },
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
    #[error("Crop area {area} exceeds surface bounds {width}x{height}")]
    CropOutOfBounds {
        area: CropArea,
        width: u32,
        height: u32,
    },
    #[error("Crop area {0} has no pixels")]
    EmptyCrop(CropArea),
    #[error("Unknown filter preset: {0}")]
    UnknownFilter(String),
    #[error("Malformed filter chain: {0}")]
    InvalidFilter(String),
    #[error("Malformed edit operation: {0}")]
    InvalidOperation(String),
    #[error("Encoding failed: {0}")]
    Encode(String),
    #[error("Decoding failed: {0}")]
    Decode(String),
}

/// Width and height of a surface or buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    pub fn of(image: &RgbaImage) -> Self {
        Self {
            width: image.width(),
            height: image.height(),
        }
    }

    pub fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }
}

impl std::fmt::Display for Dimensions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Fail fast on a zero-area buffer.
pub(crate) fn ensure_not_empty(dims: Dimensions) -> Result<(), EditError> {
    if dims.is_empty() {
        return Err(EditError::EmptyBuffer {
            width: dims.width,
            height: dims.height,
        });
    }
    Ok(())
}

/// A resizable drawing target.
///
/// Transform calls (`translate`, `rotate`) compose onto the current transform,
/// which only affects `draw_image`. `save` pushes the current transform and
/// `restore` pops it, so operations can scope their changes.
pub trait Surface {
    /// Current width and height.
    fn dimensions(&self) -> Dimensions;

    /// Copy of the current contents.
    fn snapshot(&self) -> RgbaImage;

    /// Replace the backing store, taking on the new image's dimensions.
    fn replace(&mut self, image: RgbaImage) -> Result<(), EditError>;

    /// Push the current transform.
    fn save(&mut self);

    /// Pop back to the most recently saved transform. No-op when nothing was saved.
    fn restore(&mut self);

    /// Move the origin by `(dx, dy)` in the current coordinate system.
    fn translate(&mut self, dx: f64, dy: f64);

    /// Rotate the coordinate system clockwise by `radians`.
    fn rotate(&mut self, radians: f64);

    /// Draw `image` with its top-left corner at `(dx, dy)` under the current
    /// transform, compositing source-over onto the existing contents.
    fn draw_image(&mut self, image: &RgbaImage, dx: f64, dy: f64);
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use std::cell::RefCell;

    /// Surface that records calls without doing any pixel work.
    pub struct MockSurface {
        pub dims: Dimensions,
        pub calls: RefCell<Vec<RecordedCall>>,
    }

    #[derive(Debug, Clone, PartialEq)]
    pub enum RecordedCall {
        Snapshot,
        Replace { width: u32, height: u32 },
        Save,
        Restore,
        Translate(f64, f64),
        Rotate(f64),
        DrawImage {
            width: u32,
            height: u32,
            dx: f64,
            dy: f64,
        },
    }

    impl MockSurface {
        pub fn new(width: u32, height: u32) -> Self {
            Self {
                dims: Dimensions { width, height },
                calls: RefCell::new(Vec::new()),
            }
        }

        pub fn get_calls(&self) -> Vec<RecordedCall> {
            self.calls.borrow().clone()
        }

        fn record(&self, call: RecordedCall) {
            self.calls.borrow_mut().push(call);
        }
    }

    impl Surface for MockSurface {
        fn dimensions(&self) -> Dimensions {
            self.dims
        }

        fn snapshot(&self) -> RgbaImage {
            self.record(RecordedCall::Snapshot);
            RgbaImage::new(self.dims.width, self.dims.height)
        }

        fn replace(&mut self, image: RgbaImage) -> Result<(), EditError> {
            let dims = Dimensions::of(&image);
            ensure_not_empty(dims)?;
            self.record(RecordedCall::Replace {
                width: dims.width,
                height: dims.height,
            });
            self.dims = dims;
            Ok(())
        }

        fn save(&mut self) {
            self.record(RecordedCall::Save);
        }

        fn restore(&mut self) {
            self.record(RecordedCall::Restore);
        }

        fn translate(&mut self, dx: f64, dy: f64) {
            self.record(RecordedCall::Translate(dx, dy));
        }

        fn rotate(&mut self, radians: f64) {
            self.record(RecordedCall::Rotate(radians));
        }

        fn draw_image(&mut self, image: &RgbaImage, dx: f64, dy: f64) {
            self.record(RecordedCall::DrawImage {
                width: image.width(),
                height: image.height(),
                dx,
                dy,
            });
        }
    }

    #[test]
    fn mock_records_replace_and_adopts_dimensions() {
        let mut surface = MockSurface::new(10, 20);
        surface.replace(RgbaImage::new(4, 5)).unwrap();

        assert_eq!(
            surface.dimensions(),
            Dimensions {
                width: 4,
                height: 5
            }
        );
        assert_eq!(
            surface.get_calls(),
            vec![RecordedCall::Replace {
                width: 4,
                height: 5
            }]
        );
    }

    #[test]
    fn mock_rejects_empty_replacement() {
        let mut surface = MockSurface::new(10, 20);
        let err = surface.replace(RgbaImage::new(0, 5)).unwrap_err();
        assert!(matches!(err, EditError::EmptyBuffer { width: 0, height: 5 }));
        assert!(surface.get_calls().is_empty());
    }

    #[test]
    fn dimensions_display_and_emptiness() {
        let dims = Dimensions {
            width: 640,
            height: 0,
        };
        assert_eq!(dims.to_string(), "640x0");
        assert!(dims.is_empty());
        assert!(ensure_not_empty(dims).is_err());
    }
}
