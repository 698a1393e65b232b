//! Static catalogs: filter presets and the edit-operation menu.
//!
//! Presets are data, not code. Each [`FilterOption`] carries its chain as a
//! CSS-filter-style string (`"sepia(50%) contrast(120%) brightness(90%)"`) so
//! the catalog can be listed, serialized and shown as a preview label without
//! touching any pixels. [`FilterChain`] parses such a string into
//! [`FilterFunction`]s and can bake it into a buffer when exporting.
//!
//! ## Chain syntax
//!
//! Whitespace-separated `name(argument)` calls, or the single word `none`.
//!
//! | Function | Argument | Effect |
//! |---|---|---|
//! | `grayscale` | `%` or number (1 = 100%) | blend toward luminance |
//! | `sepia` | `%` or number | blend toward sepia tone |
//! | `saturate` | `%` or number | scale chroma |
//! | `hue-rotate` | `deg` | rotate hue |
//! | `invert` | `%` or number | blend toward the negative |
//! | `brightness` | `%` or number | multiply |
//! | `contrast` | `%` or number | scale about mid-grey |
//! | `blur` | `px` | Gaussian blur, sigma in pixels |
//!
//! Colour matrices follow the CSS Filter Effects definitions.

use crate::imaging::calculations::clamp_channel;
use crate::imaging::surface::ensure_not_empty;
use crate::imaging::{Dimensions, EditError};
use image::{RgbaImage, imageops};
use serde::Serialize;
use std::fmt;

/// A named preset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FilterOption {
    pub id: &'static str,
    pub display_name: &'static str,
    pub filter_chain: &'static str,
}

impl FilterOption {
    pub fn chain(&self) -> Result<FilterChain, EditError> {
        FilterChain::parse(self.filter_chain)
    }
}

/// An entry in the edit-operation menu. Display metadata only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EditOption {
    pub id: &'static str,
    pub display_name: &'static str,
    pub accent_color: &'static str,
}

pub const FILTER_OPTIONS: &[FilterOption] = &[
    preset("normal", "Normal", "none"),
    preset("grayscale", "Black & White", "grayscale(100%)"),
    preset("sepia", "Sepia", "sepia(100%)"),
    preset("blur", "Blur", "blur(2px)"),
    preset("invert", "Invert", "invert(100%)"),
    preset("hue-rotate", "Hue Shift", "hue-rotate(90deg)"),
    preset(
        "vintage",
        "Vintage",
        "sepia(50%) contrast(120%) brightness(90%)",
    ),
    preset(
        "dramatic",
        "Dramatic",
        "contrast(150%) brightness(80%) saturate(120%)",
    ),
    preset(
        "warm",
        "Warm",
        "sepia(30%) hue-rotate(30deg) brightness(110%)",
    ),
    preset(
        "cool",
        "Cool",
        "hue-rotate(180deg) saturate(80%) brightness(95%)",
    ),
    preset(
        "sharp",
        "Crisp",
        "contrast(130%) saturate(110%) brightness(105%)",
    ),
    preset(
        "soft",
        "Soft",
        "brightness(105%) contrast(90%) saturate(80%)",
    ),
];

pub const EDIT_OPTIONS: &[EditOption] = &[
    edit("crop", "Crop", "blue-500"),
    edit("resize", "Resize", "green-500"),
    edit("rotate", "Rotate", "purple-500"),
    edit("sharpen", "Sharpen", "orange-500"),
    edit("brightness", "Brightness", "yellow-500"),
    edit("contrast", "Contrast", "indigo-500"),
    edit("saturation", "Saturation", "pink-500"),
    edit("filters", "Filters", "red-500"),
    edit("enhance", "AI Enhancement", "purple-500/pink-500"),
];

const fn preset(
    id: &'static str,
    display_name: &'static str,
    filter_chain: &'static str,
) -> FilterOption {
    FilterOption {
        id,
        display_name,
        filter_chain,
    }
}

const fn edit(id: &'static str, display_name: &'static str, accent_color: &'static str) -> EditOption {
    EditOption {
        id,
        display_name,
        accent_color,
    }
}

pub fn find_filter(id: &str) -> Option<&'static FilterOption> {
    FILTER_OPTIONS.iter().find(|f| f.id == id)
}

pub fn find_edit_option(id: &str) -> Option<&'static EditOption> {
    EDIT_OPTIONS.iter().find(|e| e.id == id)
}

/// One step of a filter chain. Percent arguments are stored as fractions
/// (`120%` → `1.2`), hue rotation in degrees, blur radius in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "function", content = "amount", rename_all = "kebab-case")]
pub enum FilterFunction {
    Grayscale(f32),
    Sepia(f32),
    Saturate(f32),
    HueRotate(f32),
    Invert(f32),
    Brightness(f32),
    Contrast(f32),
    Blur(f32),
}

/// Value rounded for display, so `1.2 * 100` prints as `120`.
fn tidy(value: f32) -> f32 {
    (value * 1000.0).round() / 1000.0
}

impl fmt::Display for FilterFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::Grayscale(a) => write!(f, "grayscale({}%)", tidy(a * 100.0)),
            Self::Sepia(a) => write!(f, "sepia({}%)", tidy(a * 100.0)),
            Self::Saturate(a) => write!(f, "saturate({}%)", tidy(a * 100.0)),
            Self::HueRotate(deg) => write!(f, "hue-rotate({}deg)", tidy(deg)),
            Self::Invert(a) => write!(f, "invert({}%)", tidy(a * 100.0)),
            Self::Brightness(a) => write!(f, "brightness({}%)", tidy(a * 100.0)),
            Self::Contrast(a) => write!(f, "contrast({}%)", tidy(a * 100.0)),
            Self::Blur(px) => write!(f, "blur({}px)", tidy(px)),
        }
    }
}

type Matrix = [[f32; 3]; 3];

impl FilterFunction {
    fn parse(token: &str) -> Result<Self, EditError> {
        let malformed = |why: &str| EditError::InvalidFilter(format!("'{token}': {why}"));
        let (name, rest) = token
            .split_once('(')
            .ok_or_else(|| malformed("expected name(argument)"))?;
        let arg = rest
            .strip_suffix(')')
            .ok_or_else(|| malformed("missing closing parenthesis"))?
            .trim();

        let number = |text: &str| -> Result<f32, EditError> {
            let value: f32 = text
                .trim()
                .parse()
                .map_err(|_| malformed("argument is not a number"))?;
            if !value.is_finite() {
                return Err(malformed("argument must be finite"));
            }
            Ok(value)
        };
        let amount = || -> Result<f32, EditError> {
            let value = match arg.strip_suffix('%') {
                Some(pct) => number(pct)? / 100.0,
                None => number(arg)?,
            };
            if value < 0.0 {
                return Err(malformed("argument must not be negative"));
            }
            Ok(value)
        };

        match name {
            "grayscale" => Ok(Self::Grayscale(amount()?.min(1.0))),
            "sepia" => Ok(Self::Sepia(amount()?.min(1.0))),
            "invert" => Ok(Self::Invert(amount()?.min(1.0))),
            "saturate" => Ok(Self::Saturate(amount()?)),
            "brightness" => Ok(Self::Brightness(amount()?)),
            "contrast" => Ok(Self::Contrast(amount()?)),
            "hue-rotate" => {
                let degrees = match arg.strip_suffix("deg") {
                    Some(deg) => number(deg)?,
                    None => {
                        if number(arg)? != 0.0 {
                            return Err(malformed("hue-rotate needs a deg unit"));
                        }
                        0.0
                    }
                };
                Ok(Self::HueRotate(degrees))
            }
            "blur" => {
                let px = match arg.strip_suffix("px") {
                    Some(px) => number(px)?,
                    None => {
                        if number(arg)? != 0.0 {
                            return Err(malformed("blur needs a px unit"));
                        }
                        0.0
                    }
                };
                if px < 0.0 {
                    return Err(malformed("blur radius must not be negative"));
                }
                Ok(Self::Blur(px))
            }
            _ => Err(malformed("unknown filter function")),
        }
    }

    fn matrix(self) -> Option<Matrix> {
        match self {
            Self::Grayscale(a) => {
                let s = 1.0 - a;
                Some([
                    [0.2126 + 0.7874 * s, 0.7152 - 0.7152 * s, 0.0722 - 0.0722 * s],
                    [0.2126 - 0.2126 * s, 0.7152 + 0.2848 * s, 0.0722 - 0.0722 * s],
                    [0.2126 - 0.2126 * s, 0.7152 - 0.7152 * s, 0.0722 + 0.9278 * s],
                ])
            }
            Self::Sepia(a) => {
                let s = 1.0 - a;
                Some([
                    [0.393 + 0.607 * s, 0.769 - 0.769 * s, 0.189 - 0.189 * s],
                    [0.349 - 0.349 * s, 0.686 + 0.314 * s, 0.168 - 0.168 * s],
                    [0.272 - 0.272 * s, 0.534 - 0.534 * s, 0.131 + 0.869 * s],
                ])
            }
            Self::Saturate(s) => Some([
                [0.213 + 0.787 * s, 0.715 - 0.715 * s, 0.072 - 0.072 * s],
                [0.213 - 0.213 * s, 0.715 + 0.285 * s, 0.072 - 0.072 * s],
                [0.213 - 0.213 * s, 0.715 - 0.715 * s, 0.072 + 0.928 * s],
            ]),
            Self::HueRotate(degrees) => {
                let (sin, cos) = degrees.to_radians().sin_cos();
                Some([
                    [
                        0.213 + cos * 0.787 - sin * 0.213,
                        0.715 - cos * 0.715 - sin * 0.715,
                        0.072 - cos * 0.072 + sin * 0.928,
                    ],
                    [
                        0.213 - cos * 0.213 + sin * 0.143,
                        0.715 + cos * 0.285 + sin * 0.140,
                        0.072 - cos * 0.072 - sin * 0.283,
                    ],
                    [
                        0.213 - cos * 0.213 - sin * 0.787,
                        0.715 - cos * 0.715 + sin * 0.715,
                        0.072 + cos * 0.928 + sin * 0.072,
                    ],
                ])
            }
            _ => None,
        }
    }

    /// Per-channel linear transfer `c' = slope·c + intercept`, if this is one.
    fn transfer(self) -> Option<(f32, f32)> {
        match self {
            Self::Brightness(a) => Some((a, 0.0)),
            Self::Contrast(a) => Some((a, (0.5 - 0.5 * a) * 255.0)),
            Self::Invert(a) => Some((1.0 - 2.0 * a, a * 255.0)),
            _ => None,
        }
    }

    fn apply(self, image: &mut RgbaImage) {
        if let Self::Blur(px) = self {
            if px > 0.0 {
                *image = imageops::blur(&*image, px);
            }
            return;
        }
        if let Some(m) = self.matrix() {
            for pixel in image.pixels_mut() {
                let [r, g, b, _] = pixel.0.map(f32::from);
                for (c, row) in m.iter().enumerate() {
                    pixel[c] = clamp_channel(row[0] * r + row[1] * g + row[2] * b);
                }
            }
        } else if let Some((slope, intercept)) = self.transfer() {
            for pixel in image.pixels_mut() {
                for c in 0..3 {
                    pixel[c] = clamp_channel(slope * pixel[c] as f32 + intercept);
                }
            }
        }
    }
}

/// Parsed filter chain, applied left to right.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(transparent)]
pub struct FilterChain(Vec<FilterFunction>);

impl FilterChain {
    pub fn parse(text: &str) -> Result<Self, EditError> {
        let text = text.trim();
        if text.is_empty() || text == "none" {
            return Ok(Self::default());
        }
        text.split_whitespace()
            .map(FilterFunction::parse)
            .collect::<Result<Vec<_>, _>>()
            .map(Self)
    }

    pub fn functions(&self) -> &[FilterFunction] {
        &self.0
    }

    pub fn is_identity(&self) -> bool {
        self.0.is_empty()
    }

    /// Bake the chain into `image`. Only `blur` touches alpha; it blurs all
    /// four channels, the other functions leave alpha unchanged.
    pub fn apply<'a>(&self, image: &'a mut RgbaImage) -> Result<&'a mut RgbaImage, EditError> {
        ensure_not_empty(Dimensions::of(image))?;
        for function in &self.0 {
            function.apply(image);
        }
        Ok(image)
    }
}

impl fmt::Display for FilterChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return f.write_str("none");
        }
        for (i, function) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{function}")?;
        }
        Ok(())
    }
}
