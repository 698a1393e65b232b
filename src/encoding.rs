//! Encoded representations of the working image.
//!
//! Two kinds of encoded output leave the editing core:
//!
//! - [`EncodedState`]: a lossless PNG snapshot stored as a `data:` URI. This
//!   is the unit kept in the edit history. Once created it is immutable, so
//!   later in-place edits of the working buffer can never reach a past entry.
//! - [`EncodedImage`]: raw encoded bytes for export, in whatever format the
//!   compression policy picked.

use crate::imaging::{CompressionLevel, EditError};
use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::{DynamicImage, RgbaImage};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Output container format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Png,
    Jpeg,
}

impl ExportFormat {
    pub fn mime_type(self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpg",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Encoded bytes plus the format they are in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedImage {
    pub format: ExportFormat,
    pub bytes: Vec<u8>,
}

impl EncodedImage {
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// `data:<mime>;base64,<payload>`
    pub fn to_data_uri(&self) -> String {
        format!(
            "data:{};base64,{}",
            self.format.mime_type(),
            BASE64.encode(&self.bytes)
        )
    }
}

/// Lossless PNG encoding.
pub fn encode_png(image: &RgbaImage) -> Result<EncodedImage, EditError> {
    let mut bytes = Vec::new();
    image
        .write_with_encoder(PngEncoder::new(&mut bytes))
        .map_err(|e| EditError::Encode(format!("PNG: {e}")))?;
    Ok(EncodedImage {
        format: ExportFormat::Png,
        bytes,
    })
}

/// Lossy JPEG encoding at `level`. JPEG has no alpha channel, so alpha is
/// dropped.
pub fn encode_jpeg(image: &RgbaImage, level: CompressionLevel) -> Result<EncodedImage, EditError> {
    let rgb = DynamicImage::ImageRgba8(image.clone()).to_rgb8();
    let mut bytes = Vec::new();
    rgb.write_with_encoder(JpegEncoder::new_with_quality(&mut bytes, level.quality()))
        .map_err(|e| EditError::Encode(format!("JPEG: {e}")))?;
    Ok(EncodedImage {
        format: ExportFormat::Jpeg,
        bytes,
    })
}

/// Split a base64 `data:` URI into its MIME type and payload.
pub fn split_data_uri(uri: &str) -> Result<(&str, &str), EditError> {
    let rest = uri
        .strip_prefix("data:")
        .ok_or_else(|| EditError::Decode("not a data: URI".into()))?;
    let (header, payload) = rest
        .split_once(',')
        .ok_or_else(|| EditError::Decode("data: URI has no payload separator".into()))?;
    let mime = header
        .strip_suffix(";base64")
        .ok_or_else(|| EditError::Decode("data: URI is not base64 encoded".into()))?;
    Ok((mime, payload))
}

/// Decode the base64 payload of a `data:` URI.
pub fn decode_data_uri(uri: &str) -> Result<Vec<u8>, EditError> {
    let (_, payload) = split_data_uri(uri)?;
    BASE64
        .decode(payload)
        .map_err(|e| EditError::Decode(format!("base64: {e}")))
}

/// Immutable lossless snapshot of the working image, held as a PNG `data:` URI.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EncodedState(String);

impl EncodedState {
    /// Snapshot `image`.
    pub fn encode(image: &RgbaImage) -> Result<Self, EditError> {
        Ok(Self(encode_png(image)?.to_data_uri()))
    }

    /// Wrap an existing data URI after checking its shape.
    pub fn from_data_uri(uri: impl Into<String>) -> Result<Self, EditError> {
        let uri = uri.into();
        split_data_uri(&uri)?;
        Ok(Self(uri))
    }

    /// Decode back into pixels.
    pub fn decode(&self) -> Result<RgbaImage, EditError> {
        let bytes = decode_data_uri(&self.0)?;
        let image = image::load_from_memory(&bytes)
            .map_err(|e| EditError::Decode(format!("snapshot: {e}")))?;
        Ok(image.to_rgba8())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Size of the encoded payload in bytes (after base64 decoding).
    pub fn payload_len(&self) -> Result<usize, EditError> {
        decode_data_uri(&self.0).map(|bytes| bytes.len())
    }
}

impl fmt::Debug for EncodedState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const PREVIEW: usize = 48;
        match self.0.get(..PREVIEW) {
            Some(head) if self.0.len() > PREVIEW => {
                write!(f, "EncodedState({head}… {} chars)", self.0.len())
            }
            _ => write!(f, "EncodedState({})", self.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::*;

    #[test]
    fn state_round_trip_is_lossless() {
        let image = noise(13, 7, 2);
        let state = EncodedState::encode(&image).unwrap();
        assert!(state.as_str().starts_with("data:image/png;base64,"));
        assert_eq!(state.decode().unwrap(), image);
    }

    #[test]
    fn state_keeps_transparency() {
        let image = solid(3, 3, [10, 20, 30, 40]);
        let state = EncodedState::encode(&image).unwrap();
        assert_eq!(state.decode().unwrap().get_pixel(1, 1).0, [10, 20, 30, 40]);
    }

    #[test]
    fn snapshot_is_detached_from_later_edits() {
        let mut image = gradient(4, 4);
        let state = EncodedState::encode(&image).unwrap();
        let original = image.clone();
        image.get_pixel_mut(0, 0).0 = [1, 2, 3, 4];
        assert_eq!(state.decode().unwrap(), original);
    }

    #[test]
    fn payload_len_matches_png_bytes() {
        let image = gradient(8, 8);
        let png = encode_png(&image).unwrap();
        let state = EncodedState::encode(&image).unwrap();
        assert_eq!(state.payload_len().unwrap(), png.len());
    }

    #[test]
    fn jpeg_export_has_jpeg_magic() {
        let jpeg = encode_jpeg(&gradient(16, 16), CompressionLevel::new(0.5)).unwrap();
        assert_eq!(jpeg.format, ExportFormat::Jpeg);
        assert_eq!(&jpeg.bytes[..2], &[0xFF, 0xD8]);
        assert!(jpeg.to_data_uri().starts_with("data:image/jpeg;base64,"));
    }

    #[test]
    fn split_data_uri_rejects_malformed_input() {
        assert!(split_data_uri("image/png;base64,AAAA").is_err());
        assert!(split_data_uri("data:image/png;base64").is_err());
        assert!(split_data_uri("data:image/png,AAAA").is_err());
        assert_eq!(
            split_data_uri("data:image/png;base64,AAAA").unwrap(),
            ("image/png", "AAAA")
        );
    }

    #[test]
    fn from_data_uri_validates_shape() {
        assert!(EncodedState::from_data_uri("hello").is_err());
        assert!(EncodedState::from_data_uri("data:image/png;base64,").is_ok());
    }

    #[test]
    fn garbage_payload_fails_to_decode() {
        let state = EncodedState::from_data_uri("data:image/png;base64,AAAA").unwrap();
        assert!(matches!(state.decode(), Err(EditError::Decode(_))));
    }

    #[test]
    fn debug_truncates_long_uris() {
        let state = EncodedState::encode(&gradient(8, 8)).unwrap();
        let out = format!("{state:?}");
        assert!(out.starts_with("EncodedState(data:image/png;base64,"));
        assert!(out.len() < state.as_str().len());
    }
}
