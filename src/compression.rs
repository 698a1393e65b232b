//! Export compression policy.
//!
//! [`CompressionManager`] decides how a finished canvas is encoded. With
//! auto-compress on, the canvas is written as JPEG at the configured level;
//! with it off, as lossless PNG. The manager holds no image semantics of its
//! own; it only picks the encoder and its quality.

use crate::encoding::{EncodedImage, encode_jpeg, encode_png};
use crate::imaging::{Canvas, CompressionLevel, EditError};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Snapshot of the policy settings. Also the `[compression]` config table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CompressionConfig {
    /// Encode exports lossily at `level`; lossless PNG when off.
    pub auto_compress: bool,
    /// Lossy quality, 0.1 (smallest) to 1.0 (best).
    pub level: f32,
}

impl Default for CompressionConfig {
    fn default() -> Self {
        Self {
            auto_compress: true,
            level: CompressionLevel::default().value(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct CompressionManager {
    auto_compress: bool,
    level: CompressionLevel,
}

impl CompressionManager {
    pub fn new(config: CompressionConfig) -> Self {
        Self {
            auto_compress: config.auto_compress,
            level: CompressionLevel::new(config.level),
        }
    }

    pub fn set_auto_compress(&mut self, enabled: bool) {
        self.auto_compress = enabled;
    }

    /// Set the lossy quality; clamped to `[0.1, 1.0]`.
    pub fn set_level(&mut self, level: f32) {
        self.level = CompressionLevel::new(level);
    }

    pub fn auto_compress(&self) -> bool {
        self.auto_compress
    }

    pub fn level(&self) -> CompressionLevel {
        self.level
    }

    pub fn config(&self) -> CompressionConfig {
        CompressionConfig {
            auto_compress: self.auto_compress,
            level: self.level.value(),
        }
    }

    /// Encode the canvas according to the current policy.
    pub fn compress_if_needed(&self, canvas: &Canvas) -> Result<EncodedImage, EditError> {
        let encoded = if self.auto_compress {
            encode_jpeg(canvas.image(), self.level)?
        } else {
            encode_png(canvas.image())?
        };
        debug!(
            format = %encoded.format,
            bytes = encoded.len(),
            level = self.level.value(),
            auto = self.auto_compress,
            "encoded canvas"
        );
        Ok(encoded)
    }
}

impl Default for CompressionManager {
    fn default() -> Self {
        Self::new(CompressionConfig::default())
    }
}
