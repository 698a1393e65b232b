//! Editor configuration module.
//!
//! Handles loading, validating, and merging `retouch.toml`. User values are
//! layered over the stock defaults, so a config file only needs the keys it
//! wants to change.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [compression]
//! auto_compress = true      # JPEG on export; false keeps lossless PNG
//! level = 0.8               # 0.1 - 1.0, maps to JPEG quality 10 - 100
//!
//! [export]
//! file_prefix = "image"     # Exported files are named {prefix}-{millis}.{ext}
//!
//! [resize]
//! filter = "triangle"       # nearest | triangle | catmull-rom | gaussian | lanczos3
//!
//! [shortcuts]
//! undo = "ctrl+z"
//! redo = "ctrl+shift+z"
//! reset = "ctrl+shift+r"
//! enhance = "ctrl+e"
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::compression::CompressionConfig;
use crate::imaging::{CompressionLevel, ResampleFilter};
use crate::naming::DEFAULT_PREFIX;
use crate::session::ShortcutAction;
use crate::shortcuts::KeyChord;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use thiserror::Error;

/// File name looked up by [`load_config`].
pub const CONFIG_FILE_NAME: &str = "retouch.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Editor configuration loaded from `retouch.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EditorConfig {
    /// Export compression policy.
    pub compression: CompressionConfig,
    /// Export naming.
    pub export: ExportSettings,
    /// Resampling used by resize.
    pub resize: ResizeSettings,
    /// Key chords for session commands.
    pub shortcuts: ShortcutSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExportSettings {
    /// Prefix of generated export file names.
    pub file_prefix: String,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            file_prefix: DEFAULT_PREFIX.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ResizeSettings {
    pub filter: ResampleFilter,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ShortcutSettings {
    pub undo: String,
    pub redo: String,
    pub reset: String,
    pub enhance: String,
}

impl Default for ShortcutSettings {
    fn default() -> Self {
        Self {
            undo: "ctrl+z".into(),
            redo: "ctrl+shift+z".into(),
            reset: "ctrl+shift+r".into(),
            enhance: "ctrl+e".into(),
        }
    }
}

impl ShortcutSettings {
    /// Parse every configured chord, paired with the action it triggers.
    pub fn bindings(&self) -> Result<Vec<(ShortcutAction, KeyChord)>, ConfigError> {
        [
            (ShortcutAction::Undo, &self.undo),
            (ShortcutAction::Redo, &self.redo),
            (ShortcutAction::Reset, &self.reset),
            (ShortcutAction::Enhance, &self.enhance),
        ]
        .into_iter()
        .map(|(action, text)| {
            text.parse::<KeyChord>()
                .map(|chord| (action, chord))
                .map_err(|e| ConfigError::Validation(format!("shortcuts.{action}: {e}")))
        })
        .collect()
    }
}

impl EditorConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let level = self.compression.level;
        if !(CompressionLevel::MIN..=CompressionLevel::MAX).contains(&level) {
            return Err(ConfigError::Validation(format!(
                "compression.level must be {}-{}, got {level}",
                CompressionLevel::MIN,
                CompressionLevel::MAX
            )));
        }

        let prefix = &self.export.file_prefix;
        if prefix.trim().is_empty() {
            return Err(ConfigError::Validation(
                "export.file_prefix must not be empty".into(),
            ));
        }
        if prefix.contains(['/', '\\']) {
            return Err(ConfigError::Validation(
                "export.file_prefix must not contain path separators".into(),
            ));
        }

        let mut seen: HashMap<String, ShortcutAction> = HashMap::new();
        for (action, chord) in self.shortcuts.bindings()? {
            if let Some(other) = seen.insert(chord.to_string(), action) {
                return Err(ConfigError::Validation(format!(
                    "shortcuts.{other} and shortcuts.{action} are both bound to {chord}"
                )));
            }
        }
        Ok(())
    }
}

/// Returns the stock default config as a `toml::Value::Table`.
///
/// The base layer that user overrides are merged onto.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(EditorConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Read a config file as a raw TOML value.
///
/// Returns `Ok(None)` if the file does not exist.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<EditorConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: EditorConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load `retouch.toml` from `dir`, falling back to the stock defaults when
/// the directory has none.
pub fn load_config(dir: &Path) -> Result<EditorConfig, ConfigError> {
    let overlay = load_raw_config(&dir.join(CONFIG_FILE_NAME))?;
    resolve_config(stock_defaults_value(), overlay)
}

/// Load an explicitly named config file. A missing file is an error.
pub fn load_config_file(path: &Path) -> Result<EditorConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let overlay: toml::Value = toml::from_str(&content)?;
    resolve_config(stock_defaults_value(), Some(overlay))
}

/// Returns a fully-commented stock `retouch.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Retouch Configuration
# =====================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
#
# retouch reads ./retouch.toml, or the file passed with --config.
# Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Export compression
# ---------------------------------------------------------------------------
[compression]
# Re-encode exports as JPEG. When false, exports are lossless PNG.
auto_compress = true
# Compression level between 0.1 and 1.0. Maps to JPEG quality 10-100.
# Higher keeps more detail and produces larger files.
level = 0.8

# ---------------------------------------------------------------------------
# Export naming
# ---------------------------------------------------------------------------
[export]
# Exported files are written as {file_prefix}-{unix millis}.{png|jpg}
file_prefix = "image"

# ---------------------------------------------------------------------------
# Resize
# ---------------------------------------------------------------------------
[resize]
# Resampling filter: nearest, triangle, catmull-rom, gaussian, lanczos3
filter = "triangle"

# ---------------------------------------------------------------------------
# Keyboard shortcuts
# ---------------------------------------------------------------------------
# Chords are modifiers joined with '+', then the key. Modifiers: ctrl, shift,
# alt, meta (aliases: control, option, cmd, command, super). Case-insensitive.
# The space bar is written as "space", e.g. "ctrl+space".
[shortcuts]
undo = "ctrl+z"
redo = "ctrl+shift+z"
reset = "ctrl+shift+r"
enhance = "ctrl+e"
"##
}
