//! Editing session.
//!
//! An [`EditSession`] owns the working canvas, its undo history and the export
//! compression policy. Every successful [`EditOperation`] is followed by a
//! snapshot push, so the history always ends with what the canvas shows:
//!
//! ```text
//! apply(op) ─► transform canvas ─► push EncodedState
//! undo()    ─► history cursor back ─► decode into canvas
//! export()  ─► CompressionManager ─► EncodedImage
//! ```
//!
//! A rejected operation leaves both the canvas and the history untouched.

use crate::compression::CompressionManager;
use crate::config::EditorConfig;
use crate::encoding::{EncodedImage, EncodedState};
use crate::filters::find_filter;
use crate::history::EditHistory;
use crate::imaging::{Canvas, CropArea, EditError, ResampleFilter, Surface, adjust, geometry};
use crate::naming::file_name_for;
use crate::shortcuts::{KeyChord, KeyboardShortcuts};
use image::RgbaImage;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use std::str::FromStr;
use tracing::{info, warn};

/// A single editing step with its parameters.
#[derive(Debug, Clone, PartialEq)]
pub enum EditOperation {
    /// Percent; 100 leaves the image unchanged.
    Brightness(f32),
    /// -255..=255; 0 leaves the image unchanged.
    Contrast(f32),
    /// Percent; 100 unchanged, 0 greyscale.
    Saturation(f32),
    Sharpen,
    Enhance,
    /// Uniform scale factor.
    Resize(f64),
    /// Clockwise degrees.
    Rotate(f64),
    Crop(CropArea),
    /// Bake a catalog preset by id.
    Filter(String),
}

impl EditOperation {
    /// Matching entry id in [`EDIT_OPTIONS`](crate::filters::EDIT_OPTIONS).
    pub fn option_id(&self) -> &'static str {
        match self {
            Self::Brightness(_) => "brightness",
            Self::Contrast(_) => "contrast",
            Self::Saturation(_) => "saturation",
            Self::Sharpen => "sharpen",
            Self::Enhance => "enhance",
            Self::Resize(_) => "resize",
            Self::Rotate(_) => "rotate",
            Self::Crop(_) => "crop",
            Self::Filter(_) => "filters",
        }
    }
}

impl fmt::Display for EditOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Brightness(v) => write!(f, "brightness={v}"),
            Self::Contrast(v) => write!(f, "contrast={v}"),
            Self::Saturation(v) => write!(f, "saturation={v}"),
            Self::Sharpen => f.write_str("sharpen"),
            Self::Enhance => f.write_str("enhance"),
            Self::Resize(v) => write!(f, "resize={v}"),
            Self::Rotate(v) => write!(f, "rotate={v}"),
            Self::Crop(a) => write!(f, "crop={},{},{},{}", a.x, a.y, a.width, a.height),
            Self::Filter(id) => write!(f, "filter={id}"),
        }
    }
}

/// Parses `name` or `name=args`, e.g. `brightness=120`, `crop=0,0,64,48`,
/// `filter=vintage`, `sharpen`.
impl FromStr for EditOperation {
    type Err = EditError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = |why: &str| EditError::InvalidOperation(format!("'{s}': {why}"));
        let (name, arg) = match s.trim().split_once('=') {
            Some((name, arg)) => (name.trim(), Some(arg.trim())),
            None => (s.trim(), None),
        };
        let required = || arg.filter(|a| !a.is_empty()).ok_or_else(|| malformed("missing value"));
        let float = |text: &str| -> Result<f64, EditError> {
            text.parse::<f64>()
                .map_err(|_| malformed("value is not a number"))
        };

        let op = match name.to_lowercase().as_str() {
            "brightness" => Self::Brightness(float(required()?)? as f32),
            "contrast" => Self::Contrast(float(required()?)? as f32),
            "saturation" | "saturate" => Self::Saturation(float(required()?)? as f32),
            "resize" | "scale" => Self::Resize(float(required()?)?),
            "rotate" => Self::Rotate(float(required()?)?),
            "filter" => Self::Filter(required()?.to_string()),
            "crop" => {
                let parts = required()?
                    .split(',')
                    .map(|p| p.trim().parse::<u32>())
                    .collect::<Result<Vec<_>, _>>()
                    .map_err(|_| malformed("crop expects x,y,width,height as whole numbers"))?;
                match parts[..] {
                    [x, y, width, height] => Self::Crop(CropArea::new(x, y, width, height)),
                    _ => return Err(malformed("crop expects exactly four values")),
                }
            }
            "sharpen" | "enhance" if arg.is_some() => {
                return Err(malformed("takes no value"));
            }
            "sharpen" => Self::Sharpen,
            "enhance" => Self::Enhance,
            _ => return Err(malformed("unknown operation")),
        };
        Ok(op)
    }
}

/// Session-level commands reachable from keyboard shortcuts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShortcutAction {
    Undo,
    Redo,
    Reset,
    Enhance,
}

impl fmt::Display for ShortcutAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Undo => "undo",
            Self::Redo => "redo",
            Self::Reset => "reset",
            Self::Enhance => "enhance",
        })
    }
}

pub struct EditSession {
    canvas: Canvas,
    history: EditHistory,
    compression: CompressionManager,
    resample: ResampleFilter,
    file_prefix: String,
}

impl EditSession {
    /// Start editing `image`. The unedited image becomes history entry 0.
    pub fn new(image: RgbaImage, config: &EditorConfig) -> Result<Self, EditError> {
        let canvas = Canvas::new(image)?;
        let mut history = EditHistory::new();
        history.push_state(EncodedState::encode(canvas.image())?);
        info!(dims = %canvas.dimensions(), "editing session started");
        Ok(Self {
            canvas,
            history,
            compression: CompressionManager::new(config.compression),
            resample: config.resize.filter,
            file_prefix: config.export.file_prefix.clone(),
        })
    }

    /// Apply `op` to the canvas and record the result.
    pub fn apply(&mut self, op: &EditOperation) -> Result<(), EditError> {
        if let Err(e) = self.apply_to_canvas(op) {
            warn!(%op, error = %e, "edit rejected");
            return Err(e);
        }
        let state = match EncodedState::encode(self.canvas.image()) {
            Ok(state) => state,
            Err(e) => {
                warn!(%op, error = %e, "snapshot failed, rolling back edit");
                if let Err(rollback) = self.rollback() {
                    warn!(error = %rollback, "rollback failed");
                }
                return Err(e);
            }
        };
        self.history.push_state(state);
        info!(%op, dims = %self.canvas.dimensions(), "applied edit");
        Ok(())
    }

    /// Put the canvas back to the history's current entry.
    fn rollback(&mut self) -> Result<(), EditError> {
        if let Some(state) = self.history.current_state() {
            let image = state.decode()?;
            self.canvas.replace(image)?;
        }
        Ok(())
    }

    fn apply_to_canvas(&mut self, op: &EditOperation) -> Result<(), EditError> {
        match op {
            EditOperation::Brightness(v) => {
                adjust::brightness(self.canvas.image_mut(), *v)?;
            }
            EditOperation::Contrast(v) => {
                adjust::contrast(self.canvas.image_mut(), *v)?;
            }
            EditOperation::Saturation(v) => {
                adjust::saturation(self.canvas.image_mut(), *v)?;
            }
            EditOperation::Sharpen => {
                adjust::sharpen(self.canvas.image_mut())?;
            }
            EditOperation::Enhance => {
                adjust::enhance(self.canvas.image_mut())?;
            }
            EditOperation::Resize(scale) => {
                geometry::resize(&mut self.canvas, *scale, self.resample)?;
            }
            EditOperation::Rotate(degrees) => geometry::rotate(&mut self.canvas, *degrees)?,
            EditOperation::Crop(area) => {
                geometry::crop(&mut self.canvas, *area)?;
            }
            EditOperation::Filter(id) => {
                let preset = find_filter(id).ok_or_else(|| EditError::UnknownFilter(id.clone()))?;
                preset.chain()?.apply(self.canvas.image_mut())?;
            }
        }
        Ok(())
    }

    /// Step back one edit. `Ok(false)` when there is nothing to undo.
    pub fn undo(&mut self) -> Result<bool, EditError> {
        let state = self.history.undo().cloned();
        self.restore(state)
    }

    /// Re-apply an undone edit. `Ok(false)` when there is nothing to redo.
    pub fn redo(&mut self) -> Result<bool, EditError> {
        let state = self.history.redo().cloned();
        self.restore(state)
    }

    /// Go back to the original image, keeping the history.
    pub fn reset(&mut self) -> Result<bool, EditError> {
        let state = self.history.reset().cloned();
        self.restore(state)
    }

    fn restore(&mut self, state: Option<EncodedState>) -> Result<bool, EditError> {
        let Some(state) = state else {
            return Ok(false);
        };
        self.canvas.replace(state.decode()?)?;
        Ok(true)
    }

    /// Run a shortcut command. `Ok(false)` when it had nothing to do.
    pub fn run_shortcut(&mut self, action: ShortcutAction) -> Result<bool, EditError> {
        match action {
            ShortcutAction::Undo => self.undo(),
            ShortcutAction::Redo => self.redo(),
            ShortcutAction::Reset => self.reset(),
            ShortcutAction::Enhance => self.apply(&EditOperation::Enhance).map(|_| true),
        }
    }

    /// Encode the canvas for export under the current compression policy.
    pub fn export(&self) -> Result<EncodedImage, EditError> {
        self.compression.compress_if_needed(&self.canvas)
    }

    /// File name for an export in `encoded`'s format.
    pub fn export_file_name(&self, encoded: &EncodedImage) -> String {
        file_name_for(&self.file_prefix, encoded.format)
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    pub fn history(&self) -> &EditHistory {
        &self.history
    }

    pub fn compression(&self) -> &CompressionManager {
        &self.compression
    }

    pub fn compression_mut(&mut self) -> &mut CompressionManager {
        &mut self.compression
    }
}

impl fmt::Debug for EditSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EditSession")
            .field("canvas", &self.canvas)
            .field("history_len", &self.history.len())
            .field("cursor", &self.history.current_index())
            .field("compression", &self.compression.config())
            .finish()
    }
}

/// Register one handler per binding that runs the action on `session`.
///
/// Handlers cannot return errors, so failures are logged.
pub fn bind_shortcuts(
    session: &Rc<RefCell<EditSession>>,
    bindings: &[(ShortcutAction, KeyChord)],
    shortcuts: &mut KeyboardShortcuts,
) {
    for (action, chord) in bindings {
        let session = Rc::clone(session);
        let action = *action;
        shortcuts.register(chord, move || {
            if let Err(e) = session.borrow_mut().run_shortcut(action) {
                warn!(%action, error = %e, "shortcut failed");
            }
        });
    }
}
