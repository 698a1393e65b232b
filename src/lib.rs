//! # Retouch
//!
//! A small raster image editing engine. An image is loaded into a canvas,
//! edited with pixel adjustments, geometric operations and filter presets,
//! and exported as PNG or compressed JPEG. Every edit is snapshotted so it can
//! be undone, redone or reset, and session commands can be bound to keyboard
//! chords.
//!
//! # Architecture
//!
//! ```text
//! RgbaImage ─► Canvas ─► adjust / geometry / filters ─► Canvas
//!                 │                                        │
//!                 └──── EncodedState ─► EditHistory ◄──────┘
//!                                                          │
//!                          CompressionManager ◄────────────┘ ─► PNG / JPEG bytes
//!
//! KeyboardShortcuts: chord ─► undo | redo | reset | enhance on the session
//! ```
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`imaging`] | Canvas, pixel adjustments, resize/rotate/crop, shared parameter types |
//! | [`filters`] | Filter preset and edit-option catalogs; filter-chain parsing and baking |
//! | [`history`] | Linear undo/redo/reset history of encoded snapshots |
//! | [`shortcuts`] | Key chords and the chord → handler dispatch table |
//! | [`compression`] | Export policy: JPEG at a quality level, or lossless PNG |
//! | [`encoding`] | PNG/JPEG encoders and base64 data URIs |
//! | [`naming`] | Export file names, MIME checks, file size formatting |
//! | [`session`] | Ties canvas, history and compression into one editing session |
//! | [`config`] | `retouch.toml` loading, merging over stock defaults, validation |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Snapshots Are Lossless
//!
//! History entries are PNG data URIs. Undoing never degrades the image, and
//! only export applies lossy compression.
//!
//! ## Rotation Clips
//!
//! Rotating keeps the canvas size. Corners that leave the canvas are lost and
//! the uncovered area keeps its previous pixels, which matches how a 2D canvas
//! draws a rotated copy of itself.
//!
//! ## Surface Trait
//!
//! Geometric operations talk to an [`imaging::Surface`], not to a pixel buffer
//! directly. [`imaging::Canvas`] is the real implementation; tests use a
//! recording mock to check the sequence of save/translate/rotate/draw calls.
//!
//! ## Single-Threaded
//!
//! Everything runs synchronously on the caller's thread. Shortcut handlers may
//! capture `Rc<RefCell<_>>` session handles, so the shortcut table is `!Send`.

pub mod compression;
pub mod config;
pub mod encoding;
pub mod filters;
pub mod history;
pub mod imaging;
pub mod naming;
pub mod output;
pub mod session;
pub mod shortcuts;

#[cfg(test)]
pub(crate) mod test_helpers;

pub use compression::{CompressionConfig, CompressionManager};
pub use config::{ConfigError, EditorConfig};
pub use encoding::{EncodedImage, EncodedState, ExportFormat};
pub use history::EditHistory;
pub use imaging::{Canvas, CropArea, EditError};
pub use session::{EditOperation, EditSession, ShortcutAction};
pub use shortcuts::{KeyChord, KeyEvent, KeyboardShortcuts};
