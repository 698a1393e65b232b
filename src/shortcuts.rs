//! Keyboard shortcut dispatch.
//!
//! A [`KeyboardShortcuts`] table maps normalized key chords to zero-argument
//! handlers. It knows nothing about images; the editing shell registers
//! closures that call into the session.
//!
//! ## Chord normalization
//!
//! A chord is written as the pressed modifiers in a fixed order followed by
//! the lowercase key:
//!
//! ```text
//! ctrl+shift+alt+meta+<key>
//! ```
//!
//! Only the modifiers that are held appear, so `Ctrl+Z` is `ctrl+z` and
//! `Shift+Ctrl+Z` is `ctrl+shift+z`. Parsing accepts modifiers in any order
//! and case, plus the aliases `control`, `option`, `cmd`, `command` and
//! `super`.
//!
//! Registering the same chord twice replaces the first handler. Two different
//! chords that should trigger the same action must each be registered.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use tracing::{debug, trace};

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ChordError {
    #[error("Key chord is empty")]
    Empty,
    #[error("Key chord '{chord}' has no key after the modifiers")]
    MissingKey { chord: String },
    #[error("Unknown modifier '{modifier}' in key chord '{chord}'")]
    UnknownModifier { modifier: String, chord: String },
}

/// Modifier flags plus a base key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyChord {
    pub ctrl: bool,
    pub shift: bool,
    pub alt: bool,
    pub meta: bool,
    key: String,
}

impl KeyChord {
    /// Chord with no modifiers. The key is normalized by [`normalize_key`].
    pub fn new(key: &str) -> Self {
        Self {
            ctrl: false,
            shift: false,
            alt: false,
            meta: false,
            key: normalize_key(key),
        }
    }

    pub fn ctrl(mut self) -> Self {
        self.ctrl = true;
        self
    }

    pub fn shift(mut self) -> Self {
        self.shift = true;
        self
    }

    pub fn alt(mut self) -> Self {
        self.alt = true;
        self
    }

    pub fn meta(mut self) -> Self {
        self.meta = true;
        self
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// The chord a key event represents.
    pub fn from_event(event: &KeyEvent) -> Self {
        Self {
            ctrl: event.ctrl,
            shift: event.shift,
            alt: event.alt,
            meta: event.meta,
            key: normalize_key(&event.key),
        }
    }
}

/// Lowercased key name. The space bar is spelled `space` so it survives
/// chord strings, which are trimmed when parsed.
pub fn normalize_key(key: &str) -> String {
    match key {
        " " => "space".to_string(),
        k if k.eq_ignore_ascii_case("spacebar") => "space".to_string(),
        k => k.to_lowercase(),
    }
}

impl fmt::Display for KeyChord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let flags = [
            (self.ctrl, "ctrl"),
            (self.shift, "shift"),
            (self.alt, "alt"),
            (self.meta, "meta"),
        ];
        for (_, name) in flags.iter().filter(|(held, _)| *held) {
            write!(f, "{name}+")?;
        }
        f.write_str(&self.key)
    }
}

impl FromStr for KeyChord {
    type Err = ChordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(ChordError::Empty);
        }
        // The plus key itself: "+" or "ctrl++".
        let (modifiers, key) = if trimmed == "+" {
            ("", "+")
        } else if let Some(prefix) = trimmed.strip_suffix("++") {
            (prefix, "+")
        } else {
            trimmed.rsplit_once('+').unwrap_or(("", trimmed))
        };
        if key.is_empty() {
            return Err(ChordError::MissingKey {
                chord: s.to_string(),
            });
        }

        let mut chord = KeyChord::new(key);
        for modifier in modifiers.split('+').filter(|m| !m.is_empty()) {
            match modifier.to_lowercase().as_str() {
                "ctrl" | "control" => chord.ctrl = true,
                "shift" => chord.shift = true,
                "alt" | "option" => chord.alt = true,
                "meta" | "cmd" | "command" | "super" => chord.meta = true,
                _ => {
                    return Err(ChordError::UnknownModifier {
                        modifier: modifier.to_string(),
                        chord: s.to_string(),
                    });
                }
            }
        }
        Ok(chord)
    }
}

/// A key press as delivered by the shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyEvent {
    pub key: String,
    pub ctrl: bool,
    pub shift: bool,
    pub alt: bool,
    pub meta: bool,
    default_prevented: bool,
}

impl KeyEvent {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            ctrl: false,
            shift: false,
            alt: false,
            meta: false,
            default_prevented: false,
        }
    }

    /// Event that would be produced by pressing `chord`.
    pub fn from_chord(chord: &KeyChord) -> Self {
        Self {
            key: chord.key.clone(),
            ctrl: chord.ctrl,
            shift: chord.shift,
            alt: chord.alt,
            meta: chord.meta,
            default_prevented: false,
        }
    }

    /// Mark the event consumed so the host skips its default action.
    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    pub fn is_default_prevented(&self) -> bool {
        self.default_prevented
    }
}

pub type ShortcutHandler = Box<dyn FnMut()>;

/// Chord → handler table owned by an editing shell.
#[derive(Default)]
pub struct KeyboardShortcuts {
    handlers: HashMap<String, ShortcutHandler>,
}

impl KeyboardShortcuts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `handler` to `chord`. Returns `true` if it replaced an earlier binding.
    pub fn register(&mut self, chord: &KeyChord, handler: impl FnMut() + 'static) -> bool {
        let replaced = self
            .handlers
            .insert(chord.to_string(), Box::new(handler))
            .is_some();
        debug!(%chord, replaced, "registered shortcut");
        replaced
    }

    /// Remove the binding for `chord`. Returns `true` if one existed.
    pub fn unregister(&mut self, chord: &KeyChord) -> bool {
        self.handlers.remove(&chord.to_string()).is_some()
    }

    pub fn clear(&mut self) {
        self.handlers.clear();
    }

    pub fn is_registered(&self, chord: &KeyChord) -> bool {
        self.handlers.contains_key(&chord.to_string())
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Bound chords, sorted.
    pub fn chords(&self) -> Vec<&str> {
        let mut chords: Vec<&str> = self.handlers.keys().map(String::as_str).collect();
        chords.sort_unstable();
        chords
    }

    /// Run the handler bound to the event's chord.
    ///
    /// On a match the handler runs once and the event is marked
    /// default-prevented. Otherwise the event is left untouched. Returns
    /// whether a handler ran.
    pub fn handle_key_event(&mut self, event: &mut KeyEvent) -> bool {
        let chord = KeyChord::from_event(event).to_string();
        match self.handlers.get_mut(&chord) {
            Some(handler) => {
                event.prevent_default();
                trace!(%chord, "dispatching shortcut");
                handler();
                true
            }
            None => false,
        }
    }
}

impl fmt::Debug for KeyboardShortcuts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyboardShortcuts")
            .field("chords", &self.chords())
            .finish()
    }
}
