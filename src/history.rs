//! Linear undo history of encoded snapshots.
//!
//! The history is a list of [`EncodedState`]s plus a cursor pointing at the
//! state the user currently sees:
//!
//! ```text
//!   states:  [ s0 ] [ s1 ] [ s2 ] [ s3 ]
//!                          ^cursor
//! ```
//!
//! - `push_state` drops everything after the cursor, appends, and moves the
//!   cursor to the new entry. Undone states do not survive a new edit.
//! - `undo` steps back one entry; `redo` steps forward while forward entries
//!   still exist.
//! - `reset` jumps back to the first entry without deleting anything, so the
//!   user can still redo back towards their latest edit until they push again.
//! - `clear` forgets everything.
//!
//! Moves that are not possible (undo at the first entry, anything on an empty
//! history) return `None`. Pressing undo too often is normal, not an error.

use crate::encoding::EncodedState;
use tracing::debug;

#[derive(Debug, Clone, Default)]
pub struct EditHistory {
    states: Vec<EncodedState>,
    /// `Some(i)` with `i < states.len()` whenever `states` is non-empty.
    cursor: Option<usize>,
}

impl EditHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a new state, truncating any redo entries.
    pub fn push_state(&mut self, state: EncodedState) {
        let keep = self.cursor.map_or(0, |i| i + 1);
        let dropped = self.states.len() - keep;
        self.states.truncate(keep);
        self.states.push(state);
        self.cursor = Some(self.states.len() - 1);
        debug!(
            index = self.states.len() - 1,
            dropped, "pushed history state"
        );
    }

    pub fn can_undo(&self) -> bool {
        self.cursor.is_some_and(|i| i > 0)
    }

    pub fn can_redo(&self) -> bool {
        self.cursor.is_some_and(|i| i + 1 < self.states.len())
    }

    /// Whether the current state differs from the original.
    pub fn has_changes(&self) -> bool {
        self.can_undo()
    }

    /// Step back one state and return it.
    pub fn undo(&mut self) -> Option<&EncodedState> {
        if !self.can_undo() {
            return None;
        }
        let index = self.cursor? - 1;
        self.move_to(index)
    }

    /// Step forward one state and return it.
    pub fn redo(&mut self) -> Option<&EncodedState> {
        if !self.can_redo() {
            return None;
        }
        let index = self.cursor? + 1;
        self.move_to(index)
    }

    /// Jump back to the first state and return it. Later entries are kept.
    pub fn reset(&mut self) -> Option<&EncodedState> {
        if !self.has_changes() {
            return None;
        }
        self.move_to(0)
    }

    /// State at the cursor.
    pub fn current_state(&self) -> Option<&EncodedState> {
        self.states.get(self.cursor?)
    }

    /// First state ever pushed since the last clear.
    pub fn original_state(&self) -> Option<&EncodedState> {
        self.states.first()
    }

    /// Forget every state.
    pub fn clear(&mut self) {
        self.states.clear();
        self.cursor = None;
        debug!("cleared history");
    }

    /// Number of stored states, including any redo entries.
    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Cursor position, `None` when empty.
    pub fn current_index(&self) -> Option<usize> {
        self.cursor
    }

    pub fn states(&self) -> impl Iterator<Item = &EncodedState> {
        self.states.iter()
    }

    fn move_to(&mut self, index: usize) -> Option<&EncodedState> {
        self.cursor = Some(index);
        debug!(index, len = self.states.len(), "moved history cursor");
        self.states.get(index)
    }
}
