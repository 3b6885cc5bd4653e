//! In-progress input line.
//!
//! [`InputLineEditor`] owns the characters typed since the last Enter. It has
//! no knowledge of the display or the command dispatcher; the
//! [`Terminal`](crate::terminal::Terminal) routes committed lines onwards.

use heapless::String;

use crate::consts::LINE_CAPACITY;

/// Fixed-capacity line buffer with append, backspace and commit.
///
/// `C` is the buffer capacity including the reserved terminator slot, so at
/// most `C - 1` characters are held. Only ASCII is accepted, so one
/// character is one byte and one glyph column. The caret column always equals
/// [`len`](Self::len); renderers must re-read it after every mutation.
#[derive(Debug, Default, Clone)]
pub struct InputLineEditor<const C: usize = LINE_CAPACITY> {
    buf: String<C>,
}

impl<const C: usize> InputLineEditor<C> {
    /// Maximum number of characters the line accepts.
    pub const MAX_LEN: usize = C - 1;

    /// Creates an empty line.
    pub const fn new() -> Self {
        Self { buf: String::new() }
    }

    /// Appends `ch`. Returns `false`, leaving the line untouched, when full
    /// or when `ch` is not ASCII.
    pub fn insert(&mut self, ch: char) -> bool {
        if !ch.is_ascii() || self.is_full() {
            return false;
        }
        self.buf.push(ch).is_ok()
    }

    /// Removes the last character. Returns `false` on an empty line.
    pub fn backspace(&mut self) -> bool {
        self.buf.pop().is_some()
    }

    /// Returns the finished line and starts a new, empty one.
    pub fn commit(&mut self) -> String<C> {
        core::mem::take(&mut self.buf)
    }

    /// Empties the line without returning it.
    pub fn clear(&mut self) {
        self.buf.clear();
    }

    /// Current contents.
    pub fn as_str(&self) -> &str {
        self.buf.as_str()
    }

    /// Number of characters on the line.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Whether the line is empty.
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Whether the next [`insert`](Self::insert) would be rejected.
    pub fn is_full(&self) -> bool {
        self.buf.len() >= Self::MAX_LEN
    }

    /// Caret column, in characters.
    pub fn cursor_column(&self) -> usize {
        self.buf.len()
    }
}
