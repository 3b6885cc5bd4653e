//! Scan code set 2 translation.
//!
//! Turns the raw bytes produced by the [`decoder`](crate::decoder) into
//! [`KeyEvent`]s for the line editor. Only single-byte make-codes of a US
//! layout are mapped; modifiers and `0xE0`-prefixed extended keys have no
//! mapping and are dropped.
//!
//! ## Release and repeat handling
//!
//! A key release arrives as [`RELEASE_PREFIX`] followed by the key's
//! make-code. The translator swallows both bytes and forgets the last
//! accepted make-code, so the next press of any key is accepted again.
//! A make-code equal to the last accepted one, with no release in between,
//! is treated as typematic repeat and dropped. This also drops a genuine fast
//! re-press whose release got lost, which is an accepted tradeoff.
//!
//! ## Enter and Backspace
//!
//! Enter is recognised by the [`ENTER_SENTINEL`] character stored in the
//! table at the Enter make-code. Backspace is recognised by comparing the
//! make-code against [`BACKSPACE_SCANCODE`]. The two mechanisms are kept
//! separate because the table slot of Backspace holds a control character.

use crate::consts::{BACKSPACE_SCANCODE, ENTER_SCANCODE, ENTER_SENTINEL, RELEASE_PREFIX};

/// Number of slots in [`SCANCODE_SET2`]; make-codes at or above are unmapped.
pub const SCANCODE_TABLE_LEN: usize = 0x80;

/// Make-code to character table for scan code set 2, US layout, unshifted.
pub static SCANCODE_SET2: [Option<char>; SCANCODE_TABLE_LEN] = build_set2_table();

const fn build_set2_table() -> [Option<char>; SCANCODE_TABLE_LEN] {
    let mut t = [None; SCANCODE_TABLE_LEN];
    t[0x0d] = Some('\t');
    t[0x0e] = Some('`');
    t[0x15] = Some('q');
    t[0x16] = Some('1');
    t[0x1a] = Some('z');
    t[0x1b] = Some('s');
    t[0x1c] = Some('a');
    t[0x1d] = Some('w');
    t[0x1e] = Some('2');
    t[0x21] = Some('c');
    t[0x22] = Some('x');
    t[0x23] = Some('d');
    t[0x24] = Some('e');
    t[0x25] = Some('4');
    t[0x26] = Some('3');
    t[0x29] = Some(' ');
    t[0x2a] = Some('v');
    t[0x2b] = Some('f');
    t[0x2c] = Some('t');
    t[0x2d] = Some('r');
    t[0x2e] = Some('5');
    t[0x31] = Some('n');
    t[0x32] = Some('b');
    t[0x33] = Some('h');
    t[0x34] = Some('g');
    t[0x35] = Some('y');
    t[0x36] = Some('6');
    t[0x3a] = Some('m');
    t[0x3b] = Some('j');
    t[0x3c] = Some('u');
    t[0x3d] = Some('7');
    t[0x3e] = Some('8');
    t[0x41] = Some(',');
    t[0x42] = Some('k');
    t[0x43] = Some('i');
    t[0x44] = Some('o');
    t[0x45] = Some('0');
    t[0x46] = Some('9');
    t[0x49] = Some('.');
    t[0x4a] = Some('/');
    t[0x4b] = Some('l');
    t[0x4c] = Some(';');
    t[0x4d] = Some('p');
    t[0x4e] = Some('-');
    t[0x52] = Some('\'');
    t[0x54] = Some('[');
    t[0x55] = Some('=');
    t[ENTER_SCANCODE as usize] = Some(ENTER_SENTINEL);
    t[0x5b] = Some(']');
    t[0x5d] = Some('\\');
    t[BACKSPACE_SCANCODE as usize] = Some('\x08');
    // keypad
    t[0x69] = Some('1');
    t[0x6b] = Some('4');
    t[0x6c] = Some('7');
    t[0x70] = Some('0');
    t[0x71] = Some('.');
    t[0x72] = Some('2');
    t[0x73] = Some('5');
    t[0x74] = Some('6');
    t[0x75] = Some('8');
    t[0x76] = Some('\x1b');
    t[0x79] = Some('+');
    t[0x7a] = Some('3');
    t[0x7b] = Some('-');
    t[0x7c] = Some('*');
    t[0x7d] = Some('9');
    t
}

/// Looks up a make-code. Out-of-range and unassigned codes yield `None`.
pub fn lookup(code: u8) -> Option<char> {
    SCANCODE_SET2.get(code as usize).copied().flatten()
}

/// An editing action produced from a make-code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub enum KeyEvent {
    /// Append a printable character.
    Insert(char),
    /// Finish the current line.
    Commit,
    /// Delete the last character.
    Backspace,
}

/// Stateful make-code filter on top of the decoded byte stream.
#[derive(Debug, Default, Clone)]
pub struct ScancodeTranslator {
    pending_release: bool,
    last_accepted: Option<u8>,
}

impl ScancodeTranslator {
    /// Creates a translator with no release pending and nothing accepted.
    pub const fn new() -> Self {
        Self {
            pending_release: false,
            last_accepted: None,
        }
    }

    /// Feeds one decoded byte. Returns the key event it produces, if any.
    pub fn translate(&mut self, byte: u8) -> Option<KeyEvent> {
        if byte == RELEASE_PREFIX {
            self.pending_release = true;
            return None;
        }
        if self.pending_release {
            self.pending_release = false;
            self.last_accepted = None;
            return None;
        }
        if self.last_accepted == Some(byte) {
            return None;
        }
        self.last_accepted = Some(byte);

        let mapped = lookup(byte);
        if mapped == Some(ENTER_SENTINEL) {
            return Some(KeyEvent::Commit);
        }
        if byte == BACKSPACE_SCANCODE {
            return Some(KeyEvent::Backspace);
        }
        match mapped {
            Some(ch) if is_printable(ch) => Some(KeyEvent::Insert(ch)),
            _ => None,
        }
    }

    /// Whether a release prefix was seen and its make-code is still due.
    pub fn release_pending(&self) -> bool {
        self.pending_release
    }

    /// The last make-code that produced (or could have produced) an event.
    pub fn last_accepted(&self) -> Option<u8> {
        self.last_accepted
    }

    /// Forgets all carried state.
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

fn is_printable(ch: char) -> bool {
    ch.is_ascii_graphic() || ch == ' '
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_bounds() {
        assert_eq!(lookup(0x1c), Some('a'));
        assert_eq!(lookup(0x00), None);
        assert_eq!(lookup(0x7f), None);
        assert_eq!(lookup(0x80), None);
        assert_eq!(lookup(0xff), None);
    }

    #[test]
    fn test_release_sequence_emits_nothing_and_clears_last() {
        for code in [0x1c_u8, 0x5a, 0x66, 0x00, 0xe0, 0xff] {
            let mut t = ScancodeTranslator::new();
            let _ = t.translate(0x24);
            assert_eq!(t.translate(RELEASE_PREFIX), None);
            assert!(t.release_pending());
            assert_eq!(t.translate(code), None);
            assert!(!t.release_pending());
            assert_eq!(t.last_accepted(), None);
        }
    }

    #[test]
    fn test_repeat_is_suppressed() {
        let mut t = ScancodeTranslator::new();
        assert_eq!(t.translate(0x4b), Some(KeyEvent::Insert('l')));
        assert_eq!(t.translate(0x4b), None);
        assert_eq!(t.translate(0x4b), None);
    }

    #[test]
    fn test_press_release_press_same_key() {
        let mut t = ScancodeTranslator::new();
        assert_eq!(t.translate(0x44), Some(KeyEvent::Insert('o')));
        assert_eq!(t.translate(RELEASE_PREFIX), None);
        assert_eq!(t.translate(0x44), None);
        assert_eq!(t.translate(0x44), Some(KeyEvent::Insert('o')));
    }

    #[test]
    fn test_enter_and_backspace() {
        let mut t = ScancodeTranslator::new();
        assert_eq!(t.translate(ENTER_SCANCODE), Some(KeyEvent::Commit));
        assert_eq!(t.translate(BACKSPACE_SCANCODE), Some(KeyEvent::Backspace));
    }

    #[test]
    fn test_unmapped_and_control_codes_are_dropped() {
        let mut t = ScancodeTranslator::new();
        assert_eq!(t.translate(0x12), None); // left shift
        assert_eq!(t.translate(0x0d), None); // tab
        assert_eq!(t.translate(0x76), None); // escape
        assert_eq!(t.translate(0x83), None);
        assert_eq!(t.last_accepted(), Some(0x83));
    }

    #[test]
    fn test_space_is_printable() {
        let mut t = ScancodeTranslator::new();
        assert_eq!(t.translate(0x29), Some(KeyEvent::Insert(' ')));
    }
}
