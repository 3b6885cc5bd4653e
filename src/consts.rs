//! Constants used across the PS/2 terminal.
//!
//! This module defines the protocol-wide constants of the PS/2 keyboard
//! link (frame layout, special scan codes) and the layout constants of the
//! text terminal (line capacity, history depth, glyph geometry).
//!
//! ## Key Concepts
//!
//! - **Frames**: The keyboard clocks out 11 bits per byte, LSB first:
//!   one start bit (always 0), eight data bits, one odd-parity bit and one
//!   stop bit (always 1).
//! - **Scan code set 2**: Keys are identified by make-codes. A key release is
//!   announced by the [`RELEASE_PREFIX`] byte followed by the make-code again.
//! - **Line capacity**: One slot of every line buffer is reserved, so a line
//!   holds at most `LINE_CAPACITY - 1` characters.
//! - **Geometry**: The display is addressed in pixels; rows are
//!   [`LINE_HEIGHT`] pixels tall and each glyph is [`GLYPH_WIDTH`] pixels wide.

/// Number of bits in one PS/2 frame (start + 8 data + parity + stop).
pub const PS2_FRAME_BITS: u8 = 11;

/// Mask covering the eleven bits of a frame.
pub const PS2_FRAME_MASK: u16 = (1 << PS2_FRAME_BITS) - 1;

/// Bit position of the start bit within a frame.
pub const PS2_START_BIT: u8 = 0;

/// Bit position of the parity bit within a frame.
pub const PS2_PARITY_BIT: u8 = 9;

/// Bit position of the stop bit within a frame.
pub const PS2_STOP_BIT: u8 = 10;

/// Byte sent by the keyboard before the make-code of a released key.
pub const RELEASE_PREFIX: u8 = 0xf0;

/// Byte sent by the keyboard before extended (two byte) make-codes.
///
/// Extended keys are not translated; the prefix simply has no mapping.
pub const EXTENDED_PREFIX: u8 = 0xe0;

/// Scan code (set 2) of the Backspace key.
pub const BACKSPACE_SCANCODE: u8 = 0x66;

/// Scan code (set 2) of the main Enter key.
///
/// Enter is recognised through [`ENTER_SENTINEL`] stored at this slot of the
/// translation table, not by comparing against this constant.
pub const ENTER_SCANCODE: u8 = 0x5a;

/// Character stored in the translation table for the Enter key.
pub const ENTER_SENTINEL: char = '\n';

/// Capacity of a line buffer, including the reserved terminator slot.
pub const LINE_CAPACITY: usize = 30;

/// Number of committed lines kept in the scrolling history.
pub const HISTORY_LINES: usize = 18;

/// Width of one glyph, in pixels.
pub const GLYPH_WIDTH: u16 = 8;

/// Height of one text row, in pixels.
pub const LINE_HEIGHT: u16 = 13;

/// Glyph drawn at the caret position.
pub const CARET_GLYPH: char = '_';

/// Delay between two iterations of the polling loop, in milliseconds.
pub const DEFAULT_POLL_MS: u32 = 1;
