//! Scrolling text display.
//!
//! [`ScrollingDisplayBuffer`] keeps the last `L` committed lines in a ring
//! and knows how to paint them, followed by the in-progress input line and
//! its caret, through a [`RenderBackend`].
//!
//! Every committed line marks the buffer dirty and the next
//! [`render`](ScrollingDisplayBuffer::render) repaints the whole visible
//! region. Commits happen at typing speed, so there is no incremental
//! scrolling. Keystrokes that only change the input line use the cheaper
//! [`redraw_input`](ScrollingDisplayBuffer::redraw_input).
//!
//! Once the ring holds `L` lines each new line silently evicts the oldest.

use heapless::String;

use crate::backend::{Rect, RenderBackend, Rgb565};
use crate::consts::{CARET_GLYPH, GLYPH_WIDTH, HISTORY_LINES, LINE_CAPACITY, LINE_HEIGHT};
use crate::terminal::TerminalError;

/// Glyph geometry and colours used when painting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub struct DisplayStyle {
    /// Width of one glyph, in pixels.
    pub glyph_width: u16,
    /// Height of one text row, in pixels.
    pub line_height: u16,
    /// Text colour.
    pub text_color: Rgb565,
    /// Background colour used to blank rows.
    pub background: Rgb565,
    /// Glyph drawn at the caret.
    pub caret: char,
}

impl Default for DisplayStyle {
    fn default() -> Self {
        Self {
            glyph_width: GLYPH_WIDTH,
            line_height: LINE_HEIGHT,
            text_color: Rgb565::WHITE,
            background: Rgb565::BLACK,
            caret: CARET_GLYPH,
        }
    }
}

/// Ring of committed lines plus the row the input line is edited on.
///
/// - `L`: number of committed lines kept.
/// - `C`: line capacity including the reserved slot; stored lines are
///   truncated to `C - 1` characters.
#[derive(Debug, Clone)]
pub struct ScrollingDisplayBuffer<const L: usize = HISTORY_LINES, const C: usize = LINE_CAPACITY> {
    lines: [String<C>; L],
    /// Next slot to fill.
    write: usize,
    /// Valid lines, saturating at `L`.
    count: usize,
    /// Row the input line and caret are drawn on.
    edit_row: usize,
    dirty: bool,
}

impl<const L: usize, const C: usize> Default for ScrollingDisplayBuffer<L, C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const L: usize, const C: usize> ScrollingDisplayBuffer<L, C> {
    /// Creates an empty buffer.
    pub fn new() -> Self {
        Self {
            lines: core::array::from_fn(|_| String::new()),
            write: 0,
            count: 0,
            edit_row: 0,
            dirty: true,
        }
    }

    /// Appends a committed line, evicting the oldest one when full.
    pub fn append_line(&mut self, text: &str) {
        let slot = &mut self.lines[self.write];
        slot.clear();
        for ch in text.chars() {
            if slot.len() + ch.len_utf8() > C - 1 || slot.push(ch).is_err() {
                break;
            }
        }
        self.write = (self.write + 1) % L;
        self.count = (self.count + 1).min(L);
        self.edit_row = self.count;
        self.dirty = true;
    }

    /// Forgets every line, clears the screen and primes an empty prompt line.
    pub fn reset<B: RenderBackend>(&mut self, backend: &mut B) -> Result<(), TerminalError> {
        for line in &mut self.lines {
            line.clear();
        }
        self.write = 0;
        self.count = 0;
        self.edit_row = 0;
        self.append_line("");
        backend.clear_screen()?;
        Ok(())
    }

    /// Visible lines, oldest first.
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        let start = (self.write + L - self.count) % L;
        (0..self.count).map(move |i| self.lines[(start + i) % L].as_str())
    }

    /// Number of valid lines (0..=L).
    pub fn count(&self) -> usize {
        self.count
    }

    /// Row the input line is drawn on.
    pub fn edit_row(&self) -> usize {
        self.edit_row
    }

    /// Whether a full redraw is due.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Requests a full redraw on the next render.
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Repaints the visible lines, the input line and the caret.
    pub fn render<B: RenderBackend>(
        &mut self,
        backend: &mut B,
        style: &DisplayStyle,
        input: &str,
        cursor_column: usize,
    ) -> Result<(), TerminalError> {
        let region = Rect::new(
            0,
            0,
            style.glyph_width.saturating_mul(C as u16),
            style.line_height.saturating_mul(L as u16 + 1),
        );
        backend.fill_rect(region, style.background)?;
        backend.set_text_color(style.text_color)?;
        for (row, line) in self.lines().enumerate() {
            backend.set_cursor(0, row_y(style, row))?;
            backend.print_text(line)?;
        }
        self.draw_input(backend, style, input, cursor_column)?;
        self.dirty = false;
        Ok(())
    }

    /// Repaints only the editing row: input text and caret.
    pub fn redraw_input<B: RenderBackend>(
        &self,
        backend: &mut B,
        style: &DisplayStyle,
        input: &str,
        cursor_column: usize,
    ) -> Result<(), TerminalError> {
        let region = Rect::new(
            0,
            row_y(style, self.edit_row),
            style.glyph_width.saturating_mul(C as u16),
            style.line_height,
        );
        backend.fill_rect(region, style.background)?;
        backend.set_text_color(style.text_color)?;
        self.draw_input(backend, style, input, cursor_column)
    }

    fn draw_input<B: RenderBackend>(
        &self,
        backend: &mut B,
        style: &DisplayStyle,
        input: &str,
        cursor_column: usize,
    ) -> Result<(), TerminalError> {
        let y = row_y(style, self.edit_row);
        backend.set_cursor(0, y)?;
        backend.print_text(input)?;
        let x = style.glyph_width.saturating_mul(cursor_column as u16);
        backend.set_cursor(x, y)?;
        let mut glyph = [0u8; 4];
        backend.print_text(style.caret.encode_utf8(&mut glyph))?;
        Ok(())
    }
}

fn row_y(style: &DisplayStyle, row: usize) -> u16 {
    style.line_height.saturating_mul(row as u16)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{DrawOp, RecordingBackend};

    #[test]
    fn test_starts_empty() {
        let display: ScrollingDisplayBuffer = ScrollingDisplayBuffer::new();
        assert_eq!(display.count(), 0);
        assert_eq!(display.lines().count(), 0);
        assert_eq!(display.edit_row(), 0);
    }

    #[test]
    fn test_overflow_evicts_oldest_in_order() {
        let mut display: ScrollingDisplayBuffer = ScrollingDisplayBuffer::new();
        let names: [std::string::String; HISTORY_LINES + 1] =
            core::array::from_fn(|i| format!("line {}", i));
        for name in &names {
            display.append_line(name);
        }
        assert_eq!(display.count(), HISTORY_LINES);
        let visible: Vec<&str> = display.lines().collect();
        assert!(!visible.contains(&"line 0"));
        let expected: Vec<&str> = names[1..].iter().map(|s| s.as_str()).collect();
        assert_eq!(visible, expected);
        assert_eq!(display.edit_row(), HISTORY_LINES);
    }

    #[test]
    fn test_wraps_many_times() {
        let mut display: ScrollingDisplayBuffer<3, 8> = ScrollingDisplayBuffer::new();
        for i in 0..10 {
            display.append_line(&format!("{}", i));
        }
        let visible: Vec<&str> = display.lines().collect();
        assert_eq!(visible, ["7", "8", "9"]);
    }

    #[test]
    fn test_long_lines_are_truncated() {
        let mut display: ScrollingDisplayBuffer<2, 5> = ScrollingDisplayBuffer::new();
        display.append_line("abcdefgh");
        assert_eq!(display.lines().next(), Some("abcd"));
    }

    #[test]
    fn test_reset_primes_single_empty_line() {
        let mut backend = RecordingBackend::new();
        let mut display: ScrollingDisplayBuffer = ScrollingDisplayBuffer::new();
        display.append_line("one");
        display.append_line("two");
        display.reset(&mut backend).unwrap();
        assert_eq!(display.count(), 1);
        assert_eq!(display.lines().collect::<Vec<_>>(), [""]);
        assert_eq!(display.edit_row(), 1);
        assert_eq!(backend.ops, [DrawOp::Clear]);
    }

    #[test]
    fn test_render_draws_lines_then_input_and_caret() {
        let mut backend = RecordingBackend::new();
        let style = DisplayStyle::default();
        let mut display: ScrollingDisplayBuffer = ScrollingDisplayBuffer::new();
        display.append_line("led on");
        display.append_line("led turned on");
        assert!(display.is_dirty());
        display.render(&mut backend, &style, "st", 2).unwrap();
        assert!(!display.is_dirty());

        let expected: Vec<(u16, u16, std::string::String)> = vec![
            (0, 0, "led on".to_string()),
            (0, LINE_HEIGHT, "led turned on".to_string()),
            (0, 2 * LINE_HEIGHT, "st".to_string()),
            (2 * GLYPH_WIDTH, 2 * LINE_HEIGHT, "_".to_string()),
        ];
        assert_eq!(backend.printed(), expected);
    }

    #[test]
    fn test_render_after_wrap_paints_in_order() {
        let mut backend = RecordingBackend::new();
        let style = DisplayStyle::default();
        let mut display: ScrollingDisplayBuffer<3, 8> = ScrollingDisplayBuffer::new();
        for i in 0..5 {
            display.append_line(&format!("{}", i));
        }
        display.render(&mut backend, &style, "ab", 2).unwrap();

        let expected: Vec<(u16, u16, std::string::String)> = vec![
            (0, 0, "2".to_string()),
            (0, LINE_HEIGHT, "3".to_string()),
            (0, 2 * LINE_HEIGHT, "4".to_string()),
            (0, 3 * LINE_HEIGHT, "ab".to_string()),
            (2 * GLYPH_WIDTH, 3 * LINE_HEIGHT, "_".to_string()),
        ];
        assert_eq!(display.edit_row(), 3);
        assert_eq!(backend.printed(), expected);
    }

    #[test]
    fn test_redraw_input_blanks_edit_row_only() {
        let mut backend = RecordingBackend::new();
        let style = DisplayStyle::default();
        let mut display: ScrollingDisplayBuffer = ScrollingDisplayBuffer::new();
        display.append_line("a");
        display
            .redraw_input(&mut backend, &style, "x", 1)
            .unwrap();
        assert_eq!(
            backend.ops[0],
            DrawOp::Fill(
                Rect::new(0, LINE_HEIGHT, GLYPH_WIDTH * LINE_CAPACITY as u16, LINE_HEIGHT),
                Rgb565::BLACK
            )
        );
        assert_eq!(
            backend.printed_at_row(LINE_HEIGHT),
            ["x".to_string(), "_".to_string()]
        );
        assert!(display.is_dirty());
    }

    #[test]
    fn test_render_propagates_backend_errors() {
        let mut backend = RecordingBackend::new();
        backend.fail = true;
        let mut display: ScrollingDisplayBuffer = ScrollingDisplayBuffer::new();
        let err = display
            .render(&mut backend, &DisplayStyle::default(), "", 0)
            .unwrap_err();
        assert!(matches!(err, TerminalError::Display(_)));
        assert!(display.is_dirty());
    }
}
