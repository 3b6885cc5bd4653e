//! Rendering backend interface.
//!
//! The terminal never talks to display hardware itself. It emits a small set
//! of draw primitives through [`RenderBackend`]; an implementation forwards
//! them to a TFT/OLED driver, a framebuffer or a test recorder. The terminal
//! never reads anything back from the backend.

use thiserror::Error;

/// Rendering failures reported by a backend.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub enum DisplayError {
    /// Bus or controller communication failed.
    #[error("display communication error")]
    Communication,
    /// A primitive addressed pixels outside the panel.
    #[error("coordinates out of bounds")]
    OutOfBounds,
    /// The display has not been initialised.
    #[error("display not ready")]
    NotReady,
}

/// A 16-bit RGB565 colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub struct Rgb565(pub u16);

impl Rgb565 {
    /// Black.
    pub const BLACK: Self = Self(0x0000);
    /// White.
    pub const WHITE: Self = Self(0xffff);
    /// Green.
    pub const GREEN: Self = Self::from_rgb(0, 255, 0);

    /// Packs 8-bit channels into RGB565 (5 bits red, 6 green, 5 blue).
    pub const fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        Self((((r as u16) & 0xf8) << 8) | (((g as u16) & 0xfc) << 3) | ((b as u16) >> 3))
    }
}

/// A pixel rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub struct Rect {
    /// Left edge.
    pub x: u16,
    /// Top edge.
    pub y: u16,
    /// Width in pixels.
    pub width: u16,
    /// Height in pixels.
    pub height: u16,
}

impl Rect {
    /// Creates a rectangle.
    pub const fn new(x: u16, y: u16, width: u16, height: u16) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

/// Draw primitives consumed by the terminal.
///
/// Text is drawn at the current cursor, which is set in pixels. Backends
/// decide how glyphs are rasterised; the terminal only assumes a fixed
/// glyph width and line height (see [`TerminalConfig`](crate::terminal::TerminalConfig)).
pub trait RenderBackend {
    /// Clears the whole screen.
    fn clear_screen(&mut self) -> Result<(), DisplayError>;

    /// Moves the text cursor to pixel position (`x`, `y`).
    fn set_cursor(&mut self, x: u16, y: u16) -> Result<(), DisplayError>;

    /// Prints `text` at the text cursor.
    fn print_text(&mut self, text: &str) -> Result<(), DisplayError>;

    /// Fills `region` with `color`.
    fn fill_rect(&mut self, region: Rect, color: Rgb565) -> Result<(), DisplayError>;

    /// Sets the colour used by subsequent [`print_text`](Self::print_text) calls.
    fn set_text_color(&mut self, color: Rgb565) -> Result<(), DisplayError>;
}

impl<T: RenderBackend + ?Sized> RenderBackend for &mut T {
    fn clear_screen(&mut self) -> Result<(), DisplayError> {
        (**self).clear_screen()
    }

    fn set_cursor(&mut self, x: u16, y: u16) -> Result<(), DisplayError> {
        (**self).set_cursor(x, y)
    }

    fn print_text(&mut self, text: &str) -> Result<(), DisplayError> {
        (**self).print_text(text)
    }

    fn fill_rect(&mut self, region: Rect, color: Rgb565) -> Result<(), DisplayError> {
        (**self).fill_rect(region, color)
    }

    fn set_text_color(&mut self, color: Rgb565) -> Result<(), DisplayError> {
        (**self).set_text_color(color)
    }
}
