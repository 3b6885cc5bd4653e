//! The interactive terminal.
//!
//! [`Terminal`] is the single owner of everything that runs in the polling
//! context: the [`ScancodeTranslator`], the [`InputLineEditor`], the
//! [`ScrollingDisplayBuffer`], the [`CommandDispatcher`], the rendering
//! backend and the diagnostic sink. Only the [`Ps2Decoder`] is shared with
//! the interrupt, and the terminal merely borrows it on each
//! [`poll`](Terminal::poll).
//!
//! ## Example
//!
//! ```rust,ignore
//! use ps2term::decoder::{OverrunPolicy, Ps2Decoder};
//! use ps2term::terminal::{Terminal, TerminalConfig};
//!
//! static PS2: Ps2Decoder = Ps2Decoder::new(OverrunPolicy::Overwrite);
//!
//! let mut terminal: Terminal<_, _, _> =
//!     Terminal::new(tft, led_pin, serial, TerminalConfig::default())?;
//! loop {
//!     let _ = terminal.poll(&PS2);
//!     delay.delay_ms(1);
//! }
//! ```
//!
//! ## Commit order
//!
//! On Enter the committed line is echoed to the diagnostic sink, appended to
//! the display, dispatched, and the command feedback (if any) is appended
//! after it. A `cls` resets the display last, leaving one empty line.

use core::fmt::Write;

use embedded_hal::digital::{ErrorKind, OutputPin};
use thiserror::Error;

use crate::backend::{DisplayError, RenderBackend};
use crate::commands::{CommandDispatcher, Dispatch, Effect};
use crate::consts::{HISTORY_LINES, LINE_CAPACITY};
use crate::decoder::{Frame, Ps2Decoder};
use crate::display::{DisplayStyle, ScrollingDisplayBuffer};
use crate::editor::InputLineEditor;
use crate::scancode::{KeyEvent, ScancodeTranslator};

/// Diagnostic line written when a character is rejected.
pub const BUFFER_FULL_DIAGNOSTIC: &str = "buffer full";

/// Errors surfaced by the terminal. None of them is fatal; the polling loop
/// logs them and carries on.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub enum TerminalError {
    /// The rendering backend failed.
    #[error("display error: {0}")]
    Display(#[from] DisplayError),
    /// Driving the indicator output failed.
    #[error("indicator pin error: {0:?}")]
    Indicator(ErrorKind),
    /// Writing to the diagnostic sink failed.
    #[error("diagnostic output error")]
    Diagnostic,
}

/// Terminal settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub struct TerminalConfig {
    /// Geometry and colours used for painting.
    pub style: DisplayStyle,
    /// Discard frames with bad start, stop or parity bits.
    pub validate_frames: bool,
    /// Answer unknown commands with a feedback line instead of ignoring them.
    pub report_unknown: bool,
    /// The indicator is active-low (on = LOW, off = HIGH).
    pub indicator_inverted: bool,
}

/// Owned state of the polling context.
///
/// - `B`: rendering backend
/// - `LED`: indicator output pin
/// - `D`: diagnostic text sink (a UART, RTT channel, `String`, ...)
/// - `C`: line capacity, `L`: history lines
#[derive(Debug)]
pub struct Terminal<B, LED, D, const C: usize = LINE_CAPACITY, const L: usize = HISTORY_LINES>
where
    B: RenderBackend,
    LED: OutputPin,
    D: Write,
{
    /// Rendering backend.
    pub backend: B,
    /// Diagnostic sink.
    pub diag: D,
    translator: ScancodeTranslator,
    editor: InputLineEditor<C>,
    display: ScrollingDisplayBuffer<L, C>,
    dispatcher: CommandDispatcher<LED>,
    config: TerminalConfig,
    bad_frames: u16,
}

impl<B, LED, D, const C: usize, const L: usize> Terminal<B, LED, D, C, L>
where
    B: RenderBackend,
    LED: OutputPin,
    D: Write,
{
    /// Sets up the terminal: indicator off, screen cleared, empty prompt
    /// line drawn.
    pub fn new(backend: B, led: LED, diag: D, config: TerminalConfig) -> Result<Self, TerminalError> {
        let dispatcher =
            CommandDispatcher::new(led, config.indicator_inverted, config.report_unknown)?;
        let mut terminal = Self {
            backend,
            diag,
            translator: ScancodeTranslator::new(),
            editor: InputLineEditor::new(),
            display: ScrollingDisplayBuffer::new(),
            dispatcher,
            config,
            bad_frames: 0,
        };
        terminal.display.reset(&mut terminal.backend)?;
        terminal.render()?;
        Ok(terminal)
    }

    /// Takes at most one frame from `decoder`, processes it and repaints
    /// the display if a full redraw is still due.
    ///
    /// Returns the key event the frame produced, if any.
    pub fn poll(&mut self, decoder: &Ps2Decoder) -> Result<Option<KeyEvent>, TerminalError> {
        let event = match decoder.take_frame().and_then(|frame| self.accept(frame)) {
            Some(byte) => self.handle_byte(byte)?,
            None => None,
        };
        self.render()?;
        Ok(event)
    }

    fn accept(&mut self, frame: Frame) -> Option<u8> {
        if !self.config.validate_frames {
            return Some(frame.data());
        }
        match frame.check() {
            Ok(byte) => Some(byte),
            Err(_) => {
                self.bad_frames = self.bad_frames.wrapping_add(1);
                warn!("dropping malformed frame {}", frame.bits());
                None
            }
        }
    }

    /// Feeds one decoded scan byte.
    pub fn handle_byte(&mut self, byte: u8) -> Result<Option<KeyEvent>, TerminalError> {
        let event = self.translator.translate(byte);
        if let Some(event) = event {
            self.handle_key(event)?;
        }
        Ok(event)
    }

    /// Applies one key event.
    pub fn handle_key(&mut self, event: KeyEvent) -> Result<(), TerminalError> {
        match event {
            KeyEvent::Insert(ch) if !ch.is_ascii() => {
                debug!("ignoring non-ascii key");
                Ok(())
            }
            KeyEvent::Insert(ch) => {
                if !self.editor.insert(ch) {
                    warn!("input line full");
                    writeln!(self.diag, "{}", BUFFER_FULL_DIAGNOSTIC)
                        .map_err(|_| TerminalError::Diagnostic)?;
                    return Ok(());
                }
                self.redraw_input()
            }
            KeyEvent::Backspace => {
                if self.editor.backspace() {
                    self.redraw_input()?;
                }
                Ok(())
            }
            KeyEvent::Commit => self.commit(),
        }
    }

    /// Echoes, appends and dispatches the line, then repaints. A failing
    /// diagnostic sink does not stop the commit; it is reported afterwards.
    fn commit(&mut self) -> Result<(), TerminalError> {
        let line = self.editor.commit();
        debug!("commit {}", line.as_str());
        let echoed = writeln!(self.diag, "{}", line).is_ok();
        if !echoed {
            warn!("diagnostic echo failed");
        }
        self.display.append_line(&line);

        let dispatch: Dispatch<C> = self.dispatcher.dispatch(&line)?;
        if let Some(feedback) = &dispatch.feedback {
            self.display.append_line(feedback);
        }
        if dispatch.effect == Some(Effect::ClearScreen) {
            self.editor.clear();
            self.display.reset(&mut self.backend)?;
        }
        self.render()?;
        if echoed {
            Ok(())
        } else {
            Err(TerminalError::Diagnostic)
        }
    }

    /// Repaints everything if a line was committed since the last render.
    pub fn render(&mut self) -> Result<(), TerminalError> {
        if !self.display.is_dirty() {
            return Ok(());
        }
        self.display.render(
            &mut self.backend,
            &self.config.style,
            self.editor.as_str(),
            self.editor.cursor_column(),
        )
    }

    fn redraw_input(&mut self) -> Result<(), TerminalError> {
        self.display.redraw_input(
            &mut self.backend,
            &self.config.style,
            self.editor.as_str(),
            self.editor.cursor_column(),
        )
    }

    /// The in-progress input line.
    pub fn input(&self) -> &InputLineEditor<C> {
        &self.editor
    }

    /// The committed-line history.
    pub fn display(&self) -> &ScrollingDisplayBuffer<L, C> {
        &self.display
    }

    /// The command dispatcher and indicator.
    pub fn dispatcher(&mut self) -> &mut CommandDispatcher<LED> {
        &mut self.dispatcher
    }

    /// Frames dropped by validation since startup.
    pub fn bad_frames(&self) -> u16 {
        self.bad_frames
    }

    /// Active settings.
    pub fn config(&self) -> &TerminalConfig {
        &self.config
    }
}
