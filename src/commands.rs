//! Built-in terminal commands.
//!
//! A committed line is trimmed and parsed once into a [`Command`]. The
//! grammar is closed and case-sensitive:
//!
//! | input     | effect                       | feedback          |
//! |-----------|------------------------------|-------------------|
//! | `led on`  | indicator driven active      | `led turned on`   |
//! | `led off` | indicator driven inactive    | `led turned OFF`  |
//! | `cls`     | display reset, screen clear  | none              |
//! | `state`   | none                         | `0` or `1`        |
//!
//! Anything else is [`Command::Unknown`] and is ignored unless the terminal
//! is configured to report it.

use core::fmt::Write;

use embedded_hal::digital::{Error as _, OutputPin};
use heapless::String;

use crate::consts::LINE_CAPACITY;
use crate::terminal::TerminalError;

/// Feedback line for an unknown command when reporting is enabled.
pub const UNKNOWN_COMMAND_FEEDBACK: &str = "unknown command";

/// A parsed command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub enum Command<'a> {
    /// `led on`
    LedOn,
    /// `led off`
    LedOff,
    /// `cls`
    Clear,
    /// `state`
    State,
    /// Blank line.
    Empty,
    /// Anything else, trimmed.
    Unknown(&'a str),
}

impl<'a> Command<'a> {
    /// Parses a committed line.
    pub fn parse(line: &'a str) -> Self {
        match line.trim() {
            "led on" => Command::LedOn,
            "led off" => Command::LedOff,
            "cls" => Command::Clear,
            "state" => Command::State,
            "" => Command::Empty,
            other => Command::Unknown(other),
        }
    }
}

/// Side effect of a dispatched command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub enum Effect {
    /// The indicator was driven to the given level (`true` = active).
    Indicator(bool),
    /// The display must be reset and the screen cleared.
    ClearScreen,
}

/// Result of dispatching one line.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Dispatch<const C: usize = LINE_CAPACITY> {
    /// Line to append to the display after the echoed input.
    pub feedback: Option<String<C>>,
    /// Side effect performed or requested.
    pub effect: Option<Effect>,
}

/// Interprets committed lines and owns the indicator output.
#[derive(Debug)]
pub struct CommandDispatcher<LED: OutputPin> {
    /// Indicator output pin.
    pub led: LED,
    led_on: bool,
    inverted: bool,
    report_unknown: bool,
}

impl<LED: OutputPin> CommandDispatcher<LED> {
    /// Creates a dispatcher and drives the indicator inactive.
    ///
    /// - `inverted`: the indicator is active-low (on = LOW, off = HIGH)
    /// - `report_unknown`: answer unknown commands with a feedback line
    pub fn new(led: LED, inverted: bool, report_unknown: bool) -> Result<Self, TerminalError> {
        let mut dispatcher = Self {
            led,
            led_on: false,
            inverted,
            report_unknown,
        };
        dispatcher.set_indicator(false)?;
        Ok(dispatcher)
    }

    /// Last logical state of the indicator (`true` = on), regardless of
    /// polarity.
    pub fn indicator(&self) -> bool {
        self.led_on
    }

    /// Parses and executes `line`.
    ///
    /// [`Effect::ClearScreen`] is only requested; the caller owns the display.
    pub fn dispatch<const C: usize>(&mut self, line: &str) -> Result<Dispatch<C>, TerminalError> {
        let command = Command::parse(line);
        debug!("dispatch {}", line);
        let dispatch = match command {
            Command::LedOn => {
                self.set_indicator(true)?;
                Dispatch {
                    feedback: Some(feedback("led turned on")),
                    effect: Some(Effect::Indicator(true)),
                }
            }
            Command::LedOff => {
                self.set_indicator(false)?;
                Dispatch {
                    feedback: Some(feedback("led turned OFF")),
                    effect: Some(Effect::Indicator(false)),
                }
            }
            Command::Clear => Dispatch {
                feedback: None,
                effect: Some(Effect::ClearScreen),
            },
            Command::State => {
                let mut text = String::new();
                write!(text, "{}", u8::from(self.led_on)).map_err(|_| TerminalError::Diagnostic)?;
                Dispatch {
                    feedback: Some(text),
                    effect: None,
                }
            }
            Command::Empty => Dispatch::default(),
            Command::Unknown(_) if self.report_unknown => Dispatch {
                feedback: Some(feedback(UNKNOWN_COMMAND_FEEDBACK)),
                effect: None,
            },
            Command::Unknown(_) => Dispatch::default(),
        };
        Ok(dispatch)
    }

    fn set_indicator(&mut self, on: bool) -> Result<(), TerminalError> {
        let level = if self.inverted { !on } else { on };
        let result = if level {
            self.led.set_high()
        } else {
            self.led.set_low()
        };
        result.map_err(|e| TerminalError::Indicator(e.kind()))?;
        self.led_on = on;
        Ok(())
    }
}

fn feedback<const C: usize>(text: &str) -> String<C> {
    let mut line = String::new();
    for ch in text.chars() {
        if line.push(ch).is_err() {
            break;
        }
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_hal_mock::eh1::digital::{
        Mock as PinMock, State as PinState, Transaction as PinTransaction,
    };

    fn text(dispatch: &Dispatch) -> Option<&str> {
        dispatch.feedback.as_ref().map(|s| s.as_str())
    }

    #[test]
    fn test_parse_grammar() {
        assert_eq!(Command::parse("led on"), Command::LedOn);
        assert_eq!(Command::parse("  led off\t"), Command::LedOff);
        assert_eq!(Command::parse("cls"), Command::Clear);
        assert_eq!(Command::parse("state "), Command::State);
        assert_eq!(Command::parse("   "), Command::Empty);
        assert_eq!(Command::parse("LED ON"), Command::Unknown("LED ON"));
        assert_eq!(Command::parse("led  on"), Command::Unknown("led  on"));
    }

    #[test]
    fn test_led_on_with_whitespace() {
        let led = PinMock::new(&[
            PinTransaction::set(PinState::Low),
            PinTransaction::set(PinState::High),
        ]);
        let mut dispatcher = CommandDispatcher::new(led, false, false).unwrap();
        let dispatch: Dispatch = dispatcher.dispatch("  led on  ").unwrap();
        assert_eq!(text(&dispatch), Some("led turned on"));
        assert_eq!(dispatch.effect, Some(Effect::Indicator(true)));
        assert!(dispatcher.indicator());
        dispatcher.led.done();
    }

    #[test]
    fn test_state_reports_indicator() {
        let led = PinMock::new(&[
            PinTransaction::set(PinState::Low),
            PinTransaction::set(PinState::High),
            PinTransaction::set(PinState::Low),
        ]);
        let mut dispatcher = CommandDispatcher::new(led, false, false).unwrap();
        let state: Dispatch = dispatcher.dispatch("state").unwrap();
        assert_eq!(text(&state), Some("0"));
        let _: Dispatch = dispatcher.dispatch("led on").unwrap();
        let state: Dispatch = dispatcher.dispatch("state").unwrap();
        assert_eq!(text(&state), Some("1"));
        assert_eq!(state.effect, None);
        let off: Dispatch = dispatcher.dispatch("led off").unwrap();
        assert_eq!(text(&off), Some("led turned OFF"));
        assert_eq!(off.effect, Some(Effect::Indicator(false)));
        dispatcher.led.done();
    }

    #[test]
    fn test_cls_requests_clear_without_feedback() {
        let led = PinMock::new(&[PinTransaction::set(PinState::Low)]);
        let mut dispatcher = CommandDispatcher::new(led, false, false).unwrap();
        let dispatch: Dispatch = dispatcher.dispatch("cls").unwrap();
        assert_eq!(dispatch.feedback, None);
        assert_eq!(dispatch.effect, Some(Effect::ClearScreen));
        dispatcher.led.done();
    }

    #[test]
    fn test_unknown_is_silent_by_default() {
        let led = PinMock::new(&[PinTransaction::set(PinState::Low)]);
        let mut dispatcher = CommandDispatcher::new(led, false, false).unwrap();
        let dispatch: Dispatch = dispatcher.dispatch("reboot").unwrap();
        assert_eq!(dispatch, Dispatch::default());
        dispatcher.led.done();
    }

    #[test]
    fn test_unknown_reported_when_enabled() {
        let led = PinMock::new(&[PinTransaction::set(PinState::Low)]);
        let mut dispatcher = CommandDispatcher::new(led, false, true).unwrap();
        let dispatch: Dispatch = dispatcher.dispatch("reboot").unwrap();
        assert_eq!(text(&dispatch), Some(UNKNOWN_COMMAND_FEEDBACK));
        let empty: Dispatch = dispatcher.dispatch("").unwrap();
        assert_eq!(empty, Dispatch::default());
        dispatcher.led.done();
    }

    #[test]
    fn test_inverted_indicator_is_active_low() {
        let led = PinMock::new(&[
            PinTransaction::set(PinState::High),
            PinTransaction::set(PinState::Low),
            PinTransaction::set(PinState::High),
        ]);
        let mut dispatcher = CommandDispatcher::new(led, true, false).unwrap();
        assert!(!dispatcher.indicator());
        let on: Dispatch = dispatcher.dispatch("led on").unwrap();
        assert_eq!(on.effect, Some(Effect::Indicator(true)));
        let state: Dispatch = dispatcher.dispatch("state").unwrap();
        assert_eq!(text(&state), Some("1"));
        let _: Dispatch = dispatcher.dispatch("led off").unwrap();
        assert!(!dispatcher.indicator());
        dispatcher.led.done();
    }
}
