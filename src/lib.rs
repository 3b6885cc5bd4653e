//! # ps2term
//!
//! A portable, no_std Rust terminal for PS/2 keyboards and small text
//! displays, in the spirit of the classic "keyboard + TFT + microcontroller"
//! serial terminal.
//!
//! This crate implements:
//! - a bit-level PS/2 decoder fed from a clock-line falling-edge interrupt
//! - interrupt-safe frame hand-off with `critical-section`
//! - scan code set 2 translation with release and auto-repeat filtering
//! - a line editor, a scrolling line display and a tiny command shell
//! - `embedded-hal` traits for the data pin, the indicator pin and delays
//!
//! ## Crate features
//! | Feature              | Description |
//! |----------------------|-------------|
//! | `std`                | Disables `#![no_std]` support (host builds and tests) |
//! | `edge-isr` (default) | Global-static helpers and macros for the clock-edge interrupt |
//! | `delay-loop`         | Blocking polling loop driven by `embedded_hal::delay::DelayNs` |
//! | `defmt-0-3`          | Uses `defmt` logging |
//! | `log`                | Uses `log` logging |
//!
//! ## Data flow
//!
//! ```text
//! clock edge ──► Ps2Decoder ──► ScancodeTranslator ──► InputLineEditor
//!  (interrupt)    (mailbox)          (polling loop)          │ Enter
//!                                                            ▼
//!      RenderBackend ◄── ScrollingDisplayBuffer ◄── CommandDispatcher
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use ps2term::terminal::{Terminal, TerminalConfig};
//!
//! ps2term::init_ps2_decoder!();
//!
//! #[interrupt]
//! fn EXTI0() {
//!     ps2term::runtime::global_clock_edge(&PS2_DECODER, &PS2_DATA);
//! }
//!
//! fn main() -> ! {
//!     let mut terminal = Terminal::new(tft, led, serial, TerminalConfig::default()).unwrap();
//!     ps2term::runtime::run_terminal_loop(&mut terminal, &PS2_DECODER, &mut delay, 1);
//! }
//! ```
//!
//! ## Integration Notes
//!
//! - Register the edge handler for falling edges of the clock line only;
//!   both lines need pull-ups.
//! - Only one decoder should be fed from the interrupt.
//! - The decoder buffers a single frame; poll at least once per millisecond.
//!
//! --
//! Designed for `#![no_std]` use in resource-constrained embedded environments.

#![deny(
    bad_style,
    dead_code,
    improper_ctypes,
    non_shorthand_field_patterns,
    no_mangle_generic_items,
    overflowing_literals,
    path_statements,
    patterns_in_fns_without_body,
    unconditional_recursion,
    unused,
    while_true,
    missing_debug_implementations,
    missing_docs,
    trivial_casts,
    trivial_numeric_casts,
    unused_extern_crates,
    unused_import_braces,
    unused_qualifications,
    unused_results
)]
#![cfg_attr(not(feature = "std"), no_std)]

pub use critical_section;
pub use heapless;

#[macro_use]
mod fmt;

pub mod backend;
pub mod commands;
pub mod consts;
pub mod decoder;
pub mod display;
pub mod editor;
pub mod runtime;
pub mod scancode;
pub mod terminal;

#[cfg(test)]
pub(crate) mod testutil;
