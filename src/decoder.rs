//! Bit-level PS/2 frame decoder.
//!
//! The keyboard drives both the clock and the data line. On every falling
//! clock edge the data line holds the next bit of an 11-bit frame, least
//! significant bit first. [`Ps2Decoder::on_edge`] is meant to be called from
//! the falling-edge interrupt and shifts that bit into a [`FrameAccumulator`].
//! The polling loop drains finished frames with
//! [`Ps2Decoder::try_take_frame`].
//!
//! Both sides touch the accumulator, so every access happens inside a
//! `critical_section::with` block. A frame is several fields wide (shift
//! register, bit count, ready flag, latched word); the critical section
//! guarantees the consumer never observes a half-cleared accumulator.
//!
//! ## Single-slot mailbox
//!
//! Only one finished frame is buffered. If a second frame completes before
//! the first one is drained, the [`OverrunPolicy`] decides what happens:
//! [`OverrunPolicy::Overwrite`] replaces the stale frame (and counts an
//! overrun), [`OverrunPolicy::Hold`] keeps it and ignores clock edges until
//! the consumer catches up. Neither policy queues.

use core::cell::RefCell;
use core::convert::Infallible;

use critical_section::{CriticalSection, Mutex};
use embedded_hal::digital::InputPin;
use thiserror::Error;

use crate::consts::{PS2_FRAME_BITS, PS2_FRAME_MASK, PS2_PARITY_BIT, PS2_START_BIT, PS2_STOP_BIT};

/// Reasons a frame fails [`Frame::check`].
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub enum FrameError {
    /// The start bit was high.
    #[error("start bit not low")]
    StartBit,
    /// The stop bit was low.
    #[error("stop bit not high")]
    StopBit,
    /// Data bits plus parity bit did not contain an odd number of ones.
    #[error("parity mismatch")]
    Parity,
}

/// One complete 11-bit PS/2 frame, as clocked in (bit 0 is the start bit).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub struct Frame(u16);

impl Frame {
    /// Wraps a raw frame word. Bits above the eleventh are discarded.
    pub const fn from_bits(bits: u16) -> Self {
        Self(bits & PS2_FRAME_MASK)
    }

    /// Builds a well-formed frame (start 0, odd parity, stop 1) around `data`.
    pub const fn encode(data: u8) -> Self {
        let parity = (data.count_ones() % 2 == 0) as u16;
        Self(((data as u16) << 1) | (parity << PS2_PARITY_BIT) | (1 << PS2_STOP_BIT))
    }

    /// The raw 11-bit word.
    pub const fn bits(self) -> u16 {
        self.0
    }

    /// The eight data bits (bits 1..=8).
    pub const fn data(self) -> u8 {
        (self.0 >> 1) as u8
    }

    /// The start bit.
    pub const fn start_bit(self) -> bool {
        self.0 & (1 << PS2_START_BIT) != 0
    }

    /// The parity bit.
    pub const fn parity_bit(self) -> bool {
        self.0 & (1 << PS2_PARITY_BIT) != 0
    }

    /// The stop bit.
    pub const fn stop_bit(self) -> bool {
        self.0 & (1 << PS2_STOP_BIT) != 0
    }

    /// Returns the data byte if the framing and odd parity are valid.
    pub fn check(self) -> Result<u8, FrameError> {
        if self.start_bit() {
            return Err(FrameError::StartBit);
        }
        if !self.stop_bit() {
            return Err(FrameError::StopBit);
        }
        let ones = self.data().count_ones() + self.parity_bit() as u32;
        if ones % 2 == 0 {
            return Err(FrameError::Parity);
        }
        Ok(self.data())
    }
}

/// What the accumulator does when a frame completes while the previous one
/// has not been drained yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub enum OverrunPolicy {
    /// The newer frame replaces the undrained one.
    #[default]
    Overwrite,
    /// The undrained frame is kept; edges are ignored until it is taken.
    Hold,
}

/// Counters kept by the accumulator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub struct DecoderStats {
    /// Frames completed since startup.
    pub frames: u16,
    /// Frames lost because the mailbox was still full.
    pub overruns: u16,
}

/// Interrupt-owned shift register plus a one-frame mailbox.
///
/// Not shared directly; [`Ps2Decoder`] wraps it in a critical-section mutex.
#[derive(Debug)]
pub struct FrameAccumulator {
    /// Bits of the frame currently being clocked in.
    shift: u16,
    /// Number of bits in `shift` (0..=11).
    count: u8,
    /// Last completed frame, valid while `ready` is set.
    latched: u16,
    /// A completed frame waits in `latched`.
    ready: bool,
    policy: OverrunPolicy,
    stats: DecoderStats,
}

impl FrameAccumulator {
    /// Creates an empty accumulator.
    pub const fn new(policy: OverrunPolicy) -> Self {
        Self {
            shift: 0,
            count: 0,
            latched: 0,
            ready: false,
            policy,
            stats: DecoderStats {
                frames: 0,
                overruns: 0,
            },
        }
    }

    /// Shifts in one data bit. Bounded time, no I/O.
    pub fn push_bit(&mut self, data_high: bool) {
        if self.ready && self.policy == OverrunPolicy::Hold {
            return;
        }
        if self.count < PS2_FRAME_BITS {
            if data_high {
                self.shift |= 1 << self.count;
            }
            self.count += 1;
        }
        if self.count == PS2_FRAME_BITS {
            if self.ready {
                self.stats.overruns = self.stats.overruns.wrapping_add(1);
            }
            self.latched = self.shift;
            self.ready = true;
            self.stats.frames = self.stats.frames.wrapping_add(1);
            self.shift = 0;
            self.count = 0;
        }
    }

    /// Takes the completed frame, if any, and empties the mailbox.
    pub fn take(&mut self) -> Option<Frame> {
        if !self.ready {
            return None;
        }
        let frame = Frame::from_bits(self.latched);
        self.latched = 0;
        self.ready = false;
        if self.policy == OverrunPolicy::Hold {
            self.shift = 0;
            self.count = 0;
        }
        Some(frame)
    }

    /// Number of bits of the in-flight frame.
    pub fn bit_count(&self) -> u8 {
        self.count
    }

    /// Whether a completed frame waits to be taken.
    pub fn is_ready(&self) -> bool {
        self.ready
    }

    /// Drops any partial frame and any waiting frame.
    pub fn reset(&mut self) {
        self.shift = 0;
        self.count = 0;
        self.latched = 0;
        self.ready = false;
    }
}

/// The PS/2 decoder shared between the clock-edge interrupt and the polling
/// loop.
///
/// `new` is `const`, so the decoder can live in a plain `static`:
///
/// ```rust
/// use ps2term::decoder::{OverrunPolicy, Ps2Decoder};
///
/// static PS2: Ps2Decoder = Ps2Decoder::new(OverrunPolicy::Overwrite);
///
/// // falling edge on the clock line, data line low (start bit)
/// PS2.on_edge(false);
/// assert_eq!(PS2.try_take_frame(), None);
/// ```
#[derive(Debug)]
pub struct Ps2Decoder {
    inner: Mutex<RefCell<FrameAccumulator>>,
}

impl Default for Ps2Decoder {
    fn default() -> Self {
        Self::new(OverrunPolicy::default())
    }
}

impl Ps2Decoder {
    /// Creates a decoder with an empty accumulator.
    pub const fn new(policy: OverrunPolicy) -> Self {
        Self {
            inner: Mutex::new(RefCell::new(FrameAccumulator::new(policy))),
        }
    }

    /// Feeds one falling clock edge carrying the given data-line level.
    ///
    /// Interrupt context only.
    pub fn on_edge(&self, data_high: bool) {
        critical_section::with(|cs| self.on_edge_in(cs, data_high));
    }

    /// Same as [`on_edge`](Self::on_edge) for callers already holding a
    /// critical section.
    pub fn on_edge_in(&self, cs: CriticalSection<'_>, data_high: bool) {
        self.inner.borrow_ref_mut(cs).push_bit(data_high);
    }

    /// Samples the data pin and feeds the level as one clock edge.
    ///
    /// A pin read error is treated as the pulled-up idle level (high).
    pub fn sample_edge<P: InputPin>(&self, data: &mut P) {
        let level = data.is_high().unwrap_or(true);
        self.on_edge(level);
    }

    /// Takes the completed frame, if any. Consumer context only.
    pub fn take_frame(&self) -> Option<Frame> {
        critical_section::with(|cs| self.inner.borrow_ref_mut(cs).take())
    }

    /// Takes the data byte of the completed frame, if any.
    ///
    /// Parity, start and stop bits are not validated here; see
    /// [`Frame::check`].
    pub fn try_take_frame(&self) -> Option<u8> {
        self.take_frame().map(Frame::data)
    }

    /// Non-blocking read of the next byte, for use with `nb::block!`.
    pub fn read(&self) -> nb::Result<u8, Infallible> {
        self.try_take_frame().ok_or(nb::Error::WouldBlock)
    }

    /// Snapshot of the decoder counters.
    pub fn stats(&self) -> DecoderStats {
        critical_section::with(|cs| self.inner.borrow_ref(cs).stats)
    }

    /// Number of bits of the frame currently being clocked in.
    pub fn bit_count(&self) -> u8 {
        critical_section::with(|cs| self.inner.borrow_ref(cs).bit_count())
    }

    /// Discards partial and waiting frames.
    pub fn reset(&self) {
        critical_section::with(|cs| self.inner.borrow_ref_mut(cs).reset());
    }
}
