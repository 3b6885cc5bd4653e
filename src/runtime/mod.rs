//! Interrupt and polling-loop glue.
//!
//! Helpers for the two execution contexts of the terminal. Two approaches are
//! offered: wiring the decoder to a falling-edge interrupt through a global
//! `critical_section` mutex (`edge-isr` feature, default), and a blocking
//! polling loop paced by an `embedded_hal::delay::DelayNs` (`delay-loop`
//! feature).
//!
//! Contains:
//! - `global_data_pin_init` / `global_data_pin_setup`: a static slot for the
//!   data-line pin (feature `edge-isr`)
//! - `global_clock_edge` and `ps2_clock_edge!()`: the falling-edge handler body
//!   (feature `edge-isr`)
//! - `run_terminal_loop`: the forever-polling consumer (feature `delay-loop`)
//!
//! The PS/2 clock runs at 10-16.7 kHz, so a frame takes roughly 1 ms. The
//! polling loop only needs to drain each frame before the next one completes;
//! see [`max_poll_interval_ms`].

#[cfg(feature = "delay-loop")]
mod delay;
#[cfg_attr(feature = "delay-loop", allow(unused_imports))]
#[cfg(feature = "delay-loop")]
pub use delay::*;

#[cfg(feature = "edge-isr")]
mod isr;
#[cfg_attr(feature = "edge-isr", allow(unused_imports))]
#[cfg(feature = "edge-isr")]
pub use isr::*;

#[cfg(feature = "edge-isr")]
mod macros;
#[cfg_attr(feature = "edge-isr", allow(unused_imports))]
#[cfg(feature = "edge-isr")]
pub use macros::*;

/// Lowest clock frequency a PS/2 device may use, in Hz.
pub const PS2_CLOCK_MIN_HZ: u32 = 10_000;

/// Highest clock frequency a PS/2 device may use, in Hz.
pub const PS2_CLOCK_MAX_HZ: u32 = 16_700;

/// Time the keyboard needs to clock out one frame at `clock_hz`, in
/// microseconds.
pub const fn frame_time_us(clock_hz: u32) -> u32 {
    (crate::consts::PS2_FRAME_BITS as u32 * 1_000_000).div_ceil(clock_hz)
}

/// Longest poll interval, in milliseconds, that still drains every frame of
/// a back-to-back byte stream at `clock_hz`. Never less than one.
pub const fn max_poll_interval_ms(clock_hz: u32) -> u32 {
    let ms = frame_time_us(clock_hz) / 1_000;
    if ms == 0 { 1 } else { ms }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_time() {
        assert_eq!(frame_time_us(PS2_CLOCK_MIN_HZ), 1_100);
        assert_eq!(frame_time_us(PS2_CLOCK_MAX_HZ), 659);
    }

    #[test]
    fn test_max_poll_interval_is_at_least_one() {
        assert_eq!(max_poll_interval_ms(PS2_CLOCK_MIN_HZ), 1);
        assert_eq!(max_poll_interval_ms(PS2_CLOCK_MAX_HZ), 1);
        assert_eq!(max_poll_interval_ms(1_000), 11);
    }
}
