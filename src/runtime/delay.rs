use crate::backend::RenderBackend;
use crate::decoder::Ps2Decoder;
use crate::terminal::Terminal;
use core::fmt::Write;
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;

/// Runs the polling loop of the terminal forever.
///
/// Each iteration drains at most one frame from `decoder`, lets the terminal
/// process it, and then sleeps `poll_ms` milliseconds on `delay`. The delay
/// only bounds the polling frequency; it plays no part in correctness as long
/// as it stays below [`max_poll_interval_ms`](super::max_poll_interval_ms).
///
/// # Arguments
/// - `terminal`: the owned terminal state
/// - `decoder`: the decoder fed by the clock-edge interrupt
/// - `delay`: a delay provider implementing `DelayNs`, typically from the HAL
/// - `poll_ms`: pause between iterations, e.g. [`DEFAULT_POLL_MS`](crate::consts::DEFAULT_POLL_MS)
///
/// # Example
/// ```rust,ignore
/// use ps2term::runtime::run_terminal_loop;
///
/// ps2term::init_ps2_decoder!();
///
/// let mut terminal = Terminal::new(tft, led, serial, TerminalConfig::default())?;
/// run_terminal_loop(&mut terminal, &PS2_DECODER, &mut delay, 1);
/// ```
///
/// # Notes
/// - This loop never returns; it is intended for single-purpose firmware.
/// - Terminal errors (a failed draw, a failed indicator write) are logged and
///   the loop carries on with the next frame.
pub fn run_terminal_loop<B, LED, D, DL, const C: usize, const L: usize>(
    terminal: &mut Terminal<B, LED, D, C, L>,
    decoder: &Ps2Decoder,
    delay: &mut DL,
    poll_ms: u32,
) -> !
where
    B: RenderBackend,
    LED: OutputPin,
    D: Write,
    DL: DelayNs,
{
    loop {
        poll_once(terminal, decoder, delay, poll_ms);
    }
}

fn poll_once<B, LED, D, DL, const C: usize, const L: usize>(
    terminal: &mut Terminal<B, LED, D, C, L>,
    decoder: &Ps2Decoder,
    delay: &mut DL,
    poll_ms: u32,
) where
    B: RenderBackend,
    LED: OutputPin,
    D: Write,
    DL: DelayNs,
{
    if let Err(e) = terminal.poll(decoder) {
        warn!("terminal error: {}", e);
    }
    let stats = decoder.stats();
    if stats.overruns != 0 {
        debug!("frame overruns so far: {}", stats.overruns);
    }
    delay.delay_ms(poll_ms);
}
