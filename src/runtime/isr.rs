use crate::decoder::Ps2Decoder;
use core::cell::RefCell;
use critical_section::Mutex;
use embedded_hal::digital::InputPin;

/// Used to initialize a global static slot for the PS/2 data-line pin, for
/// use with `critical_section`.
///
/// # Returns
/// * An empty mutable ref-cell
///
/// # Example
/// ```rust,ignore
/// use core::cell::RefCell;
/// use critical_section::Mutex;
/// use ps2term::runtime::global_data_pin_init;
/// use some_hal::PD3;
///
/// static PS2_DATA: Mutex<RefCell<Option<PD3>>> = global_data_pin_init::<PD3>();
/// ```
pub const fn global_data_pin_init<P: InputPin>() -> Mutex<RefCell<Option<P>>> {
    Mutex::new(RefCell::new(None))
}

/// Moves the data-line pin into its global slot.
///
/// Call from `main()` before enabling the clock-line interrupt. A pin that
/// was stored earlier is dropped.
///
/// # Example
/// ```rust,ignore
/// fn main() {
///     global_data_pin_setup(&PS2_DATA, data_pin);
/// }
/// ```
pub fn global_data_pin_setup<P: InputPin>(slot: &Mutex<RefCell<Option<P>>>, pin: P) {
    critical_section::with(|cs| {
        let _ = slot.borrow(cs).replace(Some(pin));
    });
}

/// Handles one falling edge on the clock line.
///
/// Samples the data pin and shifts the bit into `decoder` inside a single
/// critical section. Does nothing until the pin has been set up.
///
/// # Example
/// ```rust,ignore
/// #[interrupt]
/// fn EXTI0() {
///     global_clock_edge(&PS2_DECODER, &PS2_DATA);
/// }
/// ```
pub fn global_clock_edge<P: InputPin>(decoder: &Ps2Decoder, slot: &Mutex<RefCell<Option<P>>>) {
    critical_section::with(|cs| {
        if let Some(pin) = slot.borrow_ref_mut(cs).as_mut() {
            let level = pin.is_high().unwrap_or(true);
            decoder.on_edge_in(cs, level);
        }
    });
}
