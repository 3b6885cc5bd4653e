/// Declares a static global `PS2_DECODER` shared between the clock-edge
/// interrupt and the polling loop.
///
/// The decoder wraps its state in a `critical_section` mutex, so the static
/// needs no further synchronisation.
///
/// # Arguments
/// - `$policy` (optional): an [`OverrunPolicy`](crate::decoder::OverrunPolicy),
///   `Overwrite` when omitted
///
/// # Example
/// ```rust
/// ps2term::init_ps2_decoder!();
///
/// fn main() {
///     assert_eq!(PS2_DECODER.try_take_frame(), None);
/// }
/// ```
#[macro_export]
macro_rules! init_ps2_decoder {
    () => {
        $crate::init_ps2_decoder!($crate::decoder::OverrunPolicy::Overwrite);
    };
    ( $policy:expr ) => {
        pub static PS2_DECODER: $crate::decoder::Ps2Decoder =
            $crate::decoder::Ps2Decoder::new($policy);
    };
}

/// Feeds one falling clock edge into the global `PS2_DECODER`.
///
/// Intended for the body of the clock-line interrupt handler.
///
/// # Arguments
/// - `$data`: a mutable reference to the data-line pin
///   (must implement `InputPin`), or a `bool` level with the `level` form
///
/// # Example
/// ```rust,ignore
/// #[interrupt]
/// fn EXTI0() {
///     ps2_clock_edge!(&mut data_pin);
/// }
/// ```
///
/// # Notes
/// - This macro assumes `PS2_DECODER` was declared with `init_ps2_decoder!`.
/// - Bounded time: one pin read and a few shifts inside a critical section.
#[macro_export]
macro_rules! ps2_clock_edge {
    ( level $level:expr ) => {
        PS2_DECODER.on_edge($level)
    };
    ( $data:expr ) => {
        PS2_DECODER.sample_edge($data)
    };
}
