//! Direction-switching data line.
//!
//! embedded-hal 1.0 has no trait for a pin that flips between input and
//! output at runtime, but the acknowledgment handshake needs exactly that.
//! [`DioPin`] adds the two mode switches on top of the standard digital
//! traits, and [`InputMode`] scopes the input phase so the line is always
//! handed back as an output.

use embedded_hal::digital::{InputPin, OutputPin};

/// A GPIO line that can be read and driven, and whose direction can be
/// switched at runtime.
///
/// # Example
///
/// ```ignore
/// struct FlexDio<'d>(embassy_rp::gpio::Flex<'d>);
///
/// impl DioPin for FlexDio<'_> {
///     fn set_as_input(&mut self) -> Result<(), Self::Error> {
///         self.0.set_as_input();
///         Ok(())
///     }
///
///     fn set_as_output(&mut self) -> Result<(), Self::Error> {
///         self.0.set_as_output();
///         Ok(())
///     }
/// }
/// ```
pub trait DioPin: InputPin + OutputPin {
    /// Stop driving the line and let the peripheral control it.
    fn set_as_input(&mut self) -> Result<(), Self::Error>;

    /// Drive the line from the output latch again.
    fn set_as_output(&mut self) -> Result<(), Self::Error>;
}

/// Keeps a [`DioPin`] in input mode for as long as it lives.
///
/// Call [`restore()`](Self::restore) to switch back and observe the result.
/// If the guard is dropped on an early return instead, the switch back is
/// still attempted and any error from it is discarded.
pub(crate) struct InputMode<'a, P: DioPin> {
    pin: &'a mut P,
    restored: bool,
}

impl<'a, P: DioPin> InputMode<'a, P> {
    /// Switch `pin` to input and guard it.
    pub fn enter(pin: &'a mut P) -> Result<Self, P::Error> {
        pin.set_as_input()?;
        Ok(Self {
            pin,
            restored: false,
        })
    }

    /// Sample the line.
    pub fn is_low(&mut self) -> Result<bool, P::Error> {
        self.pin.is_low()
    }

    /// Write a low level into the output latch without driving the line.
    /// It takes effect on [`restore()`](Self::restore).
    pub fn preload_low(&mut self) -> Result<(), P::Error> {
        self.pin.set_low()
    }

    /// Switch the line back to output.
    pub fn restore(mut self) -> Result<(), P::Error> {
        self.restored = true;
        self.pin.set_as_output()
    }
}

impl<P: DioPin> Drop for InputMode<'_, P> {
    fn drop(&mut self) {
        if !self.restored {
            let _ = self.pin.set_as_output();
        }
    }
}
