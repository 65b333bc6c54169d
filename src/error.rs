//! Error types for the TM1651 driver.
//!
//! A missing acknowledgment is not an error here: it is counted in
//! [`BusStats`](crate::BusStats) and logged, and the transaction carries on.

use core::fmt;

/// Configuration rejected by [`Config::validate`](crate::Config::validate).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Clock cycle shorter than 4 µs (the quarter cycle would be zero).
    ClockCycleTooShort(u32),

    /// Maximum level outside `1..=7`.
    MaxLevelOutOfRange(u8),

    /// Acknowledgment sample bound of zero.
    NoAckSamples,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ConfigError::ClockCycleTooShort(us) => {
                write!(f, "Clock cycle of {} us is too short (minimum 4)", us)
            }
            ConfigError::MaxLevelOutOfRange(level) => {
                write!(f, "Max level {} out of range (must be 1-7)", level)
            }
            ConfigError::NoAckSamples => write!(f, "Ack sample count must be at least 1"),
        }
    }
}

/// Errors that can occur when driving the display.
#[derive(Debug)]
pub enum Tm1651Error<E> {
    /// Underlying GPIO error on the clock or data line.
    Pin(E),

    /// The driver was constructed with an invalid configuration.
    Config(ConfigError),
}

// Allow ergonomic `?` propagation from raw pin errors.
impl<E> From<E> for Tm1651Error<E> {
    fn from(error: E) -> Self {
        Tm1651Error::Pin(error)
    }
}

impl<E: fmt::Debug> fmt::Display for Tm1651Error<E> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Tm1651Error::Pin(e) => write!(f, "GPIO error: {:?}", e),
            Tm1651Error::Config(e) => write!(f, "Invalid configuration: {}", e),
        }
    }
}

#[cfg(feature = "defmt")]
impl<E: defmt::Format> defmt::Format for Tm1651Error<E> {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Tm1651Error::Pin(e) => defmt::write!(f, "GPIO error: {}", e),
            Tm1651Error::Config(e) => defmt::write!(f, "Invalid configuration: {}", e),
        }
    }
}
