//! Driver configuration.

use crate::error::ConfigError;
use crate::registers::{DEFAULT_ACK_SAMPLES, DEFAULT_CLOCK_CYCLE_US, MAX_LEVEL};
use crate::timing::Timing;

/// Configuration for a [`Tm1651`](crate::Tm1651) display.
///
/// Fixed at construction. [`Config::default()`] matches the common
/// 7-segment battery indicator module: an 8 µs bus cycle, seven levels and
/// up to 200 acknowledgment samples per byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Config {
    /// Full bus clock cycle in microseconds. Default: 8. Minimum: 4.
    pub clock_cycle_us: u32,
    /// Highest fill level; requests above it are clamped. Default: 7. Range: 1-7.
    pub max_level: u8,
    /// How many times the data line is sampled for an acknowledgment before
    /// the byte counts as lost. `1` is a single sample. Default: 200.
    pub ack_samples: u16,
    /// Re-send the level after every brightness change while the display is
    /// on, to recover from a desynchronised chip. Default: off.
    pub resync_level_on_brightness: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            clock_cycle_us: DEFAULT_CLOCK_CYCLE_US,
            max_level: MAX_LEVEL,
            ack_samples: DEFAULT_ACK_SAMPLES,
            resync_level_on_brightness: false,
        }
    }
}

impl Config {
    /// Set the full bus cycle in microseconds.
    pub fn with_clock_cycle_us(mut self, clock_cycle_us: u32) -> Self {
        self.clock_cycle_us = clock_cycle_us;
        self
    }

    /// Set the highest fill level (1-7).
    pub fn with_max_level(mut self, max_level: u8) -> Self {
        self.max_level = max_level;
        self
    }

    /// Set the acknowledgment sample bound per byte.
    pub fn with_ack_samples(mut self, ack_samples: u16) -> Self {
        self.ack_samples = ack_samples;
        self
    }

    /// Re-send the level after each brightness change while on.
    pub fn with_resync_level_on_brightness(mut self, resync: bool) -> Self {
        self.resync_level_on_brightness = resync;
        self
    }

    /// Bus timing for the configured clock cycle.
    pub fn timing(&self) -> Timing {
        Timing::from_cycle_us(self.clock_cycle_us)
    }

    /// Check that every field is usable by the bus and the level table.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.clock_cycle_us < 4 {
            return Err(ConfigError::ClockCycleTooShort(self.clock_cycle_us));
        }
        if self.max_level == 0 || self.max_level > MAX_LEVEL {
            return Err(ConfigError::MaxLevelOutOfRange(self.max_level));
        }
        if self.ack_samples == 0 {
            return Err(ConfigError::NoAckSamples);
        }
        Ok(())
    }
}
