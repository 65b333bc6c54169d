//! Bus timing derived from a single full clock cycle.

use crate::registers::DEFAULT_CLOCK_CYCLE_US;

/// Half- and quarter-cycle delays for one configured bus cycle.
///
/// These are the only two wait granularities the protocol layer uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Timing {
    cycle_us: u32,
}

impl Timing {
    /// Build timing from a full clock cycle in microseconds.
    ///
    /// Values below 4 µs give a zero quarter cycle; [`Config`](crate::Config)
    /// validation rejects them before they reach the bus.
    pub const fn from_cycle_us(cycle_us: u32) -> Self {
        Self { cycle_us }
    }

    /// Full clock cycle in microseconds.
    pub const fn cycle_us(&self) -> u32 {
        self.cycle_us
    }

    /// Half clock cycle in microseconds (integer division).
    pub const fn half_us(&self) -> u32 {
        self.cycle_us / 2
    }

    /// Quarter clock cycle in microseconds (integer division).
    pub const fn quarter_us(&self) -> u32 {
        self.cycle_us / 4
    }
}

impl Default for Timing {
    fn default() -> Self {
        Self::from_cycle_us(DEFAULT_CLOCK_CYCLE_US)
    }
}
