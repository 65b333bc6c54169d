//! Low-level two-wire protocol driver.
//!
//! Implements the TM1651 signaling primitives: start/stop conditions,
//! LSB-first bit shifting and the acknowledgment handshake with a bounded
//! sampling window. The bus looks like I2C but has no device addressing and
//! clocks data out least significant bit first.
//!
//! Timing contract: DIO only changes while CLK is low, except inside the
//! start and stop conditions where the change while CLK is high is the
//! signal itself.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;

use crate::error::Tm1651Error;
use crate::pin::{DioPin, InputMode};
use crate::timing::Timing;

/// Cumulative transmission counters.
///
/// Diagnostic only; nothing in the driver reads them back.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BusStats {
    /// Bytes clocked out since the last reset.
    pub attempted: u32,
    /// Bytes the chip did not acknowledge since the last reset.
    pub failed: u32,
}

/// Two-wire bus master driving one CLK and one DIO line.
///
/// Owns both pins and the delay provider for exclusive access.
pub struct TwoWireBus<CLK, DIO, D> {
    clk: CLK,
    dio: DIO,
    delay: D,
    timing: Timing,
    ack_samples: u16,
    stats: BusStats,
}

impl<CLK, DIO, D, E> TwoWireBus<CLK, DIO, D>
where
    CLK: OutputPin<Error = E>,
    DIO: DioPin<Error = E>,
    D: DelayNs,
{
    /// Create a bus master.
    ///
    /// # Arguments
    /// * `clk`: clock line, output only
    /// * `dio`: data line, switched to input for acknowledgment sampling
    /// * `delay`: microsecond delay provider
    /// * `timing`: half/quarter cycle delays
    /// * `ack_samples`: acknowledgment samples per byte (treated as at least 1)
    ///
    /// No pin traffic is generated.
    pub fn new(clk: CLK, dio: DIO, delay: D, timing: Timing, ack_samples: u16) -> Self {
        Self {
            clk,
            dio,
            delay,
            timing,
            ack_samples: ack_samples.max(1),
            stats: BusStats::default(),
        }
    }

    /// Put the data line in output mode. The clock line is output-only.
    pub fn init(&mut self) -> Result<(), Tm1651Error<E>> {
        self.dio.set_as_output()?;
        Ok(())
    }

    /// Half/quarter cycle delays in use.
    pub fn timing(&self) -> Timing {
        self.timing
    }

    /// Acknowledgment samples taken per byte before giving up.
    pub fn ack_samples(&self) -> u16 {
        self.ack_samples
    }

    /// Attempted/failed byte counts since the last reset.
    pub fn stats(&self) -> BusStats {
        self.stats
    }

    /// Zero both counters.
    pub fn reset_stats(&mut self) {
        self.stats = BusStats::default();
    }

    /// Give back the pins and the delay provider.
    pub fn release(self) -> (CLK, DIO, D) {
        (self.clk, self.dio, self.delay)
    }

    // -----------------------------------------------------------------------
    // Signaling layer
    // -----------------------------------------------------------------------

    /// Frame a transmission boundary: DIO goes to `level`, CLK rises, then
    /// DIO flips while CLK is high.
    fn delineate(&mut self, level: bool) -> Result<(), Tm1651Error<E>> {
        self.dio.set_state(level.into())?;
        self.delay.delay_us(self.timing.half_us());

        self.clk.set_high()?;
        self.delay.delay_us(self.timing.quarter_us());

        self.dio.set_state((!level).into())?;
        self.delay.delay_us(self.timing.quarter_us());
        Ok(())
    }

    /// Start condition: DIO falls while CLK is high.
    pub fn start(&mut self) -> Result<(), Tm1651Error<E>> {
        self.delineate(true)
    }

    /// Stop condition: DIO rises while CLK is high.
    pub fn stop(&mut self) -> Result<(), Tm1651Error<E>> {
        self.delineate(false)
    }

    /// First half of a bit cycle: CLK low, then present `bit` on DIO.
    pub fn send_bit(&mut self, bit: bool) -> Result<(), Tm1651Error<E>> {
        self.clk.set_low()?;
        self.delay.delay_us(self.timing.quarter_us());

        self.dio.set_state(bit.into())?;
        self.delay.delay_us(self.timing.quarter_us());
        Ok(())
    }

    /// Second half of a bit cycle: CLK high, no sampling.
    pub fn raise_clock(&mut self) -> Result<(), Tm1651Error<E>> {
        self.clk.set_high()?;
        self.delay.delay_us(self.timing.half_us());
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Byte transceiver
    // -----------------------------------------------------------------------

    /// Shift out one byte LSB first and run the acknowledgment handshake.
    ///
    /// Returns `Ok(true)` if the chip pulled DIO low within
    /// `ack_samples` samples and `Ok(false)` otherwise. Either way the bus
    /// is left with CLK low, DIO low and DIO in output mode.
    ///
    /// # Errors
    /// [`Tm1651Error::Pin`] on a GPIO failure. A missing acknowledgment is
    /// never an error.
    pub fn transmit_byte(&mut self, value: u8) -> Result<bool, Tm1651Error<E>> {
        let mut data = value;
        for _ in 0..8 {
            self.send_bit(data & 0x01 != 0)?;
            self.raise_clock()?;
            data >>= 1;
        }

        // Ninth clock: release DIO high while CLK is low, the chip answers
        // by pulling it low.
        self.send_bit(true)?;
        self.clk.set_high()?;
        self.delay.delay_us(self.timing.quarter_us());

        let acknowledged = self.sample_ack()?;

        self.delay.delay_us(self.timing.quarter_us());
        self.clk.set_low()?;
        if !acknowledged {
            self.dio.set_low()?;
        }

        self.record(value, acknowledged);
        Ok(acknowledged)
    }

    /// Sample DIO in input mode until it reads low or the bound runs out.
    ///
    /// DIO comes back as an output at the level last seen on the line, so
    /// switching direction with CLK high is not a start or stop condition.
    fn sample_ack(&mut self) -> Result<bool, Tm1651Error<E>> {
        let mut line = InputMode::enter(&mut self.dio)?;

        let mut acknowledged = false;
        for _ in 0..self.ack_samples {
            if line.is_low()? {
                acknowledged = true;
                break;
            }
        }

        if acknowledged {
            // The chip holds DIO low; the latch still has the released 1.
            line.preload_low()?;
        }
        line.restore()?;
        Ok(acknowledged)
    }

    fn record(&mut self, _value: u8, acknowledged: bool) {
        self.stats.attempted = self.stats.attempted.wrapping_add(1);
        if !acknowledged {
            self.stats.failed = self.stats.failed.wrapping_add(1);

            #[cfg(feature = "defmt")]
            defmt::warn!(
                "TM1651: no ack for byte {=u8:#x} ({} of {} bytes failed)",
                _value,
                self.stats.failed,
                self.stats.attempted
            );
        }
    }
}
