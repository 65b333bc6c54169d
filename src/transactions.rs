//! TM1651 command transactions.
//!
//! Each transaction is framed by a start and a stop condition. A byte the
//! chip does not acknowledge is counted and logged by the bus, and the rest
//! of the transaction is still sent so the closing stop condition returns
//! the bus to idle. The returned flag is `true` only if every byte in the
//! transaction was acknowledged.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;

use crate::bus::TwoWireBus;
use crate::error::Tm1651Error;
use crate::pin::DioPin;
use crate::registers::{
    ADDR_AUTO_INCREMENT, ADDR_FIXED, ADDR_FRAME_START, ADDR_LEVEL, FRAME_REGISTERS,
};

impl<CLK, DIO, D, E> TwoWireBus<CLK, DIO, D>
where
    CLK: OutputPin<Error = E>,
    DIO: DioPin<Error = E>,
    D: DelayNs,
{
    /// Send `bytes` as one framed transaction.
    pub fn transaction(&mut self, bytes: &[u8]) -> Result<bool, Tm1651Error<E>> {
        self.start()?;
        let mut all_acked = true;
        for &byte in bytes {
            // No early exit on a missed ack: the stop condition must follow.
            all_acked &= self.transmit_byte(byte)?;
        }
        self.stop()?;
        Ok(all_acked)
    }

    /// Select fixed-address writes.
    pub fn set_fixed_addressing(&mut self) -> Result<bool, Tm1651Error<E>> {
        self.transaction(&[ADDR_FIXED])
    }

    /// Write a bar pattern into the level register.
    ///
    /// Sends the fixed-addressing command first, then the register address
    /// and `pattern` in a second transaction.
    pub fn write_level_pattern(&mut self, pattern: u8) -> Result<bool, Tm1651Error<E>> {
        let mode = self.set_fixed_addressing()?;
        let data = self.transaction(&[ADDR_LEVEL, pattern])?;
        Ok(mode && data)
    }

    /// Write the display control byte (`DISPLAY_ON`/`DISPLAY_OFF` OR'd with
    /// a hardware brightness code).
    pub fn write_display_control(&mut self, control: u8) -> Result<bool, Tm1651Error<E>> {
        self.transaction(&[control])
    }

    /// Fill every overlay register with `pattern` using auto-increment
    /// addressing.
    pub fn write_frame(&mut self, pattern: u8) -> Result<bool, Tm1651Error<E>> {
        let mode = self.transaction(&[ADDR_AUTO_INCREMENT])?;

        let mut bytes = [pattern; FRAME_REGISTERS + 1];
        bytes[0] = ADDR_FRAME_START;
        let data = self.transaction(&bytes)?;

        Ok(mode && data)
    }
}
