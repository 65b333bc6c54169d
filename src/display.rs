//! High-level interface for a TM1651 level indicator.
//!
//! [`Tm1651`] owns the logical display state (fill level, brightness,
//! power, overlay) and re-transmits whatever part of it a setter changed.
//! While the display is off only the power state is pushed to the chip;
//! level and brightness are remembered and replayed by
//! [`turn_on()`](Tm1651::turn_on).

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;

use crate::bus::{BusStats, TwoWireBus};
use crate::command::Command;
use crate::config::Config;
use crate::error::Tm1651Error;
use crate::pin::DioPin;
use crate::registers::{
    level_pattern, BRIGHTNESS_BRIGHTEST, BRIGHTNESS_DARKEST, BRIGHTNESS_TYPICAL, DISPLAY_OFF,
    DISPLAY_ON, FRAME_SEGMENTS,
};

/// Named raw brightness inputs for [`Tm1651::set_brightness`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Brightness {
    Darkest = 1,
    Typical = 2,
    Brightest = 3,
}

impl From<Brightness> for u8 {
    fn from(brightness: Brightness) -> Self {
        brightness as u8
    }
}

/// The three brightness codes the driver sends to the chip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HardwareBrightness {
    Darkest,
    Typical,
    Brightest,
}

impl HardwareBrightness {
    /// Map a raw brightness value onto a hardware class.
    ///
    /// `0` and `1` are darkest, `2` is typical, anything from `3` up is
    /// brightest.
    pub fn from_raw(raw: u8) -> Self {
        match raw {
            0 | 1 => HardwareBrightness::Darkest,
            2 => HardwareBrightness::Typical,
            _ => HardwareBrightness::Brightest,
        }
    }

    /// The 3-bit code OR'd into the display control byte.
    pub fn code(self) -> u8 {
        match self {
            HardwareBrightness::Darkest => BRIGHTNESS_DARKEST,
            HardwareBrightness::Typical => BRIGHTNESS_TYPICAL,
            HardwareBrightness::Brightest => BRIGHTNESS_BRIGHTEST,
        }
    }
}

/// Scale a 0-100 percentage onto `0..=max_level`, rounding half up.
///
/// Percentages above 100 are clamped first.
pub fn level_from_percent(percent: u8, max_level: u8) -> u8 {
    let percent = u16::from(percent.min(100));
    ((percent * u16::from(max_level) + 50) / 100) as u8
}

/// High-level interface for a TM1651 LED level indicator.
///
/// # Example
///
/// ```ignore
/// use tm1651_driver::{Config, Tm1651};
///
/// let mut display = Tm1651::new(clk, dio, delay, Config::default())?;
/// display.setup()?;
/// display.set_level_percent(50)?; // four of seven segments
/// display.set_brightness(3)?;
/// ```
pub struct Tm1651<CLK, DIO, D> {
    bus: TwoWireBus<CLK, DIO, D>,
    config: Config,
    level: u8,
    brightness: HardwareBrightness,
    display_on: bool,
    blink_on: bool,
}

impl<CLK, DIO, D, E> Tm1651<CLK, DIO, D>
where
    CLK: OutputPin<Error = E>,
    DIO: DioPin<Error = E>,
    D: DelayNs,
{
    /// Create a display driver.
    ///
    /// # Arguments
    /// * `clk`: clock line (takes ownership for exclusive access)
    /// * `dio`: data line, must support runtime direction switching
    /// * `delay`: microsecond delay provider
    /// * `config`: bus timing and level range
    ///
    /// No pin traffic is generated; call [`setup()`](Self::setup) next.
    ///
    /// # Errors
    /// [`Tm1651Error::Config`] if `config` fails validation.
    pub fn new(clk: CLK, dio: DIO, delay: D, config: Config) -> Result<Self, Tm1651Error<E>> {
        config.validate().map_err(Tm1651Error::Config)?;

        Ok(Self {
            bus: TwoWireBus::new(clk, dio, delay, config.timing(), config.ack_samples),
            config,
            level: 0,
            brightness: HardwareBrightness::Typical,
            display_on: true,
            blink_on: false,
        })
    }

    /// Configure the lines, then clear the bar and switch the display on at
    /// typical brightness.
    pub fn setup(&mut self) -> Result<(), Tm1651Error<E>> {
        self.bus.init()?;

        self.brightness = HardwareBrightness::Typical;
        self.display_level()?;
        self.update_power(DISPLAY_ON)?;
        Ok(())
    }

    /// Emit the driver configuration to the log.
    pub fn log_config(&self) {
        #[cfg(feature = "defmt")]
        defmt::info!(
            "TM1651 level display: cycle={}us max_level={} ack_samples={} resync={}",
            self.config.clock_cycle_us,
            self.config.max_level,
            self.config.ack_samples,
            self.config.resync_level_on_brightness
        );
    }

    // -----------------------------------------------------------------------
    // Setters
    // -----------------------------------------------------------------------

    /// Set the brightness from a raw value (see
    /// [`HardwareBrightness::from_raw`]). A [`Brightness`] converts with
    /// `.into()`.
    pub fn set_brightness(&mut self, raw: u8) -> Result<(), Tm1651Error<E>> {
        self.brightness = HardwareBrightness::from_raw(raw);
        if self.display_on {
            self.update_power(DISPLAY_ON)?;
            if self.config.resync_level_on_brightness {
                self.display_level()?;
            }
        }
        Ok(())
    }

    /// Set the fill level, clamped to `0..=max_level`.
    pub fn set_level(&mut self, level: u8) -> Result<(), Tm1651Error<E>> {
        self.level = level.min(self.config.max_level);
        if self.display_on {
            self.display_level()?;
        }
        Ok(())
    }

    /// Set the fill level from a percentage, clamped to `0..=100`.
    pub fn set_level_percent(&mut self, percent: u8) -> Result<(), Tm1651Error<E>> {
        self.set_level(level_from_percent(percent, self.config.max_level))
    }

    /// Switch the display off. Level and brightness are kept.
    pub fn turn_off(&mut self) -> Result<(), Tm1651Error<E>> {
        self.display_on = false;
        self.update_power(DISPLAY_OFF)
    }

    /// Switch the display on, replaying the current level first so no stale
    /// pattern shows.
    pub fn turn_on(&mut self) -> Result<(), Tm1651Error<E>> {
        self.display_on = true;
        self.display_level()?;
        self.update_power(DISPLAY_ON)
    }

    /// Light the overlay segments. Sent even while the display is off.
    pub fn set_blink_on(&mut self) -> Result<(), Tm1651Error<E>> {
        self.set_blink(true)
    }

    /// Clear the overlay segments.
    pub fn set_blink_off(&mut self) -> Result<(), Tm1651Error<E>> {
        self.set_blink(false)
    }

    fn set_blink(&mut self, on: bool) -> Result<(), Tm1651Error<E>> {
        self.blink_on = on;
        let pattern = if on { FRAME_SEGMENTS } else { 0 };
        self.bus.write_frame(pattern)?;
        Ok(())
    }

    /// Route a [`Command`] to the matching setter.
    pub fn apply(&mut self, command: Command) -> Result<(), Tm1651Error<E>> {
        match command {
            Command::SetBrightness(raw) => self.set_brightness(raw),
            Command::SetLevel(level) => self.set_level(level),
            Command::SetLevelPercent(percent) => self.set_level_percent(percent),
            Command::TurnOn => self.turn_on(),
            Command::TurnOff => self.turn_off(),
            Command::BlinkOn => self.set_blink_on(),
            Command::BlinkOff => self.set_blink_off(),
        }
    }

    // -----------------------------------------------------------------------
    // Diagnostics
    // -----------------------------------------------------------------------

    /// Cumulative attempted/failed byte counts.
    pub fn stats(&self) -> BusStats {
        self.bus.stats()
    }

    /// Zero the attempted/failed byte counts.
    pub fn reset_error_counters(&mut self) {
        self.bus.reset_stats();
    }

    // -----------------------------------------------------------------------
    // State accessors
    // -----------------------------------------------------------------------

    /// Current fill level, `0..=max_level`.
    pub fn level(&self) -> u8 {
        self.level
    }

    /// Highest fill level accepted by [`set_level()`](Self::set_level).
    pub fn max_level(&self) -> u8 {
        self.config.max_level
    }

    /// Hardware brightness used by the next display control write.
    pub fn brightness(&self) -> HardwareBrightness {
        self.brightness
    }

    /// Whether the display is switched on.
    pub fn is_on(&self) -> bool {
        self.display_on
    }

    /// Whether the overlay segments are lit.
    pub fn is_blinking(&self) -> bool {
        self.blink_on
    }

    /// Give back the clock pin, data pin and delay provider.
    pub fn release(self) -> (CLK, DIO, D) {
        self.bus.release()
    }

    // -----------------------------------------------------------------------
    // Transmission
    // -----------------------------------------------------------------------

    fn display_level(&mut self) -> Result<(), Tm1651Error<E>> {
        if !self.bus.write_level_pattern(level_pattern(self.level))? {
            #[cfg(feature = "defmt")]
            defmt::debug!("TM1651: level {} not fully acknowledged", self.level);
        }
        Ok(())
    }

    fn update_power(&mut self, base: u8) -> Result<(), Tm1651Error<E>> {
        self.bus.write_display_control(base | self.brightness.code())?;
        Ok(())
    }
}
