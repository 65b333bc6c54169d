//! Commands for the display, as plain values.
//!
//! Lets automation or another task queue up display changes without
//! holding the driver, e.g. over a channel to the task that owns it.
//! Applied with [`Tm1651::apply`](crate::Tm1651::apply).

/// One display state change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Command {
    /// Raw brightness, remapped onto the three hardware levels.
    SetBrightness(u8),
    /// Fill level, clamped to the configured maximum.
    SetLevel(u8),
    /// Fill level as a percentage, clamped to 100.
    SetLevelPercent(u8),
    TurnOn,
    TurnOff,
    BlinkOn,
    BlinkOff,
}
