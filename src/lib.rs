//! Blocking driver for the TM1651 LED level indicator.
//!
//! The TM1651 is driven over a two-wire bus (CLK + DIO) that resembles I2C
//! but has no addressing and shifts data LSB first. This crate bit-bangs
//! that bus on top of `embedded-hal` 1.0 GPIO and delay traits.
//!
//! # Architecture
//!
//! - **[`TwoWireBus`]** - start/stop conditions, bit and byte transfer, and
//!   the bounded acknowledgment handshake, plus the TM1651 command
//!   transactions built on them.
//! - **[`Tm1651`]** - the display state machine: level, brightness,
//!   power and overlay, each setter pushing only what changed.
//!
//! Missing acknowledgments never fail an operation. They are counted in
//! [`BusStats`] and, with the `defmt` feature, logged.
//!
//! # Quick start
//!
//! ```ignore
//! use tm1651_driver::{Config, Tm1651};
//!
//! // `clk` is any OutputPin, `dio` any DioPin, `delay` any DelayNs
//! let mut display = Tm1651::new(clk, dio, delay, Config::default())?;
//! display.setup()?;
//! display.set_level_percent(80)?;
//! ```
//!
//! # Features
//!
//! - **`defmt`** - log missed acknowledgments and enable [`defmt::Format`]
//!   implementations on public types.

#![cfg_attr(not(test), no_std)]

pub use bus::{BusStats, TwoWireBus};
pub use command::Command;
pub use config::Config;
pub use display::{level_from_percent, Brightness, HardwareBrightness, Tm1651};
pub use error::{ConfigError, Tm1651Error};
pub use pin::DioPin;
pub use timing::Timing;

mod bus;
mod command;
mod config;
mod display;
mod error;
mod pin;
pub mod registers;
mod timing;
mod transactions;
