//! tm1651-hw-interface
//!
//! Battery gauge firmware for the Raspberry Pi Pico 2 driving a TM1651
//! 7-segment level indicator:
//!
//! 1. The gauge task produces [`Command`]s (level sweeps, brightness,
//!    low-level blink) and sends them over a channel.
//! 2. The display task owns the TM1651 driver exclusively and applies each
//!    command in order, so bit-level transmissions never interleave.
//! 3. Missed acknowledgments are logged by the driver; the display task
//!    reports the running totals whenever they change.

#![no_std]
#![no_main]

use core::convert::Infallible;

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::block::ImageDef;
use embassy_rp::gpio::{Flex, Level, Output, Pull};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::{Channel, Receiver, Sender};
use embassy_time::{Delay, Duration, Timer};
use embedded_hal::digital::{ErrorType, InputPin, OutputPin};
use {defmt_rtt as _, panic_probe as _};

use tm1651_driver::{Brightness, Command, Config, DioPin, Tm1651};

// ---------------------------------------------------------------------------
// Boot block
// ---------------------------------------------------------------------------

/// Tell the RP2350 Boot ROM about our application.
#[link_section = ".start_block"]
#[used]
pub static IMAGE_DEF: ImageDef = embassy_rp::block::ImageDef::secure_exe();

// ---------------------------------------------------------------------------
// Static storage
// ---------------------------------------------------------------------------

const COMMAND_QUEUE_DEPTH: usize = 8;

/// Commands for the display task. The display task is the only consumer.
static DISPLAY_COMMANDS: Channel<CriticalSectionRawMutex, Command, COMMAND_QUEUE_DEPTH> =
    Channel::new();

// ---------------------------------------------------------------------------
// Data line
// ---------------------------------------------------------------------------

/// DIO on a [`Flex`] pin, which can flip between input and output.
struct FlexDio(Flex<'static>);

impl ErrorType for FlexDio {
    type Error = Infallible;
}

impl OutputPin for FlexDio {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.0.set_low();
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.0.set_high();
        Ok(())
    }
}

impl InputPin for FlexDio {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        Ok(self.0.is_high())
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        Ok(self.0.is_low())
    }
}

impl DioPin for FlexDio {
    fn set_as_input(&mut self) -> Result<(), Self::Error> {
        self.0.set_as_input();
        Ok(())
    }

    fn set_as_output(&mut self) -> Result<(), Self::Error> {
        self.0.set_as_output();
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Type aliases
// ---------------------------------------------------------------------------

type Display = Tm1651<Output<'static>, FlexDio, Delay>;

type CommandReceiver = Receiver<'static, CriticalSectionRawMutex, Command, COMMAND_QUEUE_DEPTH>;

type CommandSender = Sender<'static, CriticalSectionRawMutex, Command, COMMAND_QUEUE_DEPTH>;

// ---------------------------------------------------------------------------
// Tasks
// ---------------------------------------------------------------------------

/// Owns the display and applies commands in arrival order.
///
/// Each command runs to completion (a few hundred microseconds of
/// bit-banging at the default clock) before the next one is received.
#[embassy_executor::task]
async fn display_task(mut display: Display, commands: CommandReceiver) {
    display.log_config();

    if let Err(e) = display.setup() {
        error!("TM1651 setup failed: {}", e);
        return;
    }
    info!("TM1651 ready");

    let mut reported_failures = display.stats().failed;

    loop {
        let command = commands.receive().await;
        debug!("Applying {}", command);

        if let Err(e) = display.apply(command) {
            error!("TM1651 command failed: {}", e);
            continue;
        }

        let stats = display.stats();
        if stats.failed != reported_failures {
            warn!(
                "TM1651 bus: {} of {} bytes unacknowledged",
                stats.failed, stats.attempted
            );
            reported_failures = stats.failed;
        }
    }
}

/// Demo battery gauge: sweeps the charge level up and down, blinks the
/// overlay while the level is low and dims the display at the bottom of
/// each sweep.
#[embassy_executor::task]
async fn gauge_task(commands: CommandSender) {
    const STEP_PERCENT: u8 = 10;
    const LOW_PERCENT: u8 = 20;

    let step_period = Duration::from_millis(500);
    let mut percent: u8 = 100;
    let mut rising = false;
    let mut blinking = false;

    loop {
        commands.send(Command::SetLevelPercent(percent)).await;

        let low = percent <= LOW_PERCENT;
        if low != blinking {
            blinking = low;
            let command = if low { Command::BlinkOn } else { Command::BlinkOff };
            commands.send(command).await;
        }

        if percent == 0 {
            commands
                .send(Command::SetBrightness(Brightness::Darkest.into()))
                .await;
            rising = true;
        } else if percent == 100 {
            commands
                .send(Command::SetBrightness(Brightness::Brightest.into()))
                .await;
            rising = false;
        }

        Timer::after(step_period).await;

        percent = if rising {
            percent.saturating_add(STEP_PERCENT).min(100)
        } else {
            percent.saturating_sub(STEP_PERCENT)
        };
    }
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    let p = embassy_rp::init(Default::default());
    info!("tm1651-hw-interface starting");

    // Pin assignments:
    // TM_CLK -> GP2  (p.PIN_2)
    // TM_DIO -> GP3  (p.PIN_3)  pull-up enabled for the ack read-back

    let clk = Output::new(p.PIN_2, Level::High);

    let mut dio = Flex::new(p.PIN_3);
    dio.set_pull(Pull::Up);
    dio.set_high();
    dio.set_as_output();

    let display = match Tm1651::new(clk, FlexDio(dio), Delay, Config::default()) {
        Ok(display) => display,
        Err(e) => {
            error!("Invalid TM1651 configuration: {}", e);
            return;
        }
    };

    spawner
        .spawn(display_task(display, DISPLAY_COMMANDS.receiver()))
        .unwrap();
    spawner
        .spawn(gauge_task(DISPLAY_COMMANDS.sender()))
        .unwrap();

    info!("All tasks spawned");
}
