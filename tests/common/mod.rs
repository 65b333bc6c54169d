//! Simulated TM1651 wire for integration tests.
//!
//! Every pin write, direction change, sample and delay is appended to one
//! shared event log. The simulated chip answers acknowledgment samples
//! according to its [`Peripheral`] behaviour.

#![allow(dead_code)]

use std::cell::RefCell;
use std::convert::Infallible;
use std::rc::Rc;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{ErrorType, InputPin, OutputPin};
use tm1651_driver::{Config, DioPin, Tm1651};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    Clk(bool),
    /// DIO driven to a level (output mode).
    Dio(bool),
    /// Output latch written while DIO is an input; the line is unaffected.
    DioLatch(bool),
    DioInput,
    DioOutput,
    /// A sample taken in input mode, with the level seen.
    DioSample(bool),
    DelayUs(u32),
}

/// How the simulated chip answers the acknowledgment window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Peripheral {
    /// Pulls DIO low before the first sample.
    Acks,
    /// Leaves DIO high for this many samples, then pulls it low.
    AcksAfter(usize),
    /// Never pulls DIO low.
    Silent,
}

#[derive(Debug)]
pub struct Wire {
    pub events: Vec<Event>,
    pub peripheral: Peripheral,
    pub dio_output: bool,
    /// Level the pin drives once it is an output again.
    pub dio_latch: bool,
    samples_this_window: usize,
}

impl Wire {
    fn new(peripheral: Peripheral) -> Self {
        Self {
            events: Vec::new(),
            peripheral,
            dio_output: false,
            dio_latch: false,
            samples_this_window: 0,
        }
    }

    fn sample(&mut self) -> bool {
        let high = match self.peripheral {
            Peripheral::Acks => false,
            Peripheral::AcksAfter(n) => self.samples_this_window < n,
            Peripheral::Silent => true,
        };
        self.samples_this_window += 1;
        self.events.push(Event::DioSample(high));
        high
    }

    fn write_dio(&mut self, level: bool) {
        self.dio_latch = level;
        let event = if self.dio_output {
            Event::Dio(level)
        } else {
            Event::DioLatch(level)
        };
        self.events.push(event);
    }
}

pub type SharedWire = Rc<RefCell<Wire>>;

pub struct FakeClk(pub SharedWire);
pub struct FakeDio(pub SharedWire);
pub struct FakeDelay(pub SharedWire);

impl ErrorType for FakeClk {
    type Error = Infallible;
}

impl OutputPin for FakeClk {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.0.borrow_mut().events.push(Event::Clk(false));
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.0.borrow_mut().events.push(Event::Clk(true));
        Ok(())
    }
}

impl ErrorType for FakeDio {
    type Error = Infallible;
}

impl OutputPin for FakeDio {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.0.borrow_mut().write_dio(false);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.0.borrow_mut().write_dio(true);
        Ok(())
    }
}

impl InputPin for FakeDio {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        let mut wire = self.0.borrow_mut();
        assert!(!wire.dio_output, "DIO sampled while in output mode");
        Ok(wire.sample())
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        self.is_high().map(|high| !high)
    }
}

impl DioPin for FakeDio {
    fn set_as_input(&mut self) -> Result<(), Self::Error> {
        let mut wire = self.0.borrow_mut();
        wire.dio_output = false;
        wire.samples_this_window = 0;
        wire.events.push(Event::DioInput);
        Ok(())
    }

    fn set_as_output(&mut self) -> Result<(), Self::Error> {
        let mut wire = self.0.borrow_mut();
        wire.dio_output = true;
        wire.events.push(Event::DioOutput);
        // The pin starts driving whatever the latch holds.
        let latch = wire.dio_latch;
        wire.events.push(Event::Dio(latch));
        Ok(())
    }
}

impl DelayNs for FakeDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.0.borrow_mut().events.push(Event::DelayUs(ns / 1_000));
    }

    fn delay_us(&mut self, us: u32) {
        self.0.borrow_mut().events.push(Event::DelayUs(us));
    }
}

/// Fresh wire plus the three handles the driver consumes.
pub fn wire(peripheral: Peripheral) -> (SharedWire, FakeClk, FakeDio, FakeDelay) {
    let wire = Rc::new(RefCell::new(Wire::new(peripheral)));
    (
        wire.clone(),
        FakeClk(wire.clone()),
        FakeDio(wire.clone()),
        FakeDelay(wire),
    )
}

pub type FakeDisplay = Tm1651<FakeClk, FakeDio, FakeDelay>;

pub fn display(peripheral: Peripheral, config: Config) -> (SharedWire, FakeDisplay) {
    let (wire, clk, dio, delay) = wire(peripheral);
    let display = Tm1651::new(clk, dio, delay, config).unwrap();
    (wire, display)
}

pub fn events(wire: &SharedWire) -> Vec<Event> {
    wire.borrow().events.clone()
}

pub fn wire_is_output(wire: &SharedWire) -> bool {
    wire.borrow().dio_output
}

pub fn clear(wire: &SharedWire) {
    wire.borrow_mut().events.clear();
}

/// Decode the byte transactions seen on the wire.
///
/// A transaction opens on DIO falling while CLK is high and closes on DIO
/// rising while CLK is high. Data bits are taken on CLK rising edges, LSB
/// first; every ninth rising edge is the acknowledgment clock.
///
/// While DIO is an input the line follows the simulated chip, so a
/// low sample moves the tracked level low.
pub fn transactions(wire: &SharedWire) -> Vec<Vec<u8>> {
    let mut frames = Vec::new();
    let mut current: Option<Vec<u8>> = None;
    let mut clk = false;
    let mut dio = false;
    let mut bit = 0u32;
    let mut byte = 0u8;

    for event in wire.borrow().events.iter() {
        match *event {
            Event::Clk(level) => {
                if level && !clk {
                    if let Some(frame) = current.as_mut() {
                        if bit < 8 {
                            byte |= (dio as u8) << bit;
                        }
                        bit += 1;
                        if bit == 8 {
                            frame.push(byte);
                        }
                        if bit == 9 {
                            bit = 0;
                            byte = 0;
                        }
                    }
                }
                clk = level;
            }
            Event::Dio(level) => {
                if clk && dio && !level {
                    current = Some(Vec::new());
                    bit = 0;
                    byte = 0;
                } else if clk && !dio && level {
                    if let Some(frame) = current.take() {
                        frames.push(frame);
                    }
                }
                dio = level;
            }
            Event::DioSample(level) => dio = level,
            Event::DioLatch(_) | Event::DioInput | Event::DioOutput | Event::DelayUs(_) => {}
        }
    }

    frames
}

/// DIO levels driven by the master while CLK was high that differ from the
/// level already on the line, as `(from, to)` pairs.
///
/// Levels the simulated chip pulls during sampling are tracked but not
/// reported. Outside start and stop conditions this must be empty.
pub fn driven_edges_while_clock_high(wire: &SharedWire) -> Vec<(bool, bool)> {
    let mut edges = Vec::new();
    let mut clk = false;
    let mut dio = false;

    for event in wire.borrow().events.iter() {
        match *event {
            Event::Clk(level) => clk = level,
            Event::Dio(level) => {
                if clk && level != dio {
                    edges.push((dio, level));
                }
                dio = level;
            }
            Event::DioSample(level) => dio = level,
            Event::DioLatch(_) | Event::DioInput | Event::DioOutput | Event::DelayUs(_) => {}
        }
    }

    edges
}

/// Number of samples taken in each acknowledgment window, in order.
pub fn ack_windows(wire: &SharedWire) -> Vec<usize> {
    let mut windows = Vec::new();
    let mut count = None;
    for event in wire.borrow().events.iter() {
        match event {
            Event::DioInput => count = Some(0),
            Event::DioSample(_) => {
                if let Some(n) = count.as_mut() {
                    *n += 1;
                }
            }
            Event::DioOutput => {
                if let Some(n) = count.take() {
                    windows.push(n);
                }
            }
            _ => {}
        }
    }
    windows
}
