//! Shared test infrastructure for the stopwatch integration tests

#![allow(dead_code)] // Items used across multiple test files; Rust analyzes per-file

use std::cell::Cell;
use std::convert::Infallible;
use std::rc::Rc;

use embedded_hal::digital::v2::OutputPin;
use segment_stopwatch::display::DIGITS_OFF;
use segment_stopwatch::DisplayBus;

// ============================================================================
// Recording display bus
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BusWrite {
    Segments(u8),
    DigitSelect(u8),
}

/// Display bus that records every latch write
#[derive(Default)]
pub struct RecordingBus {
    pub writes: Vec<BusWrite>,
}

impl RecordingBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// (segments, digit-select) pairs that were visible with a digit selected
    pub fn frames(&self) -> Vec<(u8, u8)> {
        let mut segments = 0xFF;
        let mut frames = Vec::new();
        for write in &self.writes {
            match *write {
                BusWrite::Segments(pattern) => segments = pattern,
                BusWrite::DigitSelect(DIGITS_OFF) => {}
                BusWrite::DigitSelect(select) => frames.push((segments, select)),
            }
        }
        frames
    }

    pub fn last_frame(&self) -> Option<(u8, u8)> {
        self.frames().last().copied()
    }
}

impl DisplayBus for RecordingBus {
    fn write_segments(&mut self, pattern: u8) {
        self.writes.push(BusWrite::Segments(pattern));
    }

    fn write_digit_select(&mut self, pattern: u8) {
        self.writes.push(BusWrite::DigitSelect(pattern));
    }
}

// ============================================================================
// Mock GPIO
// ============================================================================

/// Output pin whose level can be observed after it is moved into a bus
#[derive(Clone)]
pub struct MockPin {
    high: Rc<Cell<bool>>,
}

impl MockPin {
    pub fn new() -> Self {
        Self {
            high: Rc::new(Cell::new(false)),
        }
    }

    pub fn is_high(&self) -> bool {
        self.high.get()
    }
}

impl OutputPin for MockPin {
    type Error = Infallible;

    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.high.set(false);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.high.set(true);
        Ok(())
    }
}

/// `N` mock pins plus observer handles for them
pub fn mock_pins<const N: usize>() -> ([MockPin; N], [MockPin; N]) {
    let pins: [MockPin; N] = core::array::from_fn(|_| MockPin::new());
    let observers = pins.clone();
    (pins, observers)
}

/// Levels of a pin group read back as a byte, bit `i` = pin `i`
pub fn read_levels(pins: &[MockPin]) -> u8 {
    pins.iter()
        .enumerate()
        .fold(0u8, |acc, (bit, pin)| acc | ((pin.is_high() as u8) << bit))
}
