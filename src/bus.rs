//! Output side of the display board
//!
//! The multiplexer only knows about two 8-bit latches: the segment bus and
//! the digit-select bus. [`PinBus`] maps those latches onto individual GPIO
//! lines through `embedded-hal` output pins.

use embedded_hal::digital::v2::OutputPin;

/// Sink for the two display latches
pub trait DisplayBus {
    /// Drive the segment lines (active-low, bit 0 = segment A)
    fn write_segments(&mut self, pattern: u8);

    /// Drive the digit-select lines (active-low, bit 0 = leftmost digit)
    fn write_digit_select(&mut self, pattern: u8);
}

/// A group of up to eight output pins written as one byte
///
/// Bit `i` of the written value sets pin `i`; bits beyond `N` are ignored.
pub struct PinPort<P, const N: usize> {
    pins: [P; N],
    last: Option<u8>,
}

impl<P: OutputPin, const N: usize> PinPort<P, N> {
    pub fn new(pins: [P; N]) -> Self {
        Self { pins, last: None }
    }

    pub fn write(&mut self, value: u8) {
        for (bit, pin) in self.pins.iter_mut().enumerate() {
            // RP2040 pin errors are Infallible
            if value & (1 << bit) != 0 {
                pin.set_high().ok();
            } else {
                pin.set_low().ok();
            }
        }
        self.last = Some(value);
    }

    /// Last value written, if any
    pub fn last(&self) -> Option<u8> {
        self.last
    }
}

/// Segment bus (8 lines) and digit-select bus (5 lines) on GPIO
pub struct PinBus<S, D> {
    segments: PinPort<S, 8>,
    digits: PinPort<D, 5>,
}

impl<S: OutputPin, D: OutputPin> PinBus<S, D> {
    /// Takes ownership of the pins and blanks the display.
    pub fn new(segments: [S; 8], digits: [D; 5]) -> Self {
        let mut bus = Self {
            segments: PinPort::new(segments),
            digits: PinPort::new(digits),
        };
        bus.write_digit_select(crate::display::DIGITS_OFF);
        bus.write_segments(crate::segments::BLANK);
        bus
    }

    pub fn segments(&self) -> &PinPort<S, 8> {
        &self.segments
    }

    pub fn digits(&self) -> &PinPort<D, 5> {
        &self.digits
    }
}

impl<S: OutputPin, D: OutputPin> DisplayBus for PinBus<S, D> {
    fn write_segments(&mut self, pattern: u8) {
        self.segments.write(pattern);
    }

    fn write_digit_select(&mut self, pattern: u8) {
        self.digits.write(pattern);
    }
}
