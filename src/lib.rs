//! Stopwatch core for a multiplexed 4-digit 7-segment display
//!
//! Hardware-independent pieces of the stopwatch firmware:
//!
//! - **`segments`**: digit to active-low segment pattern
//! - **`elapsed`**: the elapsed value as four decimal digit fields
//! - **`clock`**: run flag and the time tick with its carry chain
//! - **`display`**: the digit multiplexer, one position per refresh
//! - **`bus`**: segment and digit-select outputs over `embedded-hal` pins
//! - **`buttons`**: start / reset / stop edge dispatch
//! - **`timing`**: periods, interrupt priorities and a simulated driver
//!
//! The firmware binary binds these to RP2040 timer and GPIO interrupts.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod buttons;
pub mod bus;
pub mod clock;
pub mod display;
pub mod elapsed;
pub mod segments;
pub mod timing;

pub use buttons::{Button, ButtonLines};
pub use bus::{DisplayBus, PinBus, PinPort};
pub use clock::{StopwatchState, TickOutcome};
pub use display::{Multiplexer, Position};
pub use elapsed::{ElapsedValue, Field};
pub use timing::{Interrupt, TimingDriver};
