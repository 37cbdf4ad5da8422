use crate::elapsed::ElapsedValue;

/// Tenths steps per seconds carry, and seconds carries per tens carry
pub const CARRY_THRESHOLD: u8 = 10;

/// What a single time tick did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TickOutcome {
    /// Run flag was clear, nothing changed
    Paused,
    /// Value moved forward
    Advanced,
    /// Terminal value reached; run flag forced off
    Halted,
}

/// Shared state for the stopwatch
///
/// Written by the time tick and the buttons, read by the display.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StopwatchState {
    value: ElapsedValue,
    running: bool,
    /// Tenths steps since the last seconds carry
    sub_ticks: u8,
    /// Seconds carries since the last tens carry
    second_carries: u8,
}

impl StopwatchState {
    pub const fn new() -> Self {
        Self {
            value: ElapsedValue::ZERO,
            running: false,
            sub_ticks: 0,
            second_carries: 0,
        }
    }

    pub fn value(&self) -> ElapsedValue {
        self.value
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Start (or resume) counting.
    pub fn start(&mut self) {
        self.running = true;
    }

    /// Pause. The value is kept.
    pub fn stop(&mut self) {
        self.running = false;
    }

    /// Stop and zero the value.
    ///
    /// The carry counters keep their phase, so the first seconds carry after
    /// a mid-second reset comes early.
    pub fn reset(&mut self) {
        self.value = ElapsedValue::ZERO;
        self.running = false;
    }

    /// Load an arbitrary value without touching the run flag.
    ///
    /// The carry counters are aligned with the tenths and seconds fields
    /// (clamped to 9) so the next carries land where the value implies.
    pub fn preset(&mut self, value: ElapsedValue) {
        self.value = value;
        self.sub_ticks = value.tenths.min(CARRY_THRESHOLD - 1);
        self.second_carries = value.seconds.min(CARRY_THRESHOLD - 1);
    }

    /// Advances the value by one tenths step while running.
    ///
    /// The terminal comparison runs before the step and again after every
    /// individual field mutation; the first hit clears the run flag and ends
    /// the tick.
    pub fn tick(&mut self) -> TickOutcome {
        if !self.running {
            return TickOutcome::Paused;
        }
        if self.halt_if_terminal() {
            return TickOutcome::Halted;
        }

        // Tenths may read 10 here until the seconds carry clears it
        self.value.tenths = self.value.tenths.wrapping_add(1) & 0x0F;
        if self.halt_if_terminal() {
            return TickOutcome::Halted;
        }
        self.sub_ticks += 1;

        if self.sub_ticks == CARRY_THRESHOLD {
            self.sub_ticks = 0;
            self.value.seconds = self.value.seconds.wrapping_add(1) & 0x0F;
            self.value.tenths = 0;
            self.value.hundredths = 0;
            if self.halt_if_terminal() {
                return TickOutcome::Halted;
            }
            self.second_carries += 1;
        }

        if self.second_carries == CARRY_THRESHOLD {
            self.second_carries = 0;
            // Field is four bits; a carry out of it is lost
            self.value.tens_of_seconds = self.value.tens_of_seconds.wrapping_add(1) & 0x0F;
            self.value.seconds = 0;
            self.value.tenths = 0;
            self.value.hundredths = 0;
        } else {
            self.value.hundredths = 0;
        }
        if self.halt_if_terminal() {
            return TickOutcome::Halted;
        }

        TickOutcome::Advanced
    }

    fn halt_if_terminal(&mut self) -> bool {
        if self.value.is_terminal() {
            self.running = false;
            true
        } else {
            false
        }
    }
}
