//! Timing driver
//!
//! Two free-running periodic sources drive the stopwatch: a fast one that
//! refreshes one display position per period, and a slow one that advances
//! the elapsed value. The slow source has the higher priority, so a pending
//! time tick is always serviced before a pending refresh. Buttons sit below
//! both.
//!
//! On the board the sources are hardware alarms bound to RTIC tasks. The
//! [`TimingDriver`] here runs the same handlers against simulated time.

use core::cmp::Ordering;

use heapless::binary_heap::{BinaryHeap, Max};

use crate::buttons::{self, Button};
use crate::bus::DisplayBus;
use crate::clock::{StopwatchState, TickOutcome};
use crate::display::Multiplexer;

/// Display refresh period, one position per period
pub const FAST_PERIOD_US: u32 = 2_000;

/// Time tick period, one tenths step per period
pub const SLOW_PERIOD_US: u32 = 100_000;

pub const SLOW_PRIORITY: u8 = 3;
pub const FAST_PRIORITY: u8 = 2;
pub const BUTTON_PRIORITY: u8 = 1;

/// Interrupt sources competing for the core
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Interrupt {
    SlowTimer,
    FastTimer,
    Button(Button),
}

impl Interrupt {
    pub const fn priority(self) -> u8 {
        match self {
            Interrupt::SlowTimer => SLOW_PRIORITY,
            Interrupt::FastTimer => FAST_PRIORITY,
            Interrupt::Button(_) => BUTTON_PRIORITY,
        }
    }

    /// Priority first, then the button dispatch order
    fn rank(self) -> (u8, u8) {
        let sub = match self {
            Interrupt::Button(Button::Start) => 2,
            Interrupt::Button(Button::Reset) => 1,
            _ => 0,
        };
        (self.priority(), sub)
    }
}

impl Ord for Interrupt {
    fn cmp(&self, other: &Self) -> Ordering {
        self.rank().cmp(&other.rank())
    }
}

impl PartialOrd for Interrupt {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Number of distinct interrupt sources
const SOURCES: usize = 5;

/// Pending-interrupt set
///
/// Like an interrupt controller's pending bits, a source that fires again
/// while still pending is merged with the earlier request.
pub struct PendingInterrupts {
    heap: BinaryHeap<Interrupt, Max, SOURCES>,
}

impl Default for PendingInterrupts {
    fn default() -> Self {
        Self::new()
    }
}

impl PendingInterrupts {
    pub fn new() -> Self {
        Self {
            heap: BinaryHeap::new(),
        }
    }

    /// Mark a source pending. Returns false if it already was.
    pub fn pend(&mut self, irq: Interrupt) -> bool {
        if self.is_pending(irq) {
            return false;
        }
        // One slot per source, so this cannot overflow
        self.heap.push(irq).is_ok()
    }

    pub fn is_pending(&self, irq: Interrupt) -> bool {
        self.heap.iter().any(|pending| *pending == irq)
    }

    /// Highest-priority pending source, removed from the set
    pub fn take(&mut self) -> Option<Interrupt> {
        self.heap.pop()
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}

/// Auto-reloading periodic source
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PeriodicSource {
    period_us: u32,
    next_due_us: u64,
}

impl PeriodicSource {
    pub const fn new(period_us: u32) -> Self {
        Self {
            period_us,
            next_due_us: period_us as u64,
        }
    }

    pub fn period_us(&self) -> u32 {
        self.period_us
    }

    pub fn next_due_us(&self) -> u64 {
        self.next_due_us
    }

    /// True if the source expired at or before `now_us`. Expiries missed
    /// while unserviced collapse into one.
    pub fn poll(&mut self, now_us: u64) -> bool {
        if now_us < self.next_due_us {
            return false;
        }
        let period = self.period_us.max(1) as u64;
        let missed = (now_us - self.next_due_us) / period;
        self.next_due_us += (missed + 1) * period;
        true
    }
}

/// Counters for what a run of the driver dispatched
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DispatchStats {
    pub time_ticks: u32,
    pub refreshes: u32,
    pub button_presses: u32,
    pub halted: bool,
}

/// Runs the stopwatch handlers against simulated time
pub struct TimingDriver {
    now_us: u64,
    fast: PeriodicSource,
    slow: PeriodicSource,
    pending: PendingInterrupts,
}

impl Default for TimingDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl TimingDriver {
    pub fn new() -> Self {
        Self::with_periods(FAST_PERIOD_US, SLOW_PERIOD_US)
    }

    pub fn with_periods(fast_period_us: u32, slow_period_us: u32) -> Self {
        Self {
            now_us: 0,
            fast: PeriodicSource::new(fast_period_us),
            slow: PeriodicSource::new(slow_period_us),
            pending: PendingInterrupts::new(),
        }
    }

    pub fn now_us(&self) -> u64 {
        self.now_us
    }

    pub fn pending(&self) -> &PendingInterrupts {
        &self.pending
    }

    /// Latch a button edge; it is handled on the next `service`.
    pub fn press(&mut self, button: Button) {
        self.pending.pend(Interrupt::Button(button));
    }

    /// Move simulated time forward and pend every source that expired,
    /// without servicing anything.
    pub fn advance(&mut self, elapsed_us: u64) {
        self.now_us += elapsed_us;
        if self.slow.poll(self.now_us) {
            self.pending.pend(Interrupt::SlowTimer);
        }
        if self.fast.poll(self.now_us) {
            self.pending.pend(Interrupt::FastTimer);
        }
    }

    /// Run pending handlers, highest priority first, until none is left.
    pub fn service<B: DisplayBus>(
        &mut self,
        state: &mut StopwatchState,
        multiplexer: &mut Multiplexer,
        bus: &mut B,
    ) -> DispatchStats {
        let mut stats = DispatchStats::default();
        while let Some(irq) = self.pending.take() {
            match irq {
                Interrupt::SlowTimer => {
                    stats.time_ticks += 1;
                    if state.tick() == TickOutcome::Halted {
                        stats.halted = true;
                    }
                }
                Interrupt::FastTimer => {
                    stats.refreshes += 1;
                    let value = state.value();
                    multiplexer.advance(&value, bus);
                }
                Interrupt::Button(button) => {
                    stats.button_presses += 1;
                    buttons::press(button, state);
                }
            }
        }
        stats
    }

    /// Advance time by `duration_us`, servicing every expiry as it happens.
    pub fn run_for<B: DisplayBus>(
        &mut self,
        duration_us: u64,
        state: &mut StopwatchState,
        multiplexer: &mut Multiplexer,
        bus: &mut B,
    ) -> DispatchStats {
        let end = self.now_us + duration_us;
        let mut total = self.service(state, multiplexer, bus);
        loop {
            let next = self.fast.next_due_us().min(self.slow.next_due_us());
            if next > end {
                break;
            }
            self.advance(next - self.now_us);
            let stats = self.service(state, multiplexer, bus);
            total.time_ticks += stats.time_ticks;
            total.refreshes += stats.refreshes;
            total.button_presses += stats.button_presses;
            total.halted |= stats.halted;
        }
        self.now_us = end;
        total
    }
}
