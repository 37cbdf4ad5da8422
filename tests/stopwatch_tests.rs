//! End-to-end tests: handlers driven by simulated timers and button edges

mod common;
use common::*;

use segment_stopwatch::display::DIGIT_SELECT;
use segment_stopwatch::segments;
use segment_stopwatch::timing::{FAST_PERIOD_US, SLOW_PERIOD_US};
use segment_stopwatch::{Button, ElapsedValue, Multiplexer, StopwatchState, TimingDriver};

struct Rig {
    driver: TimingDriver,
    state: StopwatchState,
    mux: Multiplexer,
    bus: RecordingBus,
}

impl Rig {
    fn new() -> Self {
        Self {
            driver: TimingDriver::new(),
            state: StopwatchState::new(),
            mux: Multiplexer::new(),
            bus: RecordingBus::new(),
        }
    }

    fn press(&mut self, button: Button) {
        self.driver.press(button);
        self.driver
            .service(&mut self.state, &mut self.mux, &mut self.bus);
    }

    fn run_ms(&mut self, ms: u64) -> segment_stopwatch::timing::DispatchStats {
        self.driver
            .run_for(ms * 1_000, &mut self.state, &mut self.mux, &mut self.bus)
    }
}

#[test]
fn idle_stopwatch_keeps_zero() {
    let mut rig = Rig::new();
    let stats = rig.run_ms(1_000);

    assert_eq!(rig.driver.now_us(), 1_000_000);
    assert_eq!(stats.refreshes, 1_000_000 / FAST_PERIOD_US);
    assert_eq!(stats.time_ticks, 1_000_000 / SLOW_PERIOD_US);
    assert_eq!(rig.state.value(), ElapsedValue::ZERO);
}

#[test]
fn one_second_of_running_is_one_second() {
    let mut rig = Rig::new();
    rig.press(Button::Start);
    rig.run_ms(1_000);

    assert_eq!(rig.state.value().packed(), 0x0100);
    assert!(rig.state.is_running());
}

#[test]
fn stop_pauses_and_start_resumes() {
    let mut rig = Rig::new();
    rig.press(Button::Start);
    rig.run_ms(2_300);
    rig.press(Button::Stop);
    rig.run_ms(5_000);
    assert_eq!(rig.state.value().packed(), 0x0230);

    rig.press(Button::Start);
    rig.run_ms(700);
    assert_eq!(rig.state.value().packed(), 0x0300);
}

#[test]
fn reset_mid_run_zeroes_and_stops() {
    let mut rig = Rig::new();
    rig.press(Button::Start);
    rig.run_ms(4_500);
    rig.press(Button::Reset);

    assert_eq!(rig.state.value(), ElapsedValue::ZERO);
    assert!(!rig.state.is_running());

    rig.run_ms(1_000);
    assert_eq!(rig.state.value(), ElapsedValue::ZERO);
}

#[test]
fn restart_after_mid_second_reset_carries_early() {
    let mut rig = Rig::new();
    rig.press(Button::Start);
    rig.run_ms(3_400);
    rig.press(Button::Reset);
    rig.press(Button::Start);
    rig.run_ms(600);

    assert_eq!(rig.state.value().packed(), 0x0100);
}

#[test]
fn runs_to_terminal_value_and_halts() {
    let mut rig = Rig::new();
    rig.press(Button::Start);
    let stats = rig.run_ms(120_000);

    assert!(stats.halted);
    assert_eq!(rig.state.value(), ElapsedValue::TERMINAL);
    assert!(!rig.state.is_running());
}

#[test]
fn display_follows_the_count() {
    let mut rig = Rig::new();
    rig.press(Button::Start);
    rig.run_ms(12_300);

    assert_eq!(rig.state.value().packed(), 0x1230);

    // Draw one more complete cycle from the current value: five positions
    // plus the wrap slot
    rig.bus.writes.clear();
    rig.press(Button::Stop);
    let stats = rig.run_ms(12);
    assert_eq!(stats.refreshes, 6);
    let frames = rig.bus.frames();
    assert_eq!(frames.len(), 5);
    for (segments_shown, select) in frames {
        let expected = match DIGIT_SELECT.iter().position(|s| *s == select) {
            Some(0) => segments::encode(0),
            Some(1) => segments::encode(3),
            Some(2) => segments::encode(2),
            Some(3) => segments::encode(1),
            Some(4) => segments::COLON_PATTERN,
            _ => panic!("unexpected digit select {:#04x}", select),
        };
        assert_eq!(segments_shown, expected);
    }
}

#[test]
fn simultaneous_tick_and_refresh_shows_new_value() {
    let mut rig = Rig::new();
    rig.press(Button::Start);

    // 100 ms: slow and fast expire together; tick runs first
    rig.run_ms(98);
    rig.mux.set_cursor(1);
    rig.bus.writes.clear();
    rig.run_ms(2);

    assert_eq!(rig.state.value().packed(), 0x0010);
    assert_eq!(
        rig.bus.last_frame(),
        Some((segments::encode(1), DIGIT_SELECT[1]))
    );
}

#[test]
fn button_edges_wait_for_timers() {
    let mut rig = Rig::new();
    rig.press(Button::Start);
    rig.run_ms(98);

    // Stop latched just before the 100 ms expiry, serviced together with it
    rig.driver.press(Button::Stop);
    rig.driver.advance(2_000);
    let stats = rig
        .driver
        .service(&mut rig.state, &mut rig.mux, &mut rig.bus);

    assert_eq!(stats.time_ticks, 1);
    assert_eq!(stats.refreshes, 1);
    assert_eq!(stats.button_presses, 1);
    // Tick ran before the stop
    assert_eq!(rig.state.value().packed(), 0x0010);
    assert!(!rig.state.is_running());
}
