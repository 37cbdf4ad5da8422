#![no_std]
#![no_main]

use defmt_rtt as _;
use panic_probe as _;
use rtic::app;

use rp_pico::hal::gpio::{
    bank0::{Gpio13, Gpio14, Gpio15},
    FunctionSioInput, Interrupt as GpioInterrupt, Pin, PullUp,
};
use segment_stopwatch::buttons::{Button, ButtonLines};

type ButtonPin<I> = Pin<I, FunctionSioInput, PullUp>;

/// Start, reset and stop inputs, falling-edge triggered
pub struct ButtonPins {
    start: ButtonPin<Gpio13>,
    reset: ButtonPin<Gpio14>,
    stop: ButtonPin<Gpio15>,
}

impl ButtonLines for ButtonPins {
    fn is_pending(&self, button: Button) -> bool {
        match button {
            Button::Start => self.start.interrupt_status(GpioInterrupt::EdgeLow),
            Button::Reset => self.reset.interrupt_status(GpioInterrupt::EdgeLow),
            Button::Stop => self.stop.interrupt_status(GpioInterrupt::EdgeLow),
        }
    }

    fn clear_pending(&mut self, button: Button) {
        match button {
            Button::Start => self.start.clear_interrupt(GpioInterrupt::EdgeLow),
            Button::Reset => self.reset.clear_interrupt(GpioInterrupt::EdgeLow),
            Button::Stop => self.stop.clear_interrupt(GpioInterrupt::EdgeLow),
        }
    }
}

impl ButtonPins {
    fn enable_edge(&self, button: Button) {
        match button {
            Button::Start => self.start.set_interrupt_enabled(GpioInterrupt::EdgeLow, true),
            Button::Reset => self.reset.set_interrupt_enabled(GpioInterrupt::EdgeLow, true),
            Button::Stop => self.stop.set_interrupt_enabled(GpioInterrupt::EdgeLow, true),
        }
    }
}

#[app(device = rp_pico::hal::pac, peripherals = true)]
mod app {
    use super::*;
    use rp_pico::hal::{
        clocks::init_clocks_and_plls,
        fugit::ExtU32,
        gpio::{DynPinId, FunctionSioOutput, PullDown},
        sio::Sio,
        timer::{Alarm, Alarm0, Alarm1, Timer},
        watchdog::Watchdog,
    };
    use segment_stopwatch::{buttons, timing, Multiplexer, PinBus, StopwatchState, TickOutcome};

    type OutputLine = Pin<DynPinId, FunctionSioOutput, PullDown>;
    type DisplayPins = PinBus<OutputLine, OutputLine>;

    // Shared resources (accessed by multiple tasks)
    #[shared]
    struct Shared {
        stopwatch: StopwatchState,
    }

    // Local resources (accessed by single tasks)
    #[local]
    struct Local {
        bus: DisplayPins,
        multiplexer: Multiplexer,
        refresh_alarm: Alarm0,
        tick_alarm: Alarm1,
        buttons: ButtonPins,
    }

    #[init]
    fn init(ctx: init::Context) -> (Shared, Local, init::Monotonics) {
        let mut pac = ctx.device;
        let mut watchdog = Watchdog::new(pac.WATCHDOG);
        let sio = Sio::new(pac.SIO);

        let clocks = init_clocks_and_plls(
            rp_pico::XOSC_CRYSTAL_FREQ,
            pac.XOSC,
            pac.CLOCKS,
            pac.PLL_SYS,
            pac.PLL_USB,
            &mut pac.RESETS,
            &mut watchdog,
        )
        .ok()
        .unwrap();

        let mut timer = Timer::new(pac.TIMER, &mut pac.RESETS, &clocks);

        let mut refresh_alarm = timer.alarm_0().unwrap();
        refresh_alarm.schedule(timing::FAST_PERIOD_US.micros()).unwrap();
        refresh_alarm.enable_interrupt();

        let mut tick_alarm = timer.alarm_1().unwrap();
        tick_alarm.schedule(timing::SLOW_PERIOD_US.micros()).unwrap();
        tick_alarm.enable_interrupt();

        let pins = rp_pico::Pins::new(
            pac.IO_BANK0,
            pac.PADS_BANK0,
            sio.gpio_bank0,
            &mut pac.RESETS,
        );

        // GP0..GP7: segments A..G, DP
        let segments = [
            pins.gpio0.into_push_pull_output().into_dyn_pin(),
            pins.gpio1.into_push_pull_output().into_dyn_pin(),
            pins.gpio2.into_push_pull_output().into_dyn_pin(),
            pins.gpio3.into_push_pull_output().into_dyn_pin(),
            pins.gpio4.into_push_pull_output().into_dyn_pin(),
            pins.gpio5.into_push_pull_output().into_dyn_pin(),
            pins.gpio6.into_push_pull_output().into_dyn_pin(),
            pins.gpio7.into_push_pull_output().into_dyn_pin(),
        ];
        // GP8..GP12: digit3 (leftmost), digit2, digit1, digit0, colon
        let digits = [
            pins.gpio8.into_push_pull_output().into_dyn_pin(),
            pins.gpio9.into_push_pull_output().into_dyn_pin(),
            pins.gpio10.into_push_pull_output().into_dyn_pin(),
            pins.gpio11.into_push_pull_output().into_dyn_pin(),
            pins.gpio12.into_push_pull_output().into_dyn_pin(),
        ];
        let bus = PinBus::new(segments, digits);

        let mut buttons = ButtonPins {
            start: pins.gpio13.into_pull_up_input(),
            reset: pins.gpio14.into_pull_up_input(),
            stop: pins.gpio15.into_pull_up_input(),
        };
        for button in Button::ALL {
            buttons.clear_pending(button);
            buttons.enable_edge(button);
        }

        defmt::info!(
            "stopwatch ready: refresh every {=u32} us, tick every {=u32} us",
            timing::FAST_PERIOD_US,
            timing::SLOW_PERIOD_US
        );

        (
            Shared {
                stopwatch: StopwatchState::new(),
            },
            Local {
                bus,
                multiplexer: Multiplexer::new(),
                refresh_alarm,
                tick_alarm,
                buttons,
            },
            init::Monotonics(),
        )
    }

    #[idle]
    fn idle(_: idle::Context) -> ! {
        loop {
            cortex_m::asm::wfi();
        }
    }

    // Hardware Task: time tick (timing::SLOW_PRIORITY)
    #[task(binds = TIMER_IRQ_1, priority = 3, shared = [stopwatch], local = [tick_alarm])]
    fn time_tick(mut ctx: time_tick::Context) {
        ctx.local.tick_alarm.clear_interrupt();
        ctx.local
            .tick_alarm
            .schedule(timing::SLOW_PERIOD_US.micros())
            .ok();

        let (outcome, value) = ctx.shared.stopwatch.lock(|s| (s.tick(), s.value()));
        if outcome == TickOutcome::Halted {
            defmt::info!("halted at {}", value);
        }
    }

    // Hardware Task: display refresh (timing::FAST_PRIORITY)
    #[task(
        binds = TIMER_IRQ_0,
        priority = 2,
        shared = [stopwatch],
        local = [refresh_alarm, multiplexer, bus]
    )]
    fn display_refresh(mut ctx: display_refresh::Context) {
        ctx.local.refresh_alarm.clear_interrupt();
        ctx.local
            .refresh_alarm
            .schedule(timing::FAST_PERIOD_US.micros())
            .ok();

        let value = ctx.shared.stopwatch.lock(|s| s.value());
        ctx.local.multiplexer.advance(&value, ctx.local.bus);
    }

    // Hardware Task: button edges (timing::BUTTON_PRIORITY)
    #[task(binds = IO_IRQ_BANK0, priority = 1, shared = [stopwatch], local = [buttons])]
    fn button_press(mut ctx: button_press::Context) {
        let lines = ctx.local.buttons;
        let (handled, value) = ctx
            .shared
            .stopwatch
            .lock(|s| (buttons::dispatch(lines, s), s.value()));

        for button in handled {
            defmt::info!("{} pressed at {}", button, value);
        }
    }
}
