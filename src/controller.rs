//! Mode/state controller
//!
//! Combines the light state (OFF/ON) with the operating mode (NORMAL/AUTO)
//! and runs once per main loop iteration. Each iteration:
//!
//! 1. Queued button presses toggle the light.
//! 2. A fired wakeup timer forces the light on, a fired sleep timer forces
//!    it off. These are handled after button presses and win over them.
//! 3. Entry and exit actions of the light state run: turning on in AUTO
//!    starts both timers, turning off cancels the sleep timer and, with
//!    adaptive sleep, learns the session length.
//! 4. The fade engine moves brightness toward the light state.
//! 5. Entry actions of the mode run: NORMAL cancels both timers, AUTO with
//!    the light on starts the sleep timer.
//!
//! | Event              | Precondition | Action                               |
//! |--------------------|--------------|--------------------------------------|
//! | button press       | any          | toggle light                         |
//! | wakeup timer fires | AUTO         | light on, cancel wakeup              |
//! | sleep timer fires  | AUTO         | light off, cancel sleep              |
//! | light off -> on    | AUTO         | start wakeup and sleep               |
//! | light on -> off    | any          | cancel sleep, learn duration         |
//! | mode -> NORMAL     | any          | cancel both, restore sleep duration  |
//! | mode -> AUTO       | light on     | start sleep                          |

use embassy_time::Instant;
use embedded_hal::delay::DelayNs;

#[cfg(feature = "esp32-log")]
use esp_println::println;

use crate::Board;
use crate::config::{AdaptiveSleep, ControllerConfig};
use crate::fade::{FadeEngine, FadeStatus};
use crate::input::{InputEvent, Mode};
use crate::shared::SharedState;
use crate::timer::CountdownTimer;

/// Requested light state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LightState {
    Off,
    On,
}

impl LightState {
    /// The opposite state
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Off => Self::On,
            Self::On => Self::Off,
        }
    }

    /// Whether the light is requested on
    pub const fn is_on(self) -> bool {
        matches!(self, Self::On)
    }
}

/// Central state machine
pub struct Controller<'a, B: Board> {
    // External dependencies and configuration
    board: B,
    shared: &'a SharedState,
    config: ControllerConfig,

    // Internal state
    light: LightState,
    last_light: LightState,
    last_mode: Mode,

    // Internal dependencies
    fade: FadeEngine,
}

impl<'a, B: Board> Controller<'a, B> {
    /// Create the controller with the light off.
    ///
    /// The configuration is the one `shared` was built from. The mode
    /// switch is read once here and published to `shared`, later changes
    /// arrive through [`SharedState::on_mode_edge`].
    pub fn new(mut board: B, shared: &'a SharedState) -> Self {
        let config = shared.config();
        let mode = Mode::from_switch(board.mode_switch_high());
        shared.set_mode(mode);
        board.set_duty(0);
        board.set_output_enabled(false);
        board.set_mode_indicator(mode.is_auto());
        Self {
            board,
            shared,
            config: *config,
            light: LightState::Off,
            last_light: LightState::Off,
            last_mode: mode,
            fade: FadeEngine::new(config),
        }
    }

    /// Run one loop iteration without blocking.
    ///
    /// Returns the fade status. While ramping, the next call should happen
    /// no later than the returned step time.
    pub fn poll(&mut self, now: Instant) -> FadeStatus {
        let mode = self.update_light();
        let status = self.fade.ramp_toward(self.light, now, &mut self.board);
        self.update_mode(mode);
        status
    }

    /// Run one loop iteration, busy-waiting through the fade.
    ///
    /// The fade stops early as soon as a button press or a timer trigger is
    /// pending, so the next iteration can handle it.
    pub fn poll_blocking<D: DelayNs>(&mut self, delay: &mut D) -> bool {
        let mode = self.update_light();
        let shared = self.shared;
        let reached = self.fade.ramp_blocking(self.light, &mut self.board, delay, || {
            !shared.has_pending_change()
        });
        self.update_mode(mode);
        reached
    }

    /// Feed the current button level to the debouncer.
    ///
    /// For targets that sample the button from the main loop instead of a
    /// sample-tick interrupt. Call once per sample period.
    pub fn sample_button(&mut self) {
        let pressed = self.board.button_pressed();
        self.shared.on_sample_tick(pressed);
    }

    /// Requested light state
    pub const fn light(&self) -> LightState {
        self.light
    }

    /// Mode as of the last iteration
    pub const fn mode(&self) -> Mode {
        self.last_mode
    }

    /// Current output brightness
    pub const fn brightness(&self) -> u8 {
        self.fade.brightness()
    }

    /// Whether brightness still differs from the light state's extreme
    pub const fn is_transitioning(&self) -> bool {
        self.fade.is_transitioning(self.light)
    }

    /// Fade engine driving the output
    pub const fn fade(&self) -> &FadeEngine {
        &self.fade
    }

    /// Board adapter
    pub const fn board(&self) -> &B {
        &self.board
    }

    /// Board adapter, mutably
    pub const fn board_mut(&mut self) -> &mut B {
        &mut self.board
    }

    /// Consume inputs and timers and run light entry/exit actions.
    ///
    /// Returns the mode sampled for this iteration.
    fn update_light(&mut self) -> Mode {
        for event in self.shared.events().drain() {
            match event {
                InputEvent::ButtonPress => self.light = self.light.toggled(),
            }
        }

        let wakeup = self.shared.wakeup_timer();
        if wakeup.triggered() {
            wakeup.cancel();
            self.light = LightState::On;
            #[cfg(feature = "esp32-log")]
            println!("[Controller.update_light] wakeup timer fired");
        }
        // Sleep state before this iteration touches it, to tell a measured
        // session apart from a stale count
        let sleep_before = self.shared.sleep_timer().update(|timer| {
            let before = *timer;
            if before.triggered() {
                timer.cancel();
            }
            before
        });
        if sleep_before.triggered() {
            self.light = LightState::Off;
            #[cfg(feature = "esp32-log")]
            println!("[Controller.update_light] sleep timer fired");
        }

        let mode = self.shared.mode();
        if self.light != self.last_light {
            #[cfg(feature = "esp32-log")]
            println!(
                "[Controller.update_light] light {:?} -> {:?} in {:?}",
                self.last_light, self.light, mode
            );
            match self.light {
                LightState::Off => self.exit_on(sleep_before),
                LightState::On => self.enter_on(mode),
            }
        }
        self.last_light = self.light;
        mode
    }

    fn enter_on(&self, mode: Mode) {
        if mode.is_auto() {
            self.shared.wakeup_timer().start();
            self.shared.sleep_timer().start();
        }
    }

    fn exit_on(&self, sleep_before: CountdownTimer) {
        let session = self.shared.sleep_timer().take();
        // Only a sleep timer that ran during this ON period measured it
        let measured = sleep_before.is_enabled() || sleep_before.triggered();
        if let Some(adaptive) = self.config.adaptive
            && measured
        {
            self.learn_sleep(adaptive, session.elapsed());
        }
    }

    fn learn_sleep(&self, adaptive: AdaptiveSleep, elapsed: u32) {
        if elapsed <= adaptive.floor_ticks {
            return;
        }
        #[cfg(feature = "esp32-log")]
        println!("[Controller.learn_sleep] sleep duration set to {:?} ticks", elapsed);
        self.shared.sleep_timer().set_threshold(elapsed);
    }

    fn update_mode(&mut self, mode: Mode) {
        if mode != self.last_mode {
            #[cfg(feature = "esp32-log")]
            println!("[Controller.update_mode] mode {:?} -> {:?}", self.last_mode, mode);
            match mode {
                Mode::Normal => {
                    self.shared.wakeup_timer().cancel();
                    let sleep = self.shared.sleep_timer();
                    sleep.cancel();
                    if self.config.adaptive.is_some() {
                        sleep.set_duration(self.config.sleep_units);
                    }
                }
                Mode::Auto => {
                    if self.light.is_on() {
                        self.shared.sleep_timer().start();
                    }
                }
            }
        }
        self.last_mode = mode;
        self.board.set_mode_indicator(mode.is_auto());
    }
}
