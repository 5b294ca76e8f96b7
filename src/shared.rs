//! State shared with interrupt handlers.
//!
//! The platform layer keeps one [`SharedState`] in a `static` and forwards
//! its interrupts to the `on_*` callbacks. The callbacks only count, set
//! flags and enqueue events; all decisions are made by the controller.
//!
//! ```ignore
//! static SHARED: SharedState = SharedState::new(&CONFIG);
//!
//! #[interrupt]
//! fn TIMER1_OVF() {
//!     SHARED.on_unit_tick();
//! }
//! ```

use core::cell::Cell;

use critical_section::Mutex;

use crate::channel::InputQueue;
use crate::config::ControllerConfig;
use crate::input::{Debouncer, Mode};
use crate::timer::{CountdownTimer, SharedTimer};

/// Timers, mode and button input shared between interrupts and the main loop
pub struct SharedState {
    config: ControllerConfig,
    wakeup: SharedTimer,
    sleep: SharedTimer,
    mode: Mutex<Cell<Mode>>,
    debouncer: Mutex<Cell<Debouncer>>,
    events: InputQueue,
}

impl SharedState {
    /// Create the shared state for `config`, with both timers stopped.
    ///
    /// The configuration is validated here. In a `static` an invalid
    /// configuration fails the build, elsewhere construction panics.
    ///
    /// ```
    /// use led_autotimer::{ControllerConfig, SharedState};
    ///
    /// static SHARED: SharedState = SharedState::new(&ControllerConfig::DEFAULT);
    /// ```
    ///
    /// ```compile_fail
    /// use led_autotimer::{ControllerConfig, SharedState};
    ///
    /// static SHARED: SharedState = SharedState::new(&ControllerConfig {
    ///     sleep_units: 5,
    ///     wakeup_units: 5,
    ///     ..ControllerConfig::DEFAULT
    /// });
    /// ```
    pub const fn new(config: &ControllerConfig) -> Self {
        let config = config.assert_valid();
        Self {
            config,
            wakeup: SharedTimer::new(CountdownTimer::new(
                config.wakeup_units,
                config.ticks_per_unit,
            )),
            sleep: SharedTimer::new(CountdownTimer::new(
                config.sleep_units,
                config.ticks_per_unit,
            )),
            mode: Mutex::new(Cell::new(Mode::Normal)),
            debouncer: Mutex::new(Cell::new(Debouncer::new(config.debounce_samples))),
            events: InputQueue::new(),
        }
    }

    /// Unit tick interrupt: advance both timers by one tick.
    pub fn on_unit_tick(&self) {
        self.wakeup.tick();
        self.sleep.tick();
    }

    /// Sample tick interrupt: feed the button level to the debouncer.
    ///
    /// A confirmed press is queued for the controller.
    pub fn on_sample_tick(&self, pressed: bool) {
        let event = critical_section::with(|cs| {
            let cell = self.debouncer.borrow(cs);
            let mut debouncer = cell.get();
            let event = debouncer.sample(pressed);
            cell.set(debouncer);
            event
        });
        if let Some(event) = event {
            // A full queue means the main loop is behind, the press is dropped
            let _ = self.events.try_send(event);
        }
    }

    /// Mode switch edge interrupt: decode the switch level into the mode.
    pub fn on_mode_edge(&self, switch_high: bool) {
        self.set_mode(Mode::from_switch(switch_high));
    }

    /// Configuration the state was built from.
    pub const fn config(&self) -> &ControllerConfig {
        &self.config
    }

    /// Current operating mode, as last published by the mode switch.
    pub fn mode(&self) -> Mode {
        critical_section::with(|cs| self.mode.borrow(cs).get())
    }

    /// Publish a new operating mode.
    ///
    /// Used at boot; afterwards the mode edge interrupt keeps it current.
    pub fn set_mode(&self, mode: Mode) {
        critical_section::with(|cs| self.mode.borrow(cs).set(mode));
    }

    /// Timer that turns the light on in AUTO mode.
    pub const fn wakeup_timer(&self) -> &SharedTimer {
        &self.wakeup
    }

    /// Timer that turns the light off in AUTO mode.
    pub const fn sleep_timer(&self) -> &SharedTimer {
        &self.sleep
    }

    /// Queue of confirmed button presses, drained by the controller.
    pub const fn events(&self) -> &InputQueue {
        &self.events
    }

    /// Whether something the controller reacts to is waiting
    pub fn has_pending_change(&self) -> bool {
        !self.events.is_empty() || self.wakeup.triggered() || self.sleep.triggered()
    }
}
