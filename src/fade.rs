//! Brightness fade engine
//!
//! Moves the output brightness one step at a time toward the extreme of the
//! requested light state. A full fade between off and max brightness takes
//! the configured fade duration.
//!
//! Two drivers are available:
//! - [`FadeEngine::ramp_toward`] is a resumable step function for a polled
//!   loop. It performs the steps that are due at `now` and returns when the
//!   next one is.
//! - [`FadeEngine::ramp_blocking`] busy-waits between steps and stops early
//!   once the caller no longer wants the target.
//!
//! In both cases an interrupted fade leaves the brightness where it is, so
//! the next fade starts from there.

use embassy_time::{Duration, Instant};
use embedded_hal::delay::DelayNs;

#[cfg(feature = "esp32-log")]
use esp_println::println;

use crate::Board;
use crate::config::ControllerConfig;
use crate::controller::LightState;

/// Brightness of the OFF extreme
pub const OFF_BRIGHTNESS: u8 = 0;

/// Progress of a fade
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FadeStatus {
    /// Brightness equals the target extreme
    Settled,
    /// More steps are needed, the next one is due at `next_step`
    Ramping { next_step: Instant },
}

impl FadeStatus {
    /// Whether brightness has reached the target extreme.
    pub const fn is_settled(self) -> bool {
        matches!(self, Self::Settled)
    }
}

/// Stepwise brightness ramp between off and max brightness
#[derive(Debug, Clone)]
pub struct FadeEngine {
    brightness: u8,
    max_brightness: u8,
    step: Duration,
    output_enabled: bool,
    /// Time of the last step of the fade in progress
    last_step: Option<Instant>,
}

impl FadeEngine {
    /// Create an engine at zero brightness with the output stage off
    pub fn new(config: &ControllerConfig) -> Self {
        Self {
            brightness: OFF_BRIGHTNESS,
            max_brightness: config.max_brightness,
            step: config.fade_step(),
            output_enabled: false,
            last_step: None,
        }
    }

    /// Current brightness
    pub const fn brightness(&self) -> u8 {
        self.brightness
    }

    /// Time between two brightness steps.
    pub const fn step_duration(&self) -> Duration {
        self.step
    }

    /// Whether the PWM output stage is connected.
    pub const fn is_output_enabled(&self) -> bool {
        self.output_enabled
    }

    /// Brightness matching a light state
    pub const fn extreme(&self, state: LightState) -> u8 {
        match state {
            LightState::Off => OFF_BRIGHTNESS,
            LightState::On => self.max_brightness,
        }
    }

    /// Whether brightness has not yet reached the extreme of `state`
    pub const fn is_transitioning(&self, state: LightState) -> bool {
        self.brightness != self.extreme(state)
    }

    /// Perform the fade steps toward `target` that are due at `now`.
    ///
    /// The first step of a fade is taken immediately. When the caller polls
    /// late, the missed steps are taken at once.
    pub fn ramp_toward<B: Board>(
        &mut self,
        target: LightState,
        now: Instant,
        board: &mut B,
    ) -> FadeStatus {
        let goal = self.extreme(target);
        if self.brightness == goal {
            self.last_step = None;
            self.settle(goal, board);
            return FadeStatus::Settled;
        }

        let step_micros = self.step.as_micros();
        let (steps, stepped_at) = match self.last_step {
            _ if step_micros == 0 => (u64::MAX, now),
            None => (1, now),
            Some(last) => {
                let due = now.saturating_duration_since(last).as_micros() / step_micros;
                let due_u32 = u32::try_from(due).unwrap_or(u32::MAX);
                (due, last + self.step * due_u32)
            }
        };
        if steps == 0 {
            let last = self.last_step.unwrap_or(now);
            return FadeStatus::Ramping {
                next_step: last + self.step,
            };
        }

        let distance = self.brightness.abs_diff(goal);
        let count = u8::try_from(steps).unwrap_or(u8::MAX).min(distance);
        for _ in 0..count {
            self.step_toward(goal, board);
        }
        self.last_step = Some(stepped_at);

        if self.brightness == goal {
            self.last_step = None;
            self.settle(goal, board);
            FadeStatus::Settled
        } else {
            FadeStatus::Ramping {
                next_step: stepped_at + self.step,
            }
        }
    }

    /// Fade toward `target`, waiting one step duration after every step.
    ///
    /// Stops as soon as `still_desired` returns false, leaving the
    /// brightness in place. Returns whether the target was reached.
    pub fn ramp_blocking<B: Board, D: DelayNs>(
        &mut self,
        target: LightState,
        board: &mut B,
        delay: &mut D,
        mut still_desired: impl FnMut() -> bool,
    ) -> bool {
        let goal = self.extreme(target);
        let step_us = u32::try_from(self.step.as_micros()).unwrap_or(u32::MAX);
        self.last_step = None;
        while self.brightness != goal && still_desired() {
            self.step_toward(goal, board);
            delay.delay_us(step_us);
        }
        if self.brightness == goal {
            self.settle(goal, board);
            return true;
        }
        #[cfg(feature = "esp32-log")]
        println!("[FadeEngine.ramp_blocking] aborted at {:?}", self.brightness);
        false
    }

    /// Move one step toward `goal` and write the duty cycle
    fn step_toward<B: Board>(&mut self, goal: u8, board: &mut B) {
        if self.brightness < goal {
            self.brightness += 1;
            if !self.output_enabled {
                board.set_output_enabled(true);
                self.output_enabled = true;
            }
        } else if self.brightness > goal {
            self.brightness -= 1;
        }
        board.set_duty(self.brightness);
    }

    /// Turn the output stage off once dark
    fn settle<B: Board>(&mut self, goal: u8, board: &mut B) {
        if goal == OFF_BRIGHTNESS && self.output_enabled {
            board.set_output_enabled(false);
            self.output_enabled = false;
        }
    }
}
