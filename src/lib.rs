#![no_std]

pub mod channel;
pub mod config;
pub mod controller;
pub mod fade;
pub mod input;
pub mod shared;
pub mod timer;

pub use channel::{INPUT_QUEUE_SIZE, InputQueue, TrySendError};
pub use config::{AdaptiveSleep, ConfigError, ControllerConfig, ticks_per_unit};
pub use controller::{Controller, LightState};
pub use fade::{FadeEngine, FadeStatus};
pub use input::{Debouncer, InputEvent, Mode};
pub use shared::SharedState;
pub use timer::{CountdownTimer, SharedTimer};
pub use embassy_time::{Duration, Instant};

/// Abstract board trait
///
/// Implement this trait for each hardware target. Pin setup, clocks and
/// interrupt wiring stay on the target side; the controller only uses the
/// operations below.
pub trait Board {
    /// Read the button, `true` while pressed
    fn button_pressed(&mut self) -> bool;

    /// Read the raw mode switch line
    fn mode_switch_high(&mut self) -> bool;

    /// Write the PWM duty cycle
    fn set_duty(&mut self, duty: u8);

    /// Connect or disconnect the PWM output stage
    fn set_output_enabled(&mut self, enabled: bool);

    /// Show the current mode on a status output, if the board has one
    fn set_mode_indicator(&mut self, _auto: bool) {}
}
