#![allow(dead_code)]

use led_autotimer::Board;

/// Board double recording everything the controller writes
#[derive(Debug, Default)]
pub struct MockBoard {
    pub button: bool,
    pub switch_high: bool,
    pub duty: u8,
    pub duty_log: Vec<u8>,
    pub output_enabled: bool,
    pub output_log: Vec<bool>,
    pub indicator: Option<bool>,
}

impl MockBoard {
    /// Board with the mode switch in the AUTO position
    pub fn auto() -> Self {
        Self::default()
    }

    /// Board with the mode switch in the NORMAL position
    pub fn normal() -> Self {
        Self {
            switch_high: true,
            ..Self::default()
        }
    }
}

impl Board for MockBoard {
    fn button_pressed(&mut self) -> bool {
        self.button
    }

    fn mode_switch_high(&mut self) -> bool {
        self.switch_high
    }

    fn set_duty(&mut self, duty: u8) {
        self.duty = duty;
        self.duty_log.push(duty);
    }

    fn set_output_enabled(&mut self, enabled: bool) {
        self.output_enabled = enabled;
        self.output_log.push(enabled);
    }

    fn set_mode_indicator(&mut self, auto: bool) {
        self.indicator = Some(auto);
    }
}

/// Delay that only counts the requested time
#[derive(Debug, Default)]
pub struct CountingDelay {
    pub calls: usize,
    pub total_ns: u64,
}

impl embedded_hal::delay::DelayNs for CountingDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.calls += 1;
        self.total_ns += u64::from(ns);
    }
}
