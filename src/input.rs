//! Input filtering: button debounce and mode switch decoding.
//!
//! The button is sampled on every sample tick and must read pressed for a
//! number of consecutive samples before a press is accepted. One press
//! produces one event, the next one requires a release first:
//!
//! | State          | pressed                      | released |
//! |----------------|------------------------------|----------|
//! | `Idle`         | `Sampling(1)` or fire        | `Idle`   |
//! | `Sampling(n)`  | `Sampling(n + 1)` or fire    | `Idle`   |
//! | `Fired`        | `Fired`                      | `Idle`   |
//!
//! The mode switch is assumed clean and is decoded on every edge without
//! filtering.

/// Events produced by the input filter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    /// Confirmed button press, toggles the light
    ButtonPress,
}

/// Operating mode selected by the mode switch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Manual control only
    Normal,
    /// Timer-driven schedule
    Auto,
}

impl Mode {
    /// Decode the mode switch line.
    ///
    /// The line is pulled up, closing the switch selects AUTO.
    pub const fn from_switch(high: bool) -> Self {
        if high { Self::Normal } else { Self::Auto }
    }

    /// Whether the timers run in this mode
    pub const fn is_auto(self) -> bool {
        matches!(self, Self::Auto)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DebounceState {
    Idle,
    Sampling(u16),
    Fired,
}

/// Consecutive-sample button debouncer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Debouncer {
    required: u16,
    state: DebounceState,
}

impl Debouncer {
    /// Create a debouncer accepting a press after `required` samples.
    ///
    /// A count of zero is treated as one.
    pub const fn new(required: u16) -> Self {
        Self {
            required: if required == 0 { 1 } else { required },
            state: DebounceState::Idle,
        }
    }

    /// Feed one sample of the button line
    pub const fn sample(&mut self, pressed: bool) -> Option<InputEvent> {
        if !pressed {
            self.state = DebounceState::Idle;
            return None;
        }
        let count = match self.state {
            DebounceState::Fired => return None,
            DebounceState::Idle => 1,
            DebounceState::Sampling(n) => n.saturating_add(1),
        };
        if count >= self.required {
            self.state = DebounceState::Fired;
            Some(InputEvent::ButtonPress)
        } else {
            self.state = DebounceState::Sampling(count);
            None
        }
    }

    /// Consecutive pressed samples seen so far, before the press is accepted
    pub const fn pending_samples(&self) -> u16 {
        match self.state {
            DebounceState::Sampling(n) => n,
            DebounceState::Idle | DebounceState::Fired => 0,
        }
    }

    /// Whether the current press was already reported
    pub const fn has_fired(&self) -> bool {
        matches!(self.state, DebounceState::Fired)
    }
}
