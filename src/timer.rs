//! Tick-driven countdown timers.
//!
//! [`CountdownTimer`] is a plain `Copy` value. [`SharedTimer`] wraps it in a
//! critical-section mutex so the unit-tick interrupt and the main loop always
//! see the whole `enabled`/`triggered`/`elapsed` tuple change at once.

use core::cell::Cell;

use critical_section::Mutex;

/// Countdown toward a threshold of ticks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CountdownTimer {
    enabled: bool,
    triggered: bool,
    elapsed: u32,
    threshold: u32,
    ticks_per_unit: u32,
}

impl CountdownTimer {
    /// Create a stopped timer of `units` units
    pub const fn new(units: u32, ticks_per_unit: u32) -> Self {
        Self {
            enabled: false,
            triggered: false,
            elapsed: 0,
            threshold: units.saturating_mul(ticks_per_unit),
            ticks_per_unit,
        }
    }

    /// Restart counting from zero
    pub const fn start(&mut self) {
        self.triggered = false;
        self.elapsed = 0;
        self.enabled = true;
    }

    /// Stop the timer and drop a pending trigger.
    ///
    /// The elapsed count is kept so it can still be measured.
    pub const fn cancel(&mut self) {
        self.enabled = false;
        self.triggered = false;
    }

    /// Advance by one tick
    pub const fn tick(&mut self) {
        if !self.enabled {
            return;
        }
        self.elapsed = self.elapsed.saturating_add(1);
        if self.elapsed >= self.threshold {
            self.enabled = false;
            self.triggered = true;
        }
    }

    /// Whether the threshold was reached since the last start
    pub const fn triggered(&self) -> bool {
        self.triggered
    }

    /// Whether the timer is counting
    pub const fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Ticks counted since the last start
    pub const fn elapsed(&self) -> u32 {
        self.elapsed
    }

    /// Threshold in ticks
    pub const fn threshold(&self) -> u32 {
        self.threshold
    }

    /// Set the threshold in units of time
    pub const fn set_duration(&mut self, units: u32) {
        self.threshold = units.saturating_mul(self.ticks_per_unit);
    }

    /// Set the threshold directly in ticks
    pub const fn set_threshold(&mut self, ticks: u32) {
        self.threshold = ticks;
    }
}

/// Countdown timer shared between the tick interrupt and the main loop
pub struct SharedTimer {
    inner: Mutex<Cell<CountdownTimer>>,
}

impl SharedTimer {
    /// Wrap a timer for sharing with the tick interrupt.
    pub const fn new(timer: CountdownTimer) -> Self {
        Self {
            inner: Mutex::new(Cell::new(timer)),
        }
    }

    /// Consistent copy of the timer state
    pub fn snapshot(&self) -> CountdownTimer {
        critical_section::with(|cs| self.inner.borrow(cs).get())
    }

    /// Apply `f` to the timer inside one critical section
    pub fn update<R>(&self, f: impl FnOnce(&mut CountdownTimer) -> R) -> R {
        critical_section::with(|cs| {
            let cell = self.inner.borrow(cs);
            let mut timer = cell.get();
            let result = f(&mut timer);
            cell.set(timer);
            result
        })
    }

    /// Restart counting from zero, see [`CountdownTimer::start`].
    pub fn start(&self) {
        self.update(CountdownTimer::start);
    }

    /// Stop the timer and drop a pending trigger, see [`CountdownTimer::cancel`].
    pub fn cancel(&self) {
        self.update(CountdownTimer::cancel);
    }

    /// Advance by one tick. Called from the unit tick interrupt.
    pub fn tick(&self) {
        self.update(CountdownTimer::tick);
    }

    /// Whether the threshold was reached since the last start.
    ///
    /// The flag stays set until the timer is cancelled or restarted.
    pub fn triggered(&self) -> bool {
        self.snapshot().triggered()
    }

    /// Ticks counted since the last start.
    pub fn elapsed(&self) -> u32 {
        self.snapshot().elapsed()
    }

    /// Set the threshold in units of time. A running count is kept.
    pub fn set_duration(&self, units: u32) {
        self.update(|timer| timer.set_duration(units));
    }

    /// Set the threshold directly in ticks. A running count is kept.
    pub fn set_threshold(&self, ticks: u32) {
        self.update(|timer| timer.set_threshold(ticks));
    }

    /// Cancel the timer, returning the state it had just before
    pub fn take(&self) -> CountdownTimer {
        self.update(|timer| {
            let before = *timer;
            timer.cancel();
            before
        })
    }
}
