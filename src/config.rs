//! Compile-time configuration of the controller.
//!
//! All values are constants chosen per hardware target. A configuration is
//! checked once with [`ControllerConfig::validate`], or rejected at build time
//! when it is evaluated through [`ControllerConfig::assert_valid`] in a
//! `const` item.

use core::fmt;

use embassy_time::Duration;

/// Default floor for adaptive sleep learning, in ticks
pub const DEFAULT_LEARN_FLOOR_TICKS: u32 = 1800;

/// Number of 8-bit counter overflows that make up one unit of time.
///
/// `cpu_hz / prescale` is the counter clock, one overflow takes 255 counts.
/// Returns `Err(ConfigError::DurationOverflow)` if the result does not fit
/// the tick counter, and `Err(ConfigError::ZeroTicksPerUnit)` for a zero
/// prescaler.
#[allow(clippy::cast_lossless, clippy::cast_possible_truncation)]
pub const fn ticks_per_unit(
    cpu_hz: u32,
    prescale: u32,
    unit_secs: u32,
) -> Result<u32, ConfigError> {
    if prescale == 0 {
        return Err(ConfigError::ZeroTicksPerUnit);
    }
    let ticks = (cpu_hz / prescale) as u64 * unit_secs as u64 / 0xff;
    if ticks > u32::MAX as u64 {
        return Err(ConfigError::DurationOverflow);
    }
    Ok(ticks as u32)
}

/// Adaptive sleep duration settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdaptiveSleep {
    /// Measured sessions must last longer than this to be learned
    pub floor_ticks: u32,
}

impl Default for AdaptiveSleep {
    fn default() -> Self {
        Self {
            floor_ticks: DEFAULT_LEARN_FLOOR_TICKS,
        }
    }
}

/// Controller configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControllerConfig {
    /// Time the light stays on in AUTO mode, in units
    pub sleep_units: u32,
    /// Period of the AUTO schedule, in units. Must exceed `sleep_units`.
    pub wakeup_units: u32,
    /// Unit ticks per unit of time
    pub ticks_per_unit: u32,
    /// Duration of a full fade between off and max brightness
    pub fade_duration: Duration,
    /// Consecutive pressed samples required to accept a button press
    pub debounce_samples: u16,
    /// Brightness of the ON extreme
    pub max_brightness: u8,
    /// Learn the sleep duration from observed sessions
    pub adaptive: Option<AdaptiveSleep>,
}

/// Reasons a configuration is rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// Wakeup duration is not strictly longer than sleep duration
    WakeupNotAfterSleep,
    /// `ticks_per_unit` is zero
    ZeroTicksPerUnit,
    /// `debounce_samples` is zero
    ZeroDebounceSamples,
    /// `max_brightness` is zero
    ZeroMaxBrightness,
    /// A timer threshold does not fit the tick counter
    DurationOverflow,
}

impl ConfigError {
    /// Human-readable description of the error.
    ///
    /// Usable in `const` context, where `Display` is not.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::WakeupNotAfterSleep => "wakeup duration must exceed sleep duration",
            Self::ZeroTicksPerUnit => "ticks per unit must be non-zero",
            Self::ZeroDebounceSamples => "debounce sample count must be non-zero",
            Self::ZeroMaxBrightness => "max brightness must be non-zero",
            Self::DurationOverflow => "timer duration overflows the tick counter",
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ControllerConfig {
    /// Settings of the reference board: one-minute units on a 20 MHz part
    pub const DEFAULT: Self = Self {
        sleep_units: 1,
        wakeup_units: 5,
        ticks_per_unit: match ticks_per_unit(20_000_000, 16384, 60) {
            Ok(ticks) => ticks,
            Err(err) => panic!("{}", err.as_str()),
        },
        fade_duration: Duration::from_millis(1000),
        debounce_samples: 50,
        max_brightness: 0xff,
        adaptive: None,
    };

    /// Check the configuration
    pub const fn validate(self) -> Result<Self, ConfigError> {
        if self.ticks_per_unit == 0 {
            return Err(ConfigError::ZeroTicksPerUnit);
        }
        if self.debounce_samples == 0 {
            return Err(ConfigError::ZeroDebounceSamples);
        }
        if self.max_brightness == 0 {
            return Err(ConfigError::ZeroMaxBrightness);
        }
        if self.wakeup_units <= self.sleep_units {
            return Err(ConfigError::WakeupNotAfterSleep);
        }
        // wakeup is the longer one, so it bounds both thresholds
        if self.wakeup_units.checked_mul(self.ticks_per_unit).is_none() {
            return Err(ConfigError::DurationOverflow);
        }
        Ok(self)
    }

    /// Same as [`validate`](Self::validate), but fails const evaluation.
    ///
    /// ```
    /// use led_autotimer::ControllerConfig;
    ///
    /// const CONFIG: ControllerConfig = ControllerConfig::DEFAULT.assert_valid();
    /// ```
    ///
    /// ```compile_fail
    /// use led_autotimer::ControllerConfig;
    ///
    /// const CONFIG: ControllerConfig = ControllerConfig {
    ///     sleep_units: 5,
    ///     wakeup_units: 5,
    ///     ..ControllerConfig::DEFAULT
    /// }
    /// .assert_valid();
    /// ```
    pub const fn assert_valid(self) -> Self {
        match self.validate() {
            Ok(config) => config,
            Err(err) => panic!("{}", err.as_str()),
        }
    }

    /// Sleep timer threshold in ticks
    pub const fn sleep_ticks(&self) -> u32 {
        self.sleep_units.saturating_mul(self.ticks_per_unit)
    }

    /// Wakeup timer threshold in ticks
    pub const fn wakeup_ticks(&self) -> u32 {
        self.wakeup_units.saturating_mul(self.ticks_per_unit)
    }

    /// Time between two brightness steps
    pub fn fade_step(&self) -> Duration {
        self.fade_duration / u32::from(self.max_brightness.max(1))
    }
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}
