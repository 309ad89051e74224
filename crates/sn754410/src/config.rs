//! Driver configuration.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::pins::{Platform, PwmCapablePinSet};

/// PWM period used when none is configured, in microseconds.
pub const DEFAULT_PERIOD_US: u32 = 50_000;

/// What to do when motor 2's enable pin is the same pin as motor 1's.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(rename_all = "snake_case"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SharedEnablePin {
    /// Leave motor 2 without a PWM output and log a warning.
    #[default]
    Skip,
    /// Fail construction with [`crate::ConfigFault::SharedEnablePin`].
    Reject,
}

/// Fixed settings a driver is built with.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DriverConfig {
    /// PWM period in microseconds. Shared by both enable outputs.
    pub period_us: u32,
    /// Pins allowed to carry an enable signal.
    pub pwm_pins: PwmCapablePinSet,
    /// Handling of a motor 2 enable pin equal to motor 1's.
    pub shared_enable: SharedEnablePin,
}

impl DriverConfig {
    /// Configuration with the default period for the given PWM-capable pins.
    pub const fn new(pwm_pins: PwmCapablePinSet) -> Self {
        DriverConfig {
            period_us: DEFAULT_PERIOD_US,
            pwm_pins,
            shared_enable: SharedEnablePin::Skip,
        }
    }

    /// Configuration for a board preset.
    pub const fn for_platform(platform: Platform) -> Self {
        Self::new(platform.pwm_pins())
    }

    /// Override the PWM period.
    pub const fn with_period_us(mut self, period_us: u32) -> Self {
        self.period_us = period_us;
        self
    }

    /// Override the shared enable pin policy.
    pub const fn with_shared_enable(mut self, policy: SharedEnablePin) -> Self {
        self.shared_enable = policy;
        self
    }
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self::new(PwmCapablePinSet::empty())
    }
}
