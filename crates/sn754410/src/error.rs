//! Error types for the SN754410 driver.
//!
//! Construction failures and speed validation failures are reported synchronously to
//! the caller. An unconfigured motor is never an error.

use embedded_hal::{digital, pwm};

use crate::motor::Motor;
use crate::pins::Pin;

/// Why a pin assignment was rejected at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFault {
    /// The enable pin is not in the platform's PWM-capable set.
    NotPwmCapable,
    /// Motor 2's enable pin equals motor 1's and the configuration forbids sharing.
    SharedEnablePin,
    /// The configured PWM period is zero.
    ZeroPeriod,
}

/// Errors returned by the driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// The pin assignment is invalid. Construction fails entirely.
    #[error("invalid configuration for {motor} enable pin {pin}: {fault:?}")]
    InvalidConfiguration {
        /// Motor whose assignment failed.
        motor: Motor,
        /// Offending enable pin.
        pin: Pin,
        /// What was wrong with it.
        fault: ConfigFault,
    },
    /// A speed percentage outside `0..=100`. No pin is written.
    #[error("speed {0}% is outside 0..=100")]
    OutOfRange(i32),
    /// The peripheral provider could not hand out this pin.
    #[error("pin {0} could not be acquired")]
    PinUnavailable(Pin),
    /// Programming a PWM output failed.
    #[error("PWM write failed: {0:?}")]
    Pwm(pwm::ErrorKind),
    /// Writing a direction output failed.
    #[error("output write failed: {0:?}")]
    Output(digital::ErrorKind),
}

/// A pin id too large for a [`crate::PwmCapablePinSet`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("pin id {0} is above {max}, the largest id a PWM pin set holds", max = crate::PwmCapablePinSet::MAX_PIN)]
pub struct PinOutOfRange(pub u8);

impl Error {
    pub(crate) fn pwm<E: pwm::Error>(err: E) -> Self {
        Error::Pwm(err.kind())
    }

    pub(crate) fn output<E: digital::Error>(err: E) -> Self {
        Error::Output(err.kind())
    }
}
