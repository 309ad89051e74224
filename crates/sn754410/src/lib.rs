#![cfg_attr(not(test), no_std)]
#![warn(missing_docs)]
#![doc = "A `no_std` driver for the SN754410 quad half-H-bridge."]
#![doc = ""]
#![doc = "The chip drives up to two DC motors. Each motor has an enable pin fed with PWM"]
#![doc = "(speed) and a forward/reverse input pair (direction). The driver validates the"]
#![doc = "pin assignment once at construction and then turns speed percentages and"]
#![doc = "directions into immediate writes on the acquired outputs."]
#![doc = ""]
#![doc = "| Module | Purpose |"]
#![doc = "| ------ | ------- |"]
#![doc = "| [`pins`] | Pin identifiers and PWM-capable pin sets per platform |"]
#![doc = "| [`motor`] | Motor selection and direction types |"]
#![doc = "| [`hal`] | Peripheral contract the driver consumes |"]
#![doc = "| [`config`] | Driver configuration |"]
#![doc = "| [`channel`] | Per-motor handle ownership |"]
#![doc = "| [`driver`] | The [`Sn754410`] driver itself |"]

#[cfg(feature = "serde")]
extern crate alloc;

pub mod channel;
pub mod config;
pub mod driver;
pub mod error;
pub mod hal;
pub mod motor;
pub mod pins;

pub use channel::MotorChannel;
pub use config::{DriverConfig, SharedEnablePin, DEFAULT_PERIOD_US};
pub use driver::{MotorPins, Sn754410};
pub use error::{ConfigFault, Error, PinOutOfRange};
pub use hal::{PinProvider, PulseOutput, ScaledPwm};
pub use motor::{Direction, Motor, MotorSelector};
pub use pins::{Pin, Platform, PwmCapablePinSet};
