//! The SN754410 driver.
//!
//! [`Sn754410`] owns two [`MotorChannel`]s. Pins are validated and acquired once in
//! [`Sn754410::single`] / [`Sn754410::dual`]; afterwards every call writes straight to the
//! acquired outputs and returns when the writes are done.

use embedded_hal::digital::{OutputPin, PinState};
use tracing::{debug, info, warn};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::channel::MotorChannel;
use crate::config::{DriverConfig, SharedEnablePin};
use crate::error::{ConfigFault, Error};
use crate::hal::{PinProvider, PulseOutput};
use crate::motor::{Direction, Motor, MotorSelector};
use crate::pins::Pin;

/// Pin assignment for one motor. `None` leaves a role unassigned.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MotorPins {
    /// Chip enable pin (speed). Must be PWM-capable.
    pub enable: Option<Pin>,
    /// Forward direction input.
    pub forward: Option<Pin>,
    /// Reverse direction input.
    pub reverse: Option<Pin>,
}

impl MotorPins {
    /// No pin assigned to any role.
    pub const UNASSIGNED: MotorPins = MotorPins {
        enable: None,
        forward: None,
        reverse: None,
    };

    /// Assignment from optional pins.
    pub const fn new(enable: Option<Pin>, forward: Option<Pin>, reverse: Option<Pin>) -> Self {
        MotorPins {
            enable,
            forward,
            reverse,
        }
    }

    /// Both direction pins, if both are assigned.
    pub const fn direction_pair(&self) -> Option<(Pin, Pin)> {
        match (self.forward, self.reverse) {
            (Some(forward), Some(reverse)) => Some((forward, reverse)),
            _ => None,
        }
    }
}

/// Driver for one SN754410 wired to up to two motors.
#[derive(Debug)]
pub struct Sn754410<PWM, OUT> {
    channels: [MotorChannel<PWM, OUT>; 2],
    period_us: u32,
}

impl<PWM, OUT> Sn754410<PWM, OUT>
where
    PWM: PulseOutput,
    OUT: OutputPin,
{
    /// Build a driver for a single motor on channel 1.
    ///
    /// Equivalent to [`Sn754410::dual`] with motor 2 unassigned.
    pub fn single<P>(provider: &mut P, config: &DriverConfig, motor1: MotorPins) -> Result<Self, Error>
    where
        P: PinProvider<Pwm = PWM, Output = OUT>,
    {
        Self::dual(provider, config, motor1, MotorPins::UNASSIGNED)
    }

    /// Build a driver for two motors.
    ///
    /// Every enable pin is checked against `config.pwm_pins` before anything is
    /// acquired, so a rejected configuration leaves the provider untouched. Enable
    /// outputs start at duty 0 and direction outputs start low.
    pub fn dual<P>(
        provider: &mut P,
        config: &DriverConfig,
        motor1: MotorPins,
        motor2: MotorPins,
    ) -> Result<Self, Error>
    where
        P: PinProvider<Pwm = PWM, Output = OUT>,
    {
        let enables = Self::validate(config, &motor1, &motor2)?;

        let mut channels = [MotorChannel::inert(), MotorChannel::inert()];
        for (motor, pins) in Motor::ALL.into_iter().zip([motor1, motor2]) {
            let channel = &mut channels[motor.index()];

            if let Some(pin) = enables[motor.index()] {
                let mut pwm = provider
                    .acquire_pwm(pin, config.period_us)
                    .map_err(|err| unavailable(pin, err))?;
                pwm.set_pulse(config.period_us, 0).map_err(Error::pwm)?;
                channel.enable = Some(pwm);
            }

            match pins.direction_pair() {
                Some((fwd_pin, rev_pin)) => {
                    let forward = provider
                        .acquire_output(fwd_pin, PinState::Low)
                        .map_err(|err| unavailable(fwd_pin, err))?;
                    let reverse = provider
                        .acquire_output(rev_pin, PinState::Low)
                        .map_err(|err| unavailable(rev_pin, err))?;
                    channel.direction_pins = Some((forward, reverse));
                }
                None if pins.forward.is_some() || pins.reverse.is_some() => {
                    warn!(%motor, "only one direction pin assigned, direction control disabled");
                }
                None => {}
            }
        }

        info!(
            period_us = config.period_us,
            m1_enable = channels[0].has_enable(),
            m1_direction = channels[0].has_direction(),
            m2_enable = channels[1].has_enable(),
            m2_direction = channels[1].has_direction(),
            "SN754410 driver ready"
        );

        Ok(Self {
            channels,
            period_us: config.period_us,
        })
    }

    /// Resolve which enable pins get a PWM output, or reject the configuration.
    fn validate(
        config: &DriverConfig,
        motor1: &MotorPins,
        motor2: &MotorPins,
    ) -> Result<[Option<Pin>; 2], Error> {
        let check = |motor: Motor, pin: Pin| {
            if config.period_us == 0 {
                Err(Error::InvalidConfiguration {
                    motor,
                    pin,
                    fault: ConfigFault::ZeroPeriod,
                })
            } else if !config.pwm_pins.contains(pin) {
                Err(Error::InvalidConfiguration {
                    motor,
                    pin,
                    fault: ConfigFault::NotPwmCapable,
                })
            } else {
                Ok(pin)
            }
        };

        let m1 = motor1.enable.map(|pin| check(Motor::Motor1, pin)).transpose()?;
        let m2 = match motor2.enable {
            None => None,
            Some(pin) if motor1.enable == Some(pin) => match config.shared_enable {
                SharedEnablePin::Skip => {
                    warn!(%pin, "motor 2 enable pin equals motor 1's, motor 2 speed control disabled");
                    None
                }
                SharedEnablePin::Reject => {
                    return Err(Error::InvalidConfiguration {
                        motor: Motor::Motor2,
                        pin,
                        fault: ConfigFault::SharedEnablePin,
                    });
                }
            },
            Some(pin) => Some(check(Motor::Motor2, pin)?),
        };
        Ok([m1, m2])
    }

    /// Set the speed of the selected motors, in percent of full duty.
    ///
    /// Fails with [`Error::OutOfRange`] for anything outside `0..=100`, before any
    /// output is written and whatever the selector. Selected motors without an enable
    /// output are skipped.
    pub fn set_speed(&mut self, motors: impl Into<MotorSelector>, speed: i32) -> Result<(), Error> {
        if !(0..=100).contains(&speed) {
            return Err(Error::OutOfRange(speed));
        }
        let motors: MotorSelector = motors.into();
        let period_us = self.period_us;
        let duty_us = duty_for(period_us, speed as u8);

        for motor in motors.iter() {
            let channel = &mut self.channels[motor.index()];
            if channel.write_pulse(period_us, duty_us)? {
                channel.speed = speed as u8;
                debug!(%motor, speed, duty_us, "speed set");
            }
        }
        Ok(())
    }

    /// Set the direction of the selected motors.
    ///
    /// Selected motors without a full direction pin pair are skipped. Only fails if an
    /// output write fails.
    pub fn set_direction(
        &mut self,
        motors: impl Into<MotorSelector>,
        direction: Direction,
    ) -> Result<(), Error> {
        let motors: MotorSelector = motors.into();
        for motor in motors.iter() {
            if self.channels[motor.index()].write_direction(direction)? {
                debug!(%motor, ?direction, "direction set");
            }
        }
        Ok(())
    }
}

impl<PWM, OUT> Sn754410<PWM, OUT> {
    /// PWM period shared by both enable outputs, in microseconds.
    pub fn period_us(&self) -> u32 {
        self.period_us
    }

    /// Last speed set on `motor`, or `None` if it has no enable output.
    pub fn speed(&self, motor: Motor) -> Option<u8> {
        let channel = &self.channels[motor.index()];
        channel.has_enable().then_some(channel.speed)
    }

    /// Last direction set on `motor`, or `None` if it has no direction outputs.
    pub fn direction(&self, motor: Motor) -> Option<Direction> {
        let channel = &self.channels[motor.index()];
        channel.has_direction().then_some(channel.direction)
    }

    /// The outputs owned for `motor`.
    pub fn channel(&self, motor: Motor) -> &MotorChannel<PWM, OUT> {
        &self.channels[motor.index()]
    }

    /// Release both channels, in motor order.
    pub fn free(self) -> [MotorChannel<PWM, OUT>; 2] {
        self.channels
    }
}

/// On-time for a percentage of `period_us`. Exact at 0 and 100.
pub const fn duty_for(period_us: u32, speed: u8) -> u32 {
    (speed as u64 * period_us as u64 / 100) as u32
}

fn unavailable<E: core::fmt::Debug>(pin: Pin, err: E) -> Error {
    warn!(%pin, error = ?err, "pin acquisition failed");
    Error::PinUnavailable(pin)
}
