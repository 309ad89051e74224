//! Per-motor ownership of the acquired outputs.

use embedded_hal::digital::OutputPin;

use crate::error::Error;
use crate::hal::PulseOutput;
use crate::motor::Direction;

/// The outputs bound to one motor, plus what was last written to them.
///
/// Any part may be missing. A channel with nothing assigned is inert.
#[derive(Debug)]
pub struct MotorChannel<PWM, OUT> {
    pub(crate) enable: Option<PWM>,
    pub(crate) direction_pins: Option<(OUT, OUT)>,
    pub(crate) speed: u8,
    pub(crate) direction: Direction,
}

impl<PWM, OUT> MotorChannel<PWM, OUT> {
    pub(crate) const fn inert() -> Self {
        Self {
            enable: None,
            direction_pins: None,
            speed: 0,
            direction: Direction::Stop,
        }
    }

    /// Whether speed control is available.
    pub fn has_enable(&self) -> bool {
        self.enable.is_some()
    }

    /// Whether direction control is available.
    pub fn has_direction(&self) -> bool {
        self.direction_pins.is_some()
    }

    /// Whether nothing is assigned to this channel.
    pub fn is_inert(&self) -> bool {
        !self.has_enable() && !self.has_direction()
    }

    /// Hand the outputs back as `(enable, (forward, reverse))`.
    pub fn into_parts(self) -> (Option<PWM>, Option<(OUT, OUT)>) {
        (self.enable, self.direction_pins)
    }
}

impl<PWM: PulseOutput, OUT> MotorChannel<PWM, OUT> {
    /// Program the on-time. Returns `false` if there is no enable output.
    pub(crate) fn write_pulse(&mut self, period_us: u32, duty_us: u32) -> Result<bool, Error> {
        match self.enable.as_mut() {
            Some(pwm) => {
                pwm.set_pulse(period_us, duty_us).map_err(Error::pwm)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

impl<PWM, OUT: OutputPin> MotorChannel<PWM, OUT> {
    /// Drive the direction pair. Returns `false` if there are no direction outputs.
    pub(crate) fn write_direction(&mut self, direction: Direction) -> Result<bool, Error> {
        let Some((forward, reverse)) = self.direction_pins.as_mut() else {
            return Ok(false);
        };
        let (fwd_level, rev_level) = direction.levels();
        forward.set_state(fwd_level).map_err(Error::output)?;
        reverse.set_state(rev_level).map_err(Error::output)?;
        self.direction = direction;
        Ok(true)
    }
}
