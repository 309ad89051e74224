//! Peripheral contract the driver consumes.
//!
//! The driver never touches registers. It asks a [`PinProvider`] for outputs bound to pin
//! ids and then programs them through [`PulseOutput`] (enable pins) and
//! [`embedded_hal::digital::OutputPin`] (direction pins).

use core::fmt::Debug;

use embedded_hal::digital::{OutputPin, PinState};
use embedded_hal::pwm::{self, SetDutyCycle};

use crate::pins::Pin;

/// A PWM output programmed with an explicit period and on-time.
pub trait PulseOutput: pwm::ErrorType {
    /// Program the output with a period and an on-time, both in microseconds.
    ///
    /// `duty_us` never exceeds `period_us`.
    fn set_pulse(&mut self, period_us: u32, duty_us: u32) -> Result<(), Self::Error>;
}

/// Hands out exclusive PWM and digital outputs by pin id.
pub trait PinProvider {
    /// PWM handle type.
    type Pwm: PulseOutput;
    /// Digital output handle type.
    type Output: OutputPin;
    /// Acquisition failure.
    type Error: Debug;

    /// Acquire a PWM output on `pin` running at `period_us`.
    fn acquire_pwm(&mut self, pin: Pin, period_us: u32) -> Result<Self::Pwm, Self::Error>;

    /// Acquire a digital output on `pin`, driven to `initial` straight away.
    fn acquire_output(&mut self, pin: Pin, initial: PinState) -> Result<Self::Output, Self::Error>;
}

/// Adapts an `embedded-hal` duty-cycle channel to [`PulseOutput`].
///
/// The channel's timer is expected to already run at the driver's period; the
/// adapter maps `duty_us / period_us` onto `0..=max_duty_cycle()`.
#[derive(Debug)]
pub struct ScaledPwm<P> {
    channel: P,
}

impl<P: SetDutyCycle> ScaledPwm<P> {
    /// Wrap a duty-cycle channel.
    pub fn new(channel: P) -> Self {
        Self { channel }
    }

    /// Release the wrapped channel.
    pub fn free(self) -> P {
        self.channel
    }

    /// Raw duty value for an on-time within a period.
    pub fn raw_duty(&self, period_us: u32, duty_us: u32) -> u16 {
        if period_us == 0 {
            return 0;
        }
        let max = self.channel.max_duty_cycle() as u64;
        let duty = duty_us.min(period_us) as u64;
        (duty * max / period_us as u64) as u16
    }
}

impl<P: SetDutyCycle> pwm::ErrorType for ScaledPwm<P> {
    type Error = P::Error;
}

impl<P: SetDutyCycle> PulseOutput for ScaledPwm<P> {
    fn set_pulse(&mut self, period_us: u32, duty_us: u32) -> Result<(), Self::Error> {
        let raw = self.raw_duty(period_us, duty_us);
        self.channel.set_duty_cycle(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::convert::Infallible;

    // Mock duty-cycle channel with a fixed max, like a 16-bit timer at a low prescaler.
    struct MockChannel {
        duty: u16,
        max: u16,
    }

    impl pwm::ErrorType for MockChannel {
        type Error = Infallible;
    }

    impl SetDutyCycle for MockChannel {
        fn max_duty_cycle(&self) -> u16 {
            self.max
        }

        fn set_duty_cycle(&mut self, duty: u16) -> Result<(), Self::Error> {
            assert!(duty <= self.max);
            self.duty = duty;
            Ok(())
        }
    }

    #[test]
    fn test_scaled_pwm_maps_fraction_of_period() {
        let mut pwm = ScaledPwm::new(MockChannel { duty: 0, max: 1000 });
        pwm.set_pulse(50_000, 25_000).unwrap();
        assert_eq!(pwm.free().duty, 500);
    }

    #[test]
    fn test_scaled_pwm_bounds() {
        let mut pwm = ScaledPwm::new(MockChannel { duty: 7, max: 65_535 });
        pwm.set_pulse(50_000, 0).unwrap();
        assert_eq!(pwm.channel.duty, 0);
        pwm.set_pulse(50_000, 50_000).unwrap();
        assert_eq!(pwm.channel.duty, 65_535);
        // On-time past the period saturates instead of overflowing the channel.
        pwm.set_pulse(50_000, 80_000).unwrap();
        assert_eq!(pwm.channel.duty, 65_535);
    }

    #[test]
    fn test_scaled_pwm_zero_period() {
        let pwm = ScaledPwm::new(MockChannel { duty: 0, max: 1000 });
        assert_eq!(pwm.raw_duty(0, 10), 0);
    }
}
