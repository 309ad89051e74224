use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet};
use std::convert::Infallible;
use std::fmt;
use std::rc::Rc;

use embedded_hal::digital::{self, OutputPin, PinState};
use embedded_hal::pwm;
use sn754410::{Pin, PinProvider, PulseOutput};
use tracing::{info, trace};

/// Last value written to a simulated pin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PinValue {
    Level(PinState),
    Pulse { period_us: u32, duty_us: u32 },
}

impl fmt::Display for PinValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PinValue::Level(PinState::High) => write!(f, "high"),
            PinValue::Level(PinState::Low) => write!(f, "low"),
            PinValue::Pulse { period_us, duty_us } => {
                write!(f, "pwm {duty_us}/{period_us} us")
            }
        }
    }
}

#[derive(Debug, Default)]
struct Pins {
    claimed: BTreeSet<Pin>,
    values: BTreeMap<Pin, PinValue>,
    writes: usize,
}

impl Pins {
    fn record(&mut self, pin: Pin, value: PinValue) {
        trace!(%pin, %value, "pin write");
        self.values.insert(pin, value);
        self.writes += 1;
    }
}

/// Why the simulated board refused a pin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AcquireError {
    AlreadyClaimed(Pin),
}

/// A host-side board that hands out each pin once and remembers every write.
#[derive(Debug, Clone, Default)]
pub struct SimBoard {
    pins: Rc<RefCell<Pins>>,
}

impl SimBoard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn value(&self, pin: Pin) -> Option<PinValue> {
        self.pins.borrow().values.get(&pin).copied()
    }

    pub fn write_count(&self) -> usize {
        self.pins.borrow().writes
    }

    /// Log the final value of every claimed pin.
    pub fn report(&self) {
        for (pin, value) in &self.pins.borrow().values {
            info!(%pin, %value, "final pin state");
        }
    }

    fn claim(&self, pin: Pin) -> Result<(), AcquireError> {
        if self.pins.borrow_mut().claimed.insert(pin) {
            Ok(())
        } else {
            Err(AcquireError::AlreadyClaimed(pin))
        }
    }
}

#[derive(Debug)]
pub struct SimPwm {
    pin: Pin,
    board: SimBoard,
}

impl pwm::ErrorType for SimPwm {
    type Error = Infallible;
}

impl PulseOutput for SimPwm {
    fn set_pulse(&mut self, period_us: u32, duty_us: u32) -> Result<(), Self::Error> {
        self.board
            .pins
            .borrow_mut()
            .record(self.pin, PinValue::Pulse { period_us, duty_us });
        Ok(())
    }
}

#[derive(Debug)]
pub struct SimOutput {
    pin: Pin,
    board: SimBoard,
}

impl digital::ErrorType for SimOutput {
    type Error = Infallible;
}

impl OutputPin for SimOutput {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.board
            .pins
            .borrow_mut()
            .record(self.pin, PinValue::Level(PinState::Low));
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.board
            .pins
            .borrow_mut()
            .record(self.pin, PinValue::Level(PinState::High));
        Ok(())
    }
}

impl PinProvider for SimBoard {
    type Pwm = SimPwm;
    type Output = SimOutput;
    type Error = AcquireError;

    fn acquire_pwm(&mut self, pin: Pin, period_us: u32) -> Result<SimPwm, AcquireError> {
        self.claim(pin)?;
        info!(%pin, period_us, "PWM output acquired");
        Ok(SimPwm {
            pin,
            board: self.clone(),
        })
    }

    fn acquire_output(&mut self, pin: Pin, initial: PinState) -> Result<SimOutput, AcquireError> {
        self.claim(pin)?;
        info!(%pin, ?initial, "digital output acquired");
        let mut output = SimOutput {
            pin,
            board: self.clone(),
        };
        match output.set_state(initial) {
            Ok(()) => Ok(output),
            Err(never) => match never {},
        }
    }
}
