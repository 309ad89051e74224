//! Motor selection and direction types.

use core::fmt;
use core::ops::{BitOr, BitOrAssign};

use embedded_hal::digital::PinState;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// One of the two motor channels of the chip.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(rename_all = "snake_case"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Motor {
    /// Channel driven by the chip's 1,2EN enable pin.
    Motor1,
    /// Channel driven by the chip's 3,4EN enable pin.
    Motor2,
}

impl Motor {
    /// Both motors, in channel order.
    pub const ALL: [Motor; 2] = [Motor::Motor1, Motor::Motor2];

    /// Zero-based channel index.
    pub const fn index(self) -> usize {
        match self {
            Motor::Motor1 => 0,
            Motor::Motor2 => 1,
        }
    }

    const fn bit(self) -> u8 {
        1 << self.index()
    }
}

impl fmt::Display for Motor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Motor::Motor1 => write!(f, "motor 1"),
            Motor::Motor2 => write!(f, "motor 2"),
        }
    }
}

/// A set of motors an operation applies to.
///
/// Selectors combine with `|`; membership is a bitwise AND against the motor's flag.
///
/// ```
/// use sn754410::{Motor, MotorSelector};
///
/// let both = MotorSelector::MOTOR1 | Motor::Motor2;
/// assert_eq!(both, MotorSelector::BOTH);
/// assert!(both.contains(Motor::Motor2));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct MotorSelector(u8);

impl MotorSelector {
    /// Selects nothing.
    pub const NONE: MotorSelector = MotorSelector(0);
    /// Selects motor 1.
    pub const MOTOR1: MotorSelector = MotorSelector(Motor::Motor1.bit());
    /// Selects motor 2.
    pub const MOTOR2: MotorSelector = MotorSelector(Motor::Motor2.bit());
    /// Selects both motors.
    pub const BOTH: MotorSelector = MotorSelector(Motor::Motor1.bit() | Motor::Motor2.bit());

    /// Whether `motor` is selected.
    pub const fn contains(self, motor: Motor) -> bool {
        self.0 & motor.bit() != 0
    }

    /// Whether no motor is selected.
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Selected motors in channel order.
    pub fn iter(self) -> impl Iterator<Item = Motor> {
        Motor::ALL.into_iter().filter(move |motor| self.contains(*motor))
    }
}

impl From<Motor> for MotorSelector {
    fn from(motor: Motor) -> Self {
        MotorSelector(motor.bit())
    }
}

impl<T: Into<MotorSelector>> BitOr<T> for MotorSelector {
    type Output = MotorSelector;

    fn bitor(self, rhs: T) -> MotorSelector {
        MotorSelector(self.0 | rhs.into().0)
    }
}

impl<T: Into<MotorSelector>> BitOrAssign<T> for MotorSelector {
    fn bitor_assign(&mut self, rhs: T) {
        self.0 |= rhs.into().0;
    }
}

impl BitOr for Motor {
    type Output = MotorSelector;

    fn bitor(self, rhs: Motor) -> MotorSelector {
        MotorSelector::from(self) | rhs
    }
}

impl FromIterator<Motor> for MotorSelector {
    fn from_iter<I: IntoIterator<Item = Motor>>(iter: I) -> Self {
        iter.into_iter().fold(MotorSelector::NONE, |acc, motor| acc | motor)
    }
}

/// Rotation command for a motor.
///
/// Which of `Forward`/`Reverse` turns the shaft clockwise depends on wiring. The three
/// values always map to three distinct level pairs and `Stop` is always both low.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(rename_all = "snake_case"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum Direction {
    /// Both direction inputs low. The motor coasts.
    #[default]
    Stop,
    /// Reverse input high.
    Forward,
    /// Forward input high.
    Reverse,
}

impl Direction {
    /// Levels for the `(forward, reverse)` pin pair.
    pub const fn levels(self) -> (PinState, PinState) {
        match self {
            Direction::Stop => (PinState::Low, PinState::Low),
            Direction::Forward => (PinState::Low, PinState::High),
            Direction::Reverse => (PinState::High, PinState::Low),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selector_union_and_membership() {
        let sel = MotorSelector::MOTOR1 | MotorSelector::MOTOR2;
        assert_eq!(sel, MotorSelector::BOTH);
        assert!(sel.contains(Motor::Motor1));
        assert!(sel.contains(Motor::Motor2));
        assert!(!MotorSelector::MOTOR1.contains(Motor::Motor2));
        assert!(!MotorSelector::NONE.contains(Motor::Motor1));
        assert!(MotorSelector::NONE.is_empty());
    }

    #[test]
    fn test_selector_from_motors() {
        assert_eq!(Motor::Motor1 | Motor::Motor2, MotorSelector::BOTH);
        assert_eq!(MotorSelector::from(Motor::Motor2), MotorSelector::MOTOR2);

        let mut sel = MotorSelector::NONE;
        sel |= Motor::Motor2;
        assert_eq!(sel, MotorSelector::MOTOR2);

        let collected: MotorSelector = [Motor::Motor1, Motor::Motor1].into_iter().collect();
        assert_eq!(collected, MotorSelector::MOTOR1);
    }

    #[test]
    fn test_selector_iter_order() {
        let motors: Vec<Motor> = MotorSelector::BOTH.iter().collect();
        assert_eq!(motors, vec![Motor::Motor1, Motor::Motor2]);
        assert_eq!(MotorSelector::MOTOR2.iter().count(), 1);
        assert_eq!(MotorSelector::NONE.iter().count(), 0);
    }

    #[test]
    fn test_direction_levels_are_distinct() {
        let stop = Direction::Stop.levels();
        let fwd = Direction::Forward.levels();
        let rev = Direction::Reverse.levels();
        assert_eq!(stop, (PinState::Low, PinState::Low));
        assert_eq!(fwd, (PinState::Low, PinState::High));
        assert_eq!(rev, (PinState::High, PinState::Low));
        assert_ne!(fwd, rev);
        assert_eq!(Direction::default(), Direction::Stop);
    }
}
