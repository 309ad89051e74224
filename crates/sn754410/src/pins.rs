//! Pin identifiers and the per-platform sets of PWM-capable pins.

use core::fmt;

#[cfg(feature = "serde")]
use alloc::vec::Vec;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::PinOutOfRange;

/// A board pin identifier (GPIO or header number).
///
/// An unassigned role is expressed as `Option<Pin>::None`.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(transparent))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Pin(pub u8);

impl fmt::Display for Pin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P{}", self.0)
    }
}

impl From<u8> for Pin {
    fn from(id: u8) -> Self {
        Pin(id)
    }
}

/// Set of pins that may carry an enable (speed) signal.
///
/// Backed by a 64-bit mask, so only pins `0..=63` can be members.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(try_from = "PinList", into = "PinList"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PwmCapablePinSet {
    mask: u64,
}

impl PwmCapablePinSet {
    /// Largest pin id the set can hold.
    pub const MAX_PIN: u8 = 63;

    /// A set with no members.
    pub const fn empty() -> Self {
        PwmCapablePinSet { mask: 0 }
    }

    /// Build a set from literal pin ids.
    ///
    /// # Panics
    ///
    /// Panics if an id is above [`Self::MAX_PIN`]; in a `const` item that is a compile
    /// error. Use [`Self::try_from_pins`] for ids read at runtime.
    pub const fn from_pins(pins: &[u8]) -> Self {
        match Self::try_from_pins(pins) {
            Ok(set) => set,
            Err(_) => panic!("pin id above PwmCapablePinSet::MAX_PIN"),
        }
    }

    /// Build a set from pin ids, failing on the first id above [`Self::MAX_PIN`].
    pub const fn try_from_pins(pins: &[u8]) -> Result<Self, PinOutOfRange> {
        let mut mask = 0u64;
        let mut i = 0;
        while i < pins.len() {
            if pins[i] > Self::MAX_PIN {
                return Err(PinOutOfRange(pins[i]));
            }
            mask |= 1u64 << pins[i];
            i += 1;
        }
        Ok(PwmCapablePinSet { mask })
    }

    /// Add a pin. Returns `false` if the pin cannot be represented.
    pub fn insert(&mut self, pin: Pin) -> bool {
        if pin.0 > Self::MAX_PIN {
            return false;
        }
        self.mask |= 1u64 << pin.0;
        true
    }

    /// Whether `pin` is PWM-capable.
    pub const fn contains(&self, pin: Pin) -> bool {
        pin.0 <= Self::MAX_PIN && self.mask & (1u64 << pin.0) != 0
    }

    /// Number of member pins.
    pub const fn len(&self) -> usize {
        self.mask.count_ones() as usize
    }

    /// Whether the set has no members.
    pub const fn is_empty(&self) -> bool {
        self.mask == 0
    }

    /// Member pins in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = Pin> + '_ {
        (0..=Self::MAX_PIN).map(Pin).filter(|pin| self.contains(*pin))
    }
}

impl FromIterator<Pin> for PwmCapablePinSet {
    fn from_iter<I: IntoIterator<Item = Pin>>(iter: I) -> Self {
        let mut set = PwmCapablePinSet::empty();
        for pin in iter {
            set.insert(pin);
        }
        set
    }
}

// Serialized form of a pin set: a plain list of ids.
#[cfg(feature = "serde")]
#[derive(Serialize, Deserialize)]
#[serde(transparent)]
struct PinList(Vec<u8>);

#[cfg(feature = "serde")]
impl TryFrom<PinList> for PwmCapablePinSet {
    type Error = PinOutOfRange;

    fn try_from(list: PinList) -> Result<Self, PinOutOfRange> {
        PwmCapablePinSet::try_from_pins(&list.0)
    }
}

#[cfg(feature = "serde")]
impl From<PwmCapablePinSet> for PinList {
    fn from(set: PwmCapablePinSet) -> Self {
        PinList(set.iter().map(|pin| pin.0).collect())
    }
}

/// Board presets with a known PWM-capable pin set.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(rename_all = "snake_case"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    /// ATmega328P boards: D3, D5, D6, D9, D10, D11.
    ArduinoUno,
    /// ATmega2560 boards: D2 to D13, D44 to D46.
    ArduinoMega,
    /// RP2040: every GPIO maps to a PWM slice channel.
    Rp2040,
}

impl Platform {
    /// PWM-capable pins for this board.
    pub const fn pwm_pins(self) -> PwmCapablePinSet {
        match self {
            Platform::ArduinoUno => PwmCapablePinSet::from_pins(&[3, 5, 6, 9, 10, 11]),
            Platform::ArduinoMega => PwmCapablePinSet::from_pins(&[
                2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 44, 45, 46,
            ]),
            Platform::Rp2040 => PwmCapablePinSet { mask: (1u64 << 30) - 1 },
        }
    }
}
