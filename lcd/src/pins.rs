use crate::{LcdError, LcdResult};
use bitvec::prelude::*;
use serde::{Deserialize, Serialize};

/// Maps the LCD's logical signals to bit positions (0–7) of the expander's output byte.
///
/// The default matches the common PCF8574 backpack: `P0` RS, `P1` RW (tied low, unused), `P2` EN,
/// `P3` backlight, `P4`–`P7` D4–D7. Boards with different wiring only need a different map.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct PinMap {
    /// Register select. High selects the data register.
    pub rs: u8,
    /// Enable. Data is latched on its falling edge.
    pub enable: u8,
    pub backlight: u8,
    /// Data lines D4, D5, D6, D7, in that order.
    pub data: [u8; 4],
}

impl Default for PinMap {
    fn default() -> Self {
        PinMap {
            rs: 0,
            enable: 2,
            backlight: 3,
            data: [4, 5, 6, 7],
        }
    }
}

impl PinMap {
    /// Checks that every signal sits on its own bit below 8.
    pub fn validate(&self) -> LcdResult<()> {
        let mut used = 0u8;
        for &pin in [self.rs, self.enable, self.backlight].iter().chain(&self.data) {
            if pin >= 8 || used & (1 << pin) != 0 {
                return Err(LcdError::InvalidPinMap);
            }
            used |= 1 << pin;
        }
        Ok(())
    }

    /// Builds the expander byte for one nibble, with EN low and the backlight off.
    ///
    /// Only the low four bits of `nibble` are used, bit 0 going to D4.
    pub(crate) fn nibble(&self, nibble: u8, rs: bool) -> u8 {
        let mut byte = 0u8;
        let bits = byte.view_bits_mut::<Lsb0>();
        for (i, &pin) in self.data.iter().enumerate() {
            bits.set(pin as usize, nibble & (1 << i) != 0);
        }
        bits.set(self.rs as usize, rs);
        byte
    }

    /// Returns `byte` with the given pin forced to `value`.
    pub(crate) fn with(&self, byte: u8, pin: u8, value: bool) -> u8 {
        let mut byte = byte;
        byte.view_bits_mut::<Lsb0>().set(pin as usize, value);
        byte
    }
}
