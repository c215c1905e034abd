//! Byte-wide transports to the I2C expander.
mod memory;
#[cfg(target_os = "linux")]
mod linux;

use crate::LcdResult;
use std::fmt::Debug;

pub use memory::*;
#[cfg(target_os = "linux")]
pub use linux::*;

/// A bus that can push single bytes to the expander's output latch.
///
/// Every byte written becomes the new state of all 8 expander pins, so implementations must not
/// buffer or reorder writes.
pub trait I2cBus: Debug + Send {
    /// Writes one byte to the expander. Blocks until the transfer completed or failed.
    fn write_byte(&mut self, byte: u8) -> LcdResult<()>;
}

impl<B: I2cBus + ?Sized> I2cBus for Box<B> {
    fn write_byte(&mut self, byte: u8) -> LcdResult<()> {
        (**self).write_byte(byte)
    }
}
