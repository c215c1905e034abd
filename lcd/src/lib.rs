//! Driver for HD44780-compatible character LCDs wired through an 8-bit I2C GPIO expander
//! (the PCF8574 "backpack" found on most 1602/2004 modules).
//!
//! The controller is driven in 4-bit mode: every command or data byte is split into two nibbles,
//! each latched by pulsing the EN line of the expander. See [Lcd] for the high-level interface and
//! [hd44780::Pcf8574Driver] for the nibble-level protocol.
pub mod bus;
pub mod display;
pub mod geometry;
pub mod hd44780;
pub mod pins;
pub mod text;

pub use bus::{I2cBus, MemoryBus};
#[cfg(target_os = "linux")]
pub use bus::LinuxI2cBus;
pub use display::Lcd;
pub use geometry::Geometry;
pub use pins::PinMap;

use thiserror::Error;

#[derive(Debug, Error, Eq, PartialEq, Clone)]
pub enum LcdError {
    #[error("invalid line number {line}, max {max}")]
    LineOutOfRange { line: u8, max: u8 },
    #[error("invalid column number {column}, max {max}")]
    ColumnOutOfRange { column: u8, max: u8 },
    #[error("DDRAM address {0:#04x} is out of range")]
    InvalidAddress(u8),
    #[error("pin assignment must use distinct bit positions below 8")]
    InvalidPinMap,
    #[error("display used before the hardware was enabled")]
    NotInitialized,
    #[error("display lock poisoned by a panicking thread")]
    Poisoned,
    #[error("IO error: {0}")]
    Io(std::io::ErrorKind),
    #[error("bus error: {0}")]
    Bus(String),
}

impl From<std::io::Error> for LcdError {
    fn from(err: std::io::Error) -> Self {
        LcdError::Io(err.kind())
    }
}

pub type LcdResult<T> = Result<T, LcdError>;
