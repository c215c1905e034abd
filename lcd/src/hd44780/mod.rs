//! HD44780 command set.
//!
//! [HD44780Driver] builds the controller's instruction bytes; implementations only need to know
//! how to get a byte into the command or data register. [Pcf8574Driver] does that through an I2C
//! expander in 4-bit mode.
mod pcf8574;

use crate::{LcdError, LcdResult};
pub use pcf8574::*;
use std::fmt::Debug;

pub trait HD44780Driver: Debug {
    /// Runs the power-on reset sequence and leaves the display on and cleared.
    fn init(&mut self, multiline: bool) -> LcdResult<()>;

    /// Clears the display and sets the cursor to the home position.
    ///
    /// Command: `00000001`. Takes about 1.5 ms to execute, so implementations have to wait for it
    /// before sending anything else.
    fn clear_display(&mut self) -> LcdResult<()>;

    /// Sets the cursor to the home position.
    ///
    /// Command: `0000001?`. As slow as [Self::clear_display].
    fn return_home(&mut self) -> LcdResult<()>;

    /// Sets the display to the specified entry mode.
    fn set_entry_mode(&mut self, cursor_direction: CursorDirection, shift: bool) -> LcdResult<()> {
        let mut command = 0b00000100;
        if cursor_direction == CursorDirection::Right {
            command |= 0b00000010;
        }
        if shift {
            command |= 0b00000001;
        }
        self.send_command(command)
    }

    /// Sets the display on/off, cursor on/off, and blinking on/off.
    fn set_display_control(
        &mut self,
        display_on: bool,
        cursor_on: bool,
        blink_on: bool,
    ) -> LcdResult<()> {
        let mut command = 0b00001000;
        if display_on {
            command |= 0b00000100;
        }
        if cursor_on {
            command |= 0b00000010;
        }
        if blink_on {
            command |= 0b00000001;
        }
        self.send_command(command)
    }

    /// Sets the interface width, number of lines and font.
    fn function_set(&mut self, data_length: bool, two_lines: bool, font: bool) -> LcdResult<()> {
        let mut command = 0b00100000;
        if data_length {
            command |= 0b00010000;
        }
        if two_lines {
            command |= 0b00001000;
        }
        if font {
            command |= 0b00000100;
        }
        self.send_command(command)
    }

    /// Sets the DDRAM address, moving the cursor there.
    fn set_ddram_address(&mut self, address: u8) -> LcdResult<()> {
        if address > 0b01111111 {
            return Err(LcdError::InvalidAddress(address));
        }
        let command = 0b10000000 | address;
        self.send_command(command)
    }

    /// Sends a command to the HD44780 controller.
    /// Sets the RS pin to 0 (command).
    fn send_command(&mut self, command: u8) -> LcdResult<()>;

    /// Sends data to the HD44780 controller.
    /// Sets the RS pin to 1 (data).
    fn send_data(&mut self, data: u8) -> LcdResult<()>;
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum CursorDirection {
    /// Moves the cursor to the left after writing data.
    Left,
    /// Moves the cursor to the right after writing data.
    Right,
}
