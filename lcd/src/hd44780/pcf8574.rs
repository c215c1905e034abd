use crate::bus::I2cBus;
use crate::hd44780::{CursorDirection, HD44780Driver};
use crate::pins::PinMap;
use crate::LcdResult;
use log::{debug, trace};
use std::thread::sleep;
use std::time::Duration;

/// HD44780 driver talking 4-bit mode through an 8-bit I2C expander.
///
/// Each nibble becomes three bus writes: the nibble with EN low, the same byte with EN high, and
/// EN low again. The controller latches on the falling edge. I2C transfers are slow enough that no
/// extra delay is needed between them, so only the reset sequence and the slow clear/home
/// instructions sleep.
///
/// The backlight bit lives on the same latch as the data lines, so it is re-asserted on every
/// byte written.
#[derive(Debug)]
pub struct Pcf8574Driver<B> {
    bus: B,
    pins: PinMap,
    backlight: bool,
}

impl<B: I2cBus> Pcf8574Driver<B> {
    /// Execution time of clear display and return home.
    const SLOW_COMMAND_DELAY: Duration = Duration::from_millis(2);

    /// Creates the driver. No bus traffic happens until [HD44780Driver::init].
    ///
    /// # Errors
    /// - [crate::LcdError::InvalidPinMap] if `pins` does not [validate](PinMap::validate).
    pub fn new(bus: B, pins: PinMap) -> LcdResult<Self> {
        pins.validate()?;
        Ok(Pcf8574Driver {
            bus,
            pins,
            backlight: false,
        })
    }

    pub fn backlight(&self) -> bool {
        self.backlight
    }

    /// Switches the backlight, writing a single byte with every other line low.
    pub fn set_backlight(&mut self, on: bool) -> LcdResult<()> {
        debug!("Backlight {}", if on { "on" } else { "off" });
        self.backlight = on;
        let byte = self.pins.with(0, self.pins.backlight, on);
        self.bus.write_byte(byte)
    }

    fn pulse_e(&mut self, byte: u8) -> LcdResult<()> {
        let byte = self.pins.with(byte, self.pins.backlight, self.backlight);
        let byte = self.pins.with(byte, self.pins.enable, false);
        self.bus.write_byte(byte)?;
        self.bus.write_byte(self.pins.with(byte, self.pins.enable, true))?;
        self.bus.write_byte(byte)
    }

    fn write_nibble(&mut self, nibble: u8, rs: bool) -> LcdResult<()> {
        let byte = self.pins.nibble(nibble, rs);
        self.pulse_e(byte)
    }

    /// Sends a full byte as two nibbles, high nibble first.
    ///
    /// Exactly six bus writes are made. A failed write is returned as is; the controller may then
    /// hold half a byte, so the caller has to restart the whole operation.
    pub fn send_byte(&mut self, data: u8, rs: bool) -> LcdResult<()> {
        trace!("Sending data: {:08b}, RS: {}", data, rs);
        self.write_nibble(data >> 4, rs)?;
        self.write_nibble(data & 0x0F, rs)
    }
}

impl<B: I2cBus> HD44780Driver for Pcf8574Driver<B> {
    fn init(&mut self, multiline: bool) -> LcdResult<()> {
        debug!("Synchronizing controller");
        // Function set with DL=1, three times, whatever mode the controller was in
        for delay in [200, 100, 100] {
            self.write_nibble(0b0011, false)?;
            sleep(Duration::from_millis(delay));
        }
        // DL=0: from now on every byte takes two nibbles
        self.write_nibble(0b0010, false)?;
        sleep(Duration::from_millis(10));

        debug!("Configuring controller, multiline: {}", multiline);
        self.function_set(false, multiline, false)?;
        self.set_display_control(true, true, false)?;
        self.clear_display()?;
        // Increment, no shift (0x06). Sending 0x0E here instead (a second display control, as some
        // drivers do) leaves the controller in this same power-on default.
        self.set_entry_mode(CursorDirection::Right, false)?;
        Ok(())
    }

    fn clear_display(&mut self) -> LcdResult<()> {
        self.send_command(0b00000001)?;
        sleep(Self::SLOW_COMMAND_DELAY);
        Ok(())
    }

    fn return_home(&mut self) -> LcdResult<()> {
        self.send_command(0b00000010)?;
        sleep(Self::SLOW_COMMAND_DELAY);
        Ok(())
    }

    fn send_command(&mut self, command: u8) -> LcdResult<()> {
        self.send_byte(command, false)
    }

    fn send_data(&mut self, data: u8) -> LcdResult<()> {
        self.send_byte(data, true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bus::MemoryBus;
    use crate::LcdError;
    use std::io::ErrorKind;

    fn driver() -> (Pcf8574Driver<MemoryBus>, MemoryBus) {
        let bus = MemoryBus::new();
        (Pcf8574Driver::new(bus.clone(), PinMap::default()).unwrap(), bus)
    }

    #[test]
    fn data_byte_is_six_writes() {
        let (mut driver, bus) = driver();
        driver.send_data(b'A').unwrap();
        assert_eq!(bus.written(), vec![0x41, 0x45, 0x41, 0x11, 0x15, 0x11]);
    }

    #[test]
    fn command_byte_keeps_rs_low() {
        let (mut driver, bus) = driver();
        driver.send_command(0x28).unwrap();
        assert_eq!(bus.written(), vec![0x20, 0x24, 0x20, 0x80, 0x84, 0x80]);
    }

    #[test]
    fn backlight_folded_into_every_write() {
        let (mut driver, bus) = driver();
        driver.set_backlight(true).unwrap();
        assert!(driver.backlight());
        driver.send_data(b'A').unwrap();
        assert_eq!(
            bus.written(),
            vec![0x08, 0x49, 0x4D, 0x49, 0x19, 0x1D, 0x19],
        );

        bus.clear();
        driver.set_backlight(false).unwrap();
        driver.send_command(0x28).unwrap();
        assert_eq!(bus.written(), vec![0x00, 0x20, 0x24, 0x20, 0x80, 0x84, 0x80]);
    }

    #[test]
    fn custom_wiring() {
        let pins = PinMap {
            rs: 4,
            enable: 7,
            backlight: 6,
            data: [0, 1, 2, 3],
        };
        let bus = MemoryBus::new();
        let mut driver = Pcf8574Driver::new(bus.clone(), pins).unwrap();
        driver.set_backlight(true).unwrap();
        bus.clear();
        driver.send_data(0x9C).unwrap();
        assert_eq!(bus.written(), vec![0x59, 0xD9, 0x59, 0x5C, 0xDC, 0x5C]);
    }

    #[test]
    fn init_sequence() {
        let (mut driver, bus) = driver();
        driver.init(true).unwrap();
        let expected = vec![
            // 8-bit synchronization
            0x30, 0x34, 0x30, //
            0x30, 0x34, 0x30, //
            0x30, 0x34, 0x30, //
            // switch to 4-bit
            0x20, 0x24, 0x20, //
            // function set: 4-bit, 2 lines
            0x20, 0x24, 0x20, 0x80, 0x84, 0x80, //
            // display on, cursor on
            0x00, 0x04, 0x00, 0xE0, 0xE4, 0xE0, //
            // clear
            0x00, 0x04, 0x00, 0x10, 0x14, 0x10, //
            // entry mode: increment
            0x00, 0x04, 0x00, 0x60, 0x64, 0x60, //
        ];
        assert_eq!(bus.written(), expected);
    }

    #[test]
    fn failed_write_stops_the_byte() {
        let bus = MemoryBus::new().with_fail_after(4);
        let mut driver = Pcf8574Driver::new(bus.clone(), PinMap::default()).unwrap();
        assert_eq!(driver.send_data(b'A'), Err(LcdError::Io(ErrorKind::BrokenPipe)));
        assert_eq!(bus.written(), vec![0x41, 0x45, 0x41, 0x11]);
    }

    #[test]
    fn out_of_range_pin_rejected() {
        let bus = MemoryBus::new();
        let pins = PinMap { enable: 9, ..PinMap::default() };
        assert_eq!(
            Pcf8574Driver::new(bus.clone(), pins).map(|_| ()),
            Err(LcdError::InvalidPinMap),
        );
        assert!(bus.is_empty());
    }
}
