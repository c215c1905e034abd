use crate::bus::I2cBus;
use crate::geometry::Geometry;
use crate::hd44780::{HD44780Driver, Pcf8574Driver};
use crate::pins::PinMap;
use crate::text;
use crate::{LcdError, LcdResult};
use log::debug;
use std::fmt::Display;
use std::sync::{Mutex, MutexGuard};

/// High-level handle to a character LCD.
///
/// All state that ends up on the wire (the bus itself, the backlight flag, the power flag) sits
/// behind one lock, held for a whole operation. Positioning the cursor and writing the text that
/// follows can therefore not be interleaved with another thread's writes.
///
/// While [powered off](Self::power_off) every display operation returns immediately without
/// touching the bus. That is a software switch only; the hardware keeps showing what it showed.
///
/// Bus failures are not retried. The controller may be left mid-byte, so recovering means
/// re-issuing the whole operation, not just the failed write.
#[derive(Debug)]
pub struct Lcd<B: I2cBus> {
    geometry: Geometry,
    pins: PinMap,
    state: Mutex<LcdState<B>>,
}

#[derive(Debug)]
struct LcdState<B> {
    on: bool,
    /// Last backlight state sent to the expander. Survives a failed [Lcd::enable].
    backlight: bool,
    driver: Option<Pcf8574Driver<B>>,
}

impl<B: I2cBus> LcdState<B> {
    fn driver(&mut self) -> LcdResult<&mut Pcf8574Driver<B>> {
        self.driver.as_mut().ok_or(LcdError::NotInitialized)
    }

    fn set_backlight(&mut self, on: bool) -> LcdResult<()> {
        let result = self.driver()?.set_backlight(on);
        // The driver folds the new state into every later write, even if this one failed.
        self.backlight = on;
        result
    }
}

impl<B: I2cBus> Lcd<B> {
    /// Creates a display handle for the usual PCF8574 wiring. No bus traffic happens until
    /// [Self::enable].
    pub fn new(rows: u8, columns: u8) -> Self {
        Lcd {
            geometry: Geometry::new(rows, columns),
            pins: PinMap::default(),
            state: Mutex::new(LcdState {
                on: false,
                backlight: false,
                driver: None,
            }),
        }
    }

    /// Creates a display handle for an expander wired differently.
    ///
    /// # Errors
    /// - [LcdError::InvalidPinMap] if two signals share a bit or a bit is out of range.
    pub fn with_pins(rows: u8, columns: u8, pins: PinMap) -> LcdResult<Self> {
        pins.validate()?;
        let mut lcd = Self::new(rows, columns);
        lcd.pins = pins;
        Ok(lcd)
    }

    pub fn geometry(&self) -> Geometry {
        self.geometry
    }

    pub fn pins(&self) -> PinMap {
        self.pins
    }

    fn lock(&self) -> LcdResult<MutexGuard<'_, LcdState<B>>> {
        self.state.lock().map_err(|_| LcdError::Poisoned)
    }

    /// Runs `op` under the lock if the display is powered on, or returns the default otherwise.
    fn when_on<R: Default>(
        &self,
        op: impl FnOnce(&mut LcdState<B>) -> LcdResult<R>,
    ) -> LcdResult<R> {
        let mut state = self.lock()?;
        if !state.on {
            return Ok(R::default());
        }
        op(&mut *state)
    }

    /// Takes ownership of `bus` and runs the controller's reset sequence over it.
    ///
    /// Must be called before any display operation. Calling it again replaces the bus and resets
    /// the controller; the backlight flag carries over and is sent before the reset. If the reset
    /// fails the display is left uninitialized, while [Self::backlight] keeps reporting the flag.
    pub fn enable(&self, bus: B) -> LcdResult<()> {
        let mut state = self.lock()?;
        debug!("Enabling {:?} on {:?}", self.geometry, bus);

        let mut driver = Pcf8574Driver::new(bus, self.pins)?;
        state.driver = None;
        if state.backlight {
            driver.set_backlight(true)?;
        }
        driver.init(self.geometry.rows > 1)?;
        state.driver = Some(driver);

        debug!("Display enabled");
        Ok(())
    }

    pub fn power_on(&self) -> LcdResult<()> {
        debug!("Power on");
        self.lock()?.on = true;
        Ok(())
    }

    pub fn power_off(&self) -> LcdResult<()> {
        debug!("Power off");
        self.lock()?.on = false;
        Ok(())
    }

    pub fn is_on(&self) -> LcdResult<bool> {
        Ok(self.lock()?.on)
    }

    /// Gets the backlight flag. `false` until the backlight was switched on.
    pub fn backlight(&self) -> LcdResult<bool> {
        Ok(self.lock()?.backlight)
    }

    pub fn backlight_on(&self) -> LcdResult<()> {
        self.when_on(|state| state.set_backlight(true))
    }

    pub fn backlight_off(&self) -> LcdResult<()> {
        self.when_on(|state| state.set_backlight(false))
    }

    /// Clears the display and moves the cursor home.
    pub fn clear(&self) -> LcdResult<()> {
        self.when_on(|state| state.driver()?.clear_display())
    }

    /// Moves the cursor to the first cell of line 1.
    pub fn home(&self) -> LcdResult<()> {
        self.when_on(|state| state.driver()?.return_home())
    }

    /// Translates a 1-based position into a DDRAM address. See [Geometry::resolve_address].
    pub fn resolve_address(&self, line: u8, column: u8) -> LcdResult<u8> {
        self.geometry.resolve_address(line, column)
    }

    /// Moves the cursor to the 1-based (line, column) position.
    pub fn set_position(&self, line: u8, column: u8) -> LcdResult<()> {
        self.when_on(|state| {
            let address = self.geometry.resolve_address(line, column)?;
            state.driver()?.set_ddram_address(address)
        })
    }

    /// Blanks a whole line.
    pub fn clear_line(&self, line: u8) -> LcdResult<()> {
        self.when_on(|state| {
            let blank = text::pad(Vec::new(), self.width());
            self.write_line(state, line, blank).map(|_| ())
        })
    }

    /// Writes `message` at the start of `line`, padded with spaces to the full width.
    ///
    /// Anything implementing [Display] works, including `format_args!(...)`. Returns the number of
    /// bytes written, which is the line width unless the display is off.
    pub fn print_at(&self, line: u8, message: impl Display) -> LcdResult<usize> {
        self.when_on(|state| {
            let rendered = text::pad(text::render(message), self.width());
            self.write_line(state, line, rendered)
        })
    }

    /// Writes `message` centered on `line`, padded with spaces on both sides.
    pub fn center_at(&self, line: u8, message: impl Display) -> LcdResult<usize> {
        self.when_on(|state| {
            let rendered = text::center(text::render(message), self.width());
            self.write_line(state, line, rendered)
        })
    }

    /// Writes `message` aligned to the right edge of `line`.
    pub fn right_justify_at(&self, line: u8, message: impl Display) -> LcdResult<usize> {
        self.when_on(|state| {
            let rendered = text::right_justify(text::render(message), self.width());
            self.write_line(state, line, rendered)
        })
    }

    fn width(&self) -> usize {
        self.geometry.columns as usize
    }

    /// Positions the cursor at the start of `line` and writes `bytes`, cut to the line width.
    /// Must be called with the lock held, so the address and the text stay together.
    fn write_line(&self, state: &mut LcdState<B>, line: u8, bytes: Vec<u8>) -> LcdResult<usize> {
        let bytes = text::truncate(bytes, self.width());
        let address = self.geometry.resolve_address(line, 1)?;
        let driver = state.driver()?;

        driver.set_ddram_address(address)?;
        for &byte in &bytes {
            driver.send_data(byte)?;
        }
        Ok(bytes.len())
    }
}

#[cfg(target_os = "linux")]
impl Lcd<crate::bus::LinuxI2cBus> {
    /// Opens `device` (e.g. `/dev/i2c-1`), binds it to the expander at `address` and
    /// [enables](Self::enable) the display over it.
    pub fn enable_hardware(&self, device: &str, address: u16) -> LcdResult<()> {
        self.enable(crate::bus::LinuxI2cBus::open(device, address)?)
    }
}
