use crate::bus::I2cBus;
use crate::{LcdError, LcdResult};
use i2cdev::core::I2CDevice;
use i2cdev::linux::LinuxI2CDevice;
use log::debug;
use std::fmt::{Debug, Formatter};
use std::path::{Path, PathBuf};

/// I2C bus backed by a Linux `i2c-dev` character device (e.g. `/dev/i2c-1`).
pub struct LinuxI2cBus {
    device: LinuxI2CDevice,
    path: PathBuf,
    address: u16,
}

impl LinuxI2cBus {
    /// Opens the character device and binds it to the expander's slave address.
    pub fn open(path: impl AsRef<Path>, address: u16) -> LcdResult<Self> {
        let path = path.as_ref().to_path_buf();
        debug!("Opening {} @ {:#04x}", path.display(), address);
        let device = LinuxI2CDevice::new(&path, address)
            .map_err(|err| LcdError::Bus(format!("can't open {}: {}", path.display(), err)))?;
        Ok(LinuxI2cBus { device, path, address })
    }
}

impl Debug for LinuxI2cBus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "LinuxI2cBus({} @ {:#04x})", self.path.display(), self.address)
    }
}

impl I2cBus for LinuxI2cBus {
    fn write_byte(&mut self, byte: u8) -> LcdResult<()> {
        self.device
            .write(&[byte])
            .map_err(|err| LcdError::Bus(err.to_string()))
    }
}
