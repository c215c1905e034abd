use crate::bus::I2cBus;
use crate::{LcdError, LcdResult};
use std::io::ErrorKind;
use std::sync::{Arc, Mutex, PoisonError};

/// In-memory bus that records every byte written to it.
///
/// Clones share the same log, so a clone can be kept to inspect the traffic after the original has
/// been handed to a display. Used for dry runs on machines without the hardware.
#[derive(Debug, Clone, Default)]
pub struct MemoryBus {
    log: Arc<Mutex<Vec<u8>>>,
    fail_after: Option<usize>,
}

impl MemoryBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every write fail once `count` bytes have been recorded.
    pub fn with_fail_after(mut self, count: usize) -> Self {
        self.fail_after = Some(count);
        self
    }

    /// Gets a copy of all bytes written so far.
    pub fn written(&self) -> Vec<u8> {
        self.log.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Gets the number of bytes written so far.
    pub fn len(&self) -> usize {
        self.log.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Forgets everything written so far.
    pub fn clear(&self) {
        self.log.lock().unwrap_or_else(PoisonError::into_inner).clear();
    }
}

impl I2cBus for MemoryBus {
    fn write_byte(&mut self, byte: u8) -> LcdResult<()> {
        let mut log = self.log.lock().unwrap_or_else(PoisonError::into_inner);
        if self.fail_after.is_some_and(|limit| log.len() >= limit) {
            return Err(LcdError::Io(ErrorKind::BrokenPipe));
        }
        log.push(byte);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_the_log() {
        let bus = MemoryBus::new();
        let mut writer = bus.clone();
        writer.write_byte(0x12).unwrap();
        writer.write_byte(0x34).unwrap();
        assert_eq!(bus.written(), vec![0x12, 0x34]);
        bus.clear();
        assert!(writer.is_empty());
    }

    #[test]
    fn fails_after_limit() {
        let mut bus = MemoryBus::new().with_fail_after(1);
        bus.write_byte(0xAA).unwrap();
        assert_eq!(bus.write_byte(0xBB), Err(LcdError::Io(ErrorKind::BrokenPipe)));
        assert_eq!(bus.written(), vec![0xAA]);
    }
}
