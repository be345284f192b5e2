use crate::hal::expansion::{ConfigDev, ExpansionRegistry};
use alloc::vec::Vec;

/// Table of configured expansion boards, in configuration order.
pub struct DeviceManager {
    devices: Vec<ConfigDev>,
}

impl DeviceManager {
    pub const fn new() -> Self {
        Self {
            devices: Vec::new(),
        }
    }

    /// Record a configured board.
    ///
    /// A board already registered at the same base address is replaced.
    pub fn register(&mut self, device: ConfigDev) {
        match self
            .devices
            .iter_mut()
            .find(|d| d.board_addr == device.board_addr)
        {
            Some(slot) => *slot = device,
            None => self.devices.push(device),
        }
    }
}

impl Default for DeviceManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ExpansionRegistry for DeviceManager {
    fn find_device(&self, manufacturer: u16, product: u8) -> Option<ConfigDev> {
        self.devices
            .iter()
            .find(|d| d.matches(manufacturer, product))
            .copied()
    }
}
