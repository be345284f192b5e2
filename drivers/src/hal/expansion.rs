//! Expansion Registry Hardware Abstraction Layer.
//!
//! Boards announce themselves at boot with a manufacturer and product
//! identifier and are assigned a base address. The registry is the
//! system's record of that configuration.

use super::bus::BusAddress;

/// One configured expansion board.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ConfigDev {
    /// Registered manufacturer number
    pub manufacturer: u16,
    /// Manufacturer-assigned product number
    pub product: u8,
    /// Base address assigned at configuration time
    pub board_addr: BusAddress,
    /// Size of the assigned address window
    pub board_size: u32,
}

impl ConfigDev {
    pub const fn new(manufacturer: u16, product: u8, board_addr: BusAddress, board_size: u32) -> Self {
        Self {
            manufacturer,
            product,
            board_addr,
            board_size,
        }
    }

    pub fn matches(&self, manufacturer: u16, product: u8) -> bool {
        self.manufacturer == manufacturer && self.product == product
    }
}

/// Device configuration registry.
pub trait ExpansionRegistry {
    /// First configured board matching the identifier pair.
    fn find_device(&self, manufacturer: u16, product: u8) -> Option<ConfigDev>;
}

impl<R: ExpansionRegistry + ?Sized> ExpansionRegistry for &R {
    fn find_device(&self, manufacturer: u16, product: u8) -> Option<ConfigDev> {
        (**self).find_device(manufacturer, product)
    }
}
