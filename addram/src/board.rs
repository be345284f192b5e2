//! Board discovery and the control register.
//!
//! The board is found through the expansion registry by its identifier
//! pair. Its control register is one byte at a fixed offset from the base
//! address; each bit gates a board function.

use crate::error::{AddRamError, Result};
use crate::layout::{BONUS_RAM_ENABLE, CONTROL_REGISTER_OFFSET};
use drivers::hal::bus::{BusAddress, MemoryBus};
use drivers::hal::expansion::{ConfigDev, ExpansionRegistry};

bitflags::bitflags! {
    /// Control register bits.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ControlBits: u8 {
        /// ROM reads are served from board RAM.
        const MAPROM = 1 << 4;
        /// The bonus RAM window is mapped to RAM.
        const BONUS_RAM = 1 << 5;
    }
}

/// Located board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoardHandle {
    base_address: BusAddress,
    control_register: BusAddress,
}

impl BoardHandle {
    pub fn new(device: &ConfigDev) -> Self {
        Self::at(device.board_addr)
    }

    pub const fn at(base_address: BusAddress) -> Self {
        Self {
            base_address,
            control_register: base_address + CONTROL_REGISTER_OFFSET,
        }
    }

    pub fn base_address(&self) -> BusAddress {
        self.base_address
    }

    pub fn control_register(&self) -> BusAddress {
        self.control_register
    }

    /// Current control bits, unknown bits included.
    pub fn control<B: MemoryBus>(&self, bus: &B) -> ControlBits {
        ControlBits::from_bits_retain(bus.read_u8(self.control_register))
    }

    /// Map or unmap the bonus RAM window.
    ///
    /// Other control bits are preserved. Unmapping does not touch the
    /// free-memory list; taking away RAM the list still offers is the
    /// caller's problem.
    pub fn set_enabled<B: MemoryBus>(&self, bus: &mut B, on: bool) {
        let mut bits = self.control(bus);
        bits.set(BONUS_RAM_ENABLE, on);
        bus.write_u8(self.control_register, bits.bits());
        log::debug!(
            "control register {:#08x} <- {:#04x}",
            self.control_register,
            bits.bits()
        );
    }

    /// Map the bonus RAM window until the returned guard is dropped.
    ///
    /// Dropping the guard writes back the control byte as it was before.
    /// Call [`EnableGuard::keep`] to leave the window mapped.
    pub fn enable_scoped<B: MemoryBus>(&self, mut bus: B) -> EnableGuard<B> {
        let saved = bus.read_u8(self.control_register);
        self.set_enabled(&mut bus, true);
        EnableGuard {
            bus,
            register: self.control_register,
            saved,
            restore: true,
        }
    }
}

/// Scoped bonus RAM enable.
pub struct EnableGuard<B: MemoryBus> {
    bus: B,
    register: BusAddress,
    saved: u8,
    restore: bool,
}

impl<B: MemoryBus> EnableGuard<B> {
    /// Leave the window mapped when the guard goes away.
    pub fn keep(&mut self) {
        self.restore = false;
    }
}

impl<B: MemoryBus> Drop for EnableGuard<B> {
    fn drop(&mut self) {
        if self.restore {
            self.bus.write_u8(self.register, self.saved);
            log::debug!("control register {:#08x} restored", self.register);
        }
    }
}

/// Find the board and derive its register addresses.
pub fn locate<R: ExpansionRegistry>(
    registry: &R,
    manufacturer: u16,
    product: u8,
) -> Result<BoardHandle> {
    let device = registry
        .find_device(manufacturer, product)
        .ok_or(AddRamError::BoardNotFound {
            manufacturer,
            product,
        })?;
    let board = BoardHandle::new(&device);
    log::debug!(
        "board {manufacturer}:{product} at {:#08x}, control register {:#08x}",
        board.base_address(),
        board.control_register()
    );
    Ok(board)
}
