//! Simulated machine.
//!
//! A cooperative single-address-space system with RAM, CIA mirrors, one
//! expansion board and the OS free-memory list, all in host memory. The
//! machine is built once with [`SimBuilder`] and then driven only through
//! the [`Platform`] trait, like real hardware.

mod memory;
mod sched;

pub use memory::{OPEN_BUS, SimMemory};
pub use sched::SimScheduler;

use super::Platform;
use crate::device_manager::DeviceManager;
use crate::hal::bus::{BusAddress, MemoryBus};
use crate::hal::expansion::{ConfigDev, ExpansionRegistry};
use alloc::sync::Arc;
use common::memlist::{FreeRegion, MemList};
use common::sync::ForbidLock;
use core::sync::atomic::{AtomicUsize, Ordering};
use spin::{Mutex, MutexGuard};

/// Software revision of a current system.
pub const DEFAULT_SOFT_VERSION: u16 = 40;

pub struct SimPlatform {
    soft_version: u16,
    memory: Arc<Mutex<SimMemory>>,
    mem_list: ForbidLock<MemList, SimScheduler>,
    devices: Option<Arc<DeviceManager>>,
    open_services: Arc<AtomicUsize>,
}

impl SimPlatform {
    pub fn builder() -> SimBuilder {
        SimBuilder::new()
    }

    /// Direct view of the address space, for inspection.
    pub fn sim_memory(&self) -> MutexGuard<'_, SimMemory> {
        self.memory.lock()
    }

    pub fn scheduler(&self) -> &SimScheduler {
        self.mem_list.scheduler()
    }

    /// Copy of the free-memory list as it stands.
    pub fn snapshot(&self) -> MemList {
        self.mem_list.with(|list| list.clone())
    }

    /// Expansion service handles not yet closed.
    pub fn open_services(&self) -> usize {
        self.open_services.load(Ordering::Acquire)
    }
}

impl Platform for SimPlatform {
    type Bus = SimBus;
    type Sched = SimScheduler;
    type Expansion = ExpansionHandle;

    fn name(&self) -> &'static str {
        "Simulated 24-bit machine"
    }

    fn soft_version(&self) -> u16 {
        self.soft_version
    }

    fn bus(&self) -> SimBus {
        SimBus {
            memory: Arc::clone(&self.memory),
        }
    }

    fn memory(&self) -> &ForbidLock<MemList, SimScheduler> {
        &self.mem_list
    }

    fn open_expansion(&self) -> Option<ExpansionHandle> {
        let devices = Arc::clone(self.devices.as_ref()?);
        self.open_services.fetch_add(1, Ordering::AcqRel);
        log::debug!("expansion service opened");
        Some(ExpansionHandle {
            devices,
            open_services: Arc::clone(&self.open_services),
        })
    }
}

/// Bus handle onto the simulated address space.
#[derive(Clone)]
pub struct SimBus {
    memory: Arc<Mutex<SimMemory>>,
}

impl MemoryBus for SimBus {
    fn read_u8(&self, addr: BusAddress) -> u8 {
        self.memory.lock().read_u8(addr)
    }

    fn write_u8(&mut self, addr: BusAddress, value: u8) {
        self.memory.lock().write_u8(addr, value)
    }

    fn clear_caches(&mut self, _addr: BusAddress, _len: u32) {
        self.memory.lock().clear_caches()
    }
}

/// Open expansion service.
pub struct ExpansionHandle {
    devices: Arc<DeviceManager>,
    open_services: Arc<AtomicUsize>,
}

impl ExpansionRegistry for ExpansionHandle {
    fn find_device(&self, manufacturer: u16, product: u8) -> Option<ConfigDev> {
        self.devices.find_device(manufacturer, product)
    }
}

impl Drop for ExpansionHandle {
    fn drop(&mut self) {
        self.open_services.fetch_sub(1, Ordering::AcqRel);
        log::debug!("expansion service closed");
    }
}

/// Builder for [`SimPlatform`].
pub struct SimBuilder {
    soft_version: u16,
    memory: SimMemory,
    mem_list: MemList,
    devices: Option<DeviceManager>,
}

impl SimBuilder {
    pub fn new() -> Self {
        Self {
            soft_version: DEFAULT_SOFT_VERSION,
            memory: SimMemory::new(),
            mem_list: MemList::new(),
            devices: Some(DeviceManager::new()),
        }
    }

    pub fn soft_version(mut self, version: u16) -> Self {
        self.soft_version = version;
        self
    }

    /// Map plain RAM that the OS does not know about.
    pub fn ram(mut self, start: BusAddress, end: BusAddress) -> Self {
        self.memory.map_ram(start, end);
        self
    }

    /// Map RAM for `region` and list it as free.
    pub fn region(mut self, region: FreeRegion) -> Self {
        self.memory.map_ram(region.lower(), region.upper());
        self.mem_list.enqueue(region);
        self
    }

    pub fn cia(mut self, start: BusAddress, end: BusAddress) -> Self {
        self.memory.map_cia(start, end);
        self
    }

    pub fn control_register(mut self, addr: BusAddress, initial: u8) -> Self {
        self.memory.map_control(addr, initial);
        self
    }

    /// Map board RAM gated by `mask` in the control register.
    pub fn gated_ram(mut self, start: BusAddress, end: BusAddress, backed: u32, mask: u8) -> Self {
        self.memory.map_gated_ram(start, end, backed, mask);
        self
    }

    /// Register a configured board.
    ///
    /// Has no effect once the expansion service has been removed.
    pub fn device(mut self, device: ConfigDev) -> Self {
        if let Some(devices) = self.devices.as_mut() {
            devices.register(device);
        }
        self
    }

    /// Build a machine whose expansion service cannot be opened.
    pub fn without_expansion(mut self) -> Self {
        self.devices = None;
        self
    }

    pub fn build(self) -> SimPlatform {
        SimPlatform {
            soft_version: self.soft_version,
            memory: Arc::new(Mutex::new(self.memory)),
            mem_list: ForbidLock::new(self.mem_list, SimScheduler::new()),
            devices: self.devices.map(Arc::new),
            open_services: Arc::new(AtomicUsize::new(0)),
        }
    }
}

impl Default for SimBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::memlist::MemAttributes;

    #[test]
    fn listed_regions_are_backed_by_ram() {
        let machine = SimPlatform::builder()
            .region(FreeRegion::new(0x20_0000, 0xA0_0000, MemAttributes::FAST, 0))
            .build();
        let mut bus = machine.bus();

        bus.write_u16(0x20_1000, 0xBEEF);
        assert_eq!(bus.read_u16(0x20_1000), 0xBEEF);
        assert_eq!(machine.snapshot().len(), 1);
    }

    #[test]
    fn expansion_handles_close_on_drop() {
        let machine = SimPlatform::builder()
            .device(ConfigDev::new(5194, 6, 0x20_0000, 0x80_0000))
            .build();

        let handle = machine.open_expansion().unwrap();
        assert_eq!(machine.open_services(), 1);
        assert!(handle.find_device(5194, 6).is_some());
        drop(handle);
        assert_eq!(machine.open_services(), 0);

        let closed = SimPlatform::builder().without_expansion().build();
        assert!(closed.open_expansion().is_none());
    }
}
