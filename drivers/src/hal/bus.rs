//! Memory Bus Hardware Abstraction Layer.
//!
//! Raw access to the CPU's physical address space. Every access may hit
//! a device register rather than a RAM cell, so implementations must
//! perform exactly one bus cycle per call and never cache or coalesce.

/// A 24/32-bit physical bus address.
pub type BusAddress = u32;

/// Raw memory bus.
///
/// Words are big-endian, the byte at `addr` being the most significant.
pub trait MemoryBus {
    /// Read one byte.
    fn read_u8(&self, addr: BusAddress) -> u8;

    /// Write one byte.
    fn write_u8(&mut self, addr: BusAddress, value: u8);

    /// Read one 16-bit word.
    fn read_u16(&self, addr: BusAddress) -> u16 {
        u16::from_be_bytes([self.read_u8(addr), self.read_u8(addr.wrapping_add(1))])
    }

    /// Write one 16-bit word.
    fn write_u16(&mut self, addr: BusAddress, value: u16) {
        let [hi, lo] = value.to_be_bytes();
        self.write_u8(addr, hi);
        self.write_u8(addr.wrapping_add(1), lo);
    }

    /// Push pending writes to `[addr, addr + len)` past the CPU caches.
    ///
    /// Buses without caches in the way keep the default no-op.
    fn clear_caches(&mut self, addr: BusAddress, len: u32) {
        let _ = (addr, len);
    }
}

impl<B: MemoryBus + ?Sized> MemoryBus for &mut B {
    #[inline]
    fn read_u8(&self, addr: BusAddress) -> u8 {
        (**self).read_u8(addr)
    }

    #[inline]
    fn write_u8(&mut self, addr: BusAddress, value: u8) {
        (**self).write_u8(addr, value)
    }

    #[inline]
    fn read_u16(&self, addr: BusAddress) -> u16 {
        (**self).read_u16(addr)
    }

    #[inline]
    fn write_u16(&mut self, addr: BusAddress, value: u16) {
        (**self).write_u16(addr, value)
    }

    #[inline]
    fn clear_caches(&mut self, addr: BusAddress, len: u32) {
        (**self).clear_caches(addr, len)
    }
}
