//! Simulated address space.
//!
//! The address space is a stack of mappings; a later mapping shadows
//! earlier ones where they overlap. Unmapped addresses float high.

use crate::hal::bus::BusAddress;
use alloc::collections::BTreeMap;
use alloc::vec::Vec;

/// Value read back from an undriven bus.
pub const OPEN_BUS: u8 = 0xFF;

/// CIA register select lines, one register per 256 bytes.
const CIA_REG_SHIFT: u32 = 8;
const CIA_REG_MASK: u32 = 0xF;

/// The one CIA register with no function; touching it is harmless.
const CIA_UNUSED_REG: u32 = 0xB;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Decode {
    /// Plain RAM.
    Ram,
    /// RAM that only answers while `mask` is set in the control register,
    /// and only below `backed_end`. Otherwise the mapping underneath decodes.
    Gated { mask: u8, backed_end: BusAddress },
    /// Board control register byte.
    Control,
    /// CIA chip select: registers mirrored through the whole window.
    Cia,
}

#[derive(Debug, Clone, Copy)]
struct Mapping {
    start: BusAddress,
    end: BusAddress,
    decode: Decode,
}

impl Mapping {
    fn contains(&self, addr: BusAddress) -> bool {
        self.start <= addr && addr < self.end
    }
}

/// Simulated memory and registers.
#[derive(Debug, Default)]
pub struct SimMemory {
    mappings: Vec<Mapping>,
    cells: BTreeMap<BusAddress, u8>,
    control: u8,
    side_effects: u32,
    cache_clears: u32,
}

impl SimMemory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Map RAM over `[start, end)`.
    pub fn map_ram(&mut self, start: BusAddress, end: BusAddress) {
        self.push(start, end, Decode::Ram);
    }

    /// Map CIA register mirrors over `[start, end)`.
    pub fn map_cia(&mut self, start: BusAddress, end: BusAddress) {
        self.push(start, end, Decode::Cia);
    }

    /// Map the control register byte at `addr`.
    pub fn map_control(&mut self, addr: BusAddress, initial: u8) {
        self.control = initial;
        self.push(addr, addr + 1, Decode::Control);
    }

    /// Map RAM over `[start, end)` that is gated by `mask` in the control
    /// register, with only the first `backed` bytes populated.
    pub fn map_gated_ram(&mut self, start: BusAddress, end: BusAddress, backed: u32, mask: u8) {
        let backed_end = start.saturating_add(backed).min(end);
        self.push(start, end, Decode::Gated { mask, backed_end });
    }

    fn push(&mut self, start: BusAddress, end: BusAddress, decode: Decode) {
        self.mappings.push(Mapping { start, end, decode });
    }

    fn decode(&self, addr: BusAddress) -> Option<Decode> {
        self.mappings
            .iter()
            .rev()
            .filter(|m| m.contains(addr))
            .map(|m| m.decode)
            .find(|decode| match *decode {
                Decode::Gated { mask, backed_end } => self.control & mask != 0 && addr < backed_end,
                _ => true,
            })
    }

    fn touch_cia(&mut self, addr: BusAddress) {
        if (addr >> CIA_REG_SHIFT) & CIA_REG_MASK != CIA_UNUSED_REG {
            self.side_effects += 1;
        }
    }

    pub fn read_u8(&mut self, addr: BusAddress) -> u8 {
        match self.decode(addr) {
            Some(Decode::Ram | Decode::Gated { .. }) => self.peek(addr),
            Some(Decode::Control) => self.control,
            Some(Decode::Cia) => {
                self.touch_cia(addr);
                OPEN_BUS
            }
            None => OPEN_BUS,
        }
    }

    pub fn write_u8(&mut self, addr: BusAddress, value: u8) {
        match self.decode(addr) {
            Some(Decode::Ram | Decode::Gated { .. }) => {
                self.cells.insert(addr, value);
            }
            Some(Decode::Control) => self.control = value,
            Some(Decode::Cia) => self.touch_cia(addr),
            None => {}
        }
    }

    /// Stored cell contents, bypassing decode.
    ///
    /// Cells never written read as zero.
    pub fn peek(&self, addr: BusAddress) -> u8 {
        self.cells.get(&addr).copied().unwrap_or(0)
    }

    /// Store into a cell, bypassing decode.
    pub fn poke(&mut self, addr: BusAddress, value: u8) {
        self.cells.insert(addr, value);
    }

    pub fn control(&self) -> u8 {
        self.control
    }

    /// Accesses that hit a CIA register with a function.
    pub fn side_effects(&self) -> u32 {
        self.side_effects
    }

    pub fn clear_caches(&mut self) {
        self.cache_clears += 1;
    }

    pub fn cache_clears(&self) -> u32 {
        self.cache_clears
    }
}
