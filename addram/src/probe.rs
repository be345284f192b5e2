//! Bonus RAM detection.
//!
//! Walks the window one stride at a time and checks that a single word per
//! stride holds a written value. The word is put back before moving on,
//! so RAM that already holds data from an earlier enable keeps it.
//!
//! Detection stops at the first stride that fails: RAM is assumed to be
//! populated contiguously from the start of the window.

use crate::layout::{BONUS_RAM_END, BONUS_RAM_START, PROBE_OFFSET, PROBE_STEP};
use drivers::hal::bus::{BusAddress, MemoryBus};

/// Half-open address range to probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProbeRange {
    pub start: BusAddress,
    pub end: BusAddress,
}

impl ProbeRange {
    pub const fn new(start: BusAddress, end: BusAddress) -> Self {
        Self { start, end }
    }

    /// The whole bonus RAM window.
    pub const fn bonus_ram() -> Self {
        Self::new(BONUS_RAM_START, BONUS_RAM_END)
    }
}

/// Value written into the probe word of the stride at `stride`.
///
/// Differs for every stride of the window and never reads back from an
/// undriven bus.
#[inline]
pub const fn test_pattern(stride: BusAddress) -> u16 {
    (stride >> 8) as u16
}

/// Probe word borrowed from memory.
///
/// Holds the original value and writes it back when dropped, whether the
/// check passed or not.
struct SavedWord<'a, B: MemoryBus> {
    bus: &'a mut B,
    addr: BusAddress,
    saved: u16,
}

impl<'a, B: MemoryBus> SavedWord<'a, B> {
    fn acquire(bus: &'a mut B, addr: BusAddress) -> Self {
        let saved = bus.read_u16(addr);
        Self { bus, addr, saved }
    }

    /// Write `pattern` and check it reads back.
    fn holds(&mut self, pattern: u16, clear_caches: bool) -> bool {
        self.bus.write_u16(self.addr, pattern);
        if clear_caches {
            self.bus.clear_caches(self.addr, 2);
        }
        self.bus.read_u16(self.addr) == pattern
    }
}

impl<B: MemoryBus> Drop for SavedWord<'_, B> {
    fn drop(&mut self) {
        self.bus.write_u16(self.addr, self.saved);
    }
}

/// Destructive but reversible RAM sizer.
pub struct Prober<B: MemoryBus> {
    bus: B,
    step: u32,
    offset: u32,
    clear_caches: bool,
}

impl<B: MemoryBus> Prober<B> {
    pub fn new(bus: B) -> Self {
        Self {
            bus,
            step: PROBE_STEP,
            offset: PROBE_OFFSET,
            clear_caches: false,
        }
    }

    /// Clear caches between writing and reading back each probe word.
    pub fn with_cache_clear(mut self, on: bool) -> Self {
        self.clear_caches = on;
        self
    }

    /// Bytes of working RAM from the start of `range`.
    ///
    /// Never more than the range holds; `0` when the first stride fails.
    /// A trailing partial stride counts only up to `range.end`, and is not
    /// tested at all when its probe word would lie past the end.
    pub fn probe(&mut self, range: ProbeRange) -> u32 {
        let mut detected: u32 = 0;
        let mut stride = range.start;

        while stride < range.end {
            let span = self.step.min(range.end - stride);
            if span < self.offset.saturating_add(2) {
                break;
            }
            log::debug!("testing address {stride:#08x}");

            let held = {
                let mut word = SavedWord::acquire(&mut self.bus, stride.wrapping_add(self.offset));
                word.holds(test_pattern(stride), self.clear_caches)
            };
            if !held {
                log::debug!("no RAM at {stride:#08x}");
                break;
            }
            detected = match detected.checked_add(span) {
                Some(total) => total,
                None => break,
            };

            stride = match stride.checked_add(self.step) {
                Some(next) => next,
                None => break,
            };
        }

        log::debug!(
            "probed {:#08x}-{:#08x}: {} KiB",
            range.start,
            range.end,
            detected >> 10
        );
        detected
    }

    pub fn into_bus(self) -> B {
        self.bus
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::BONUS_RAM_ENABLE;
    use drivers::platform::sim::{OPEN_BUS, SimPlatform};
    use drivers::platform::Platform;

    const CONTROL: BusAddress = 0x20_8000;

    fn window(backed: u32) -> SimPlatform {
        SimPlatform::builder()
            .cia(0xA0_0000, 0xC0_0000)
            .gated_ram(BONUS_RAM_START, BONUS_RAM_END, backed, BONUS_RAM_ENABLE.bits())
            .control_register(CONTROL, BONUS_RAM_ENABLE.bits())
            .build()
    }

    #[test]
    fn full_window_is_detected() {
        let machine = window(BONUS_RAM_END - BONUS_RAM_START);
        let detected = Prober::new(machine.bus()).probe(ProbeRange::bonus_ram());
        assert_eq!(detected, 0x1F_0000);
    }

    #[test]
    fn unmapped_window_detects_nothing_and_leaves_cia_alone() {
        let machine = window(0x20_0000);
        machine.bus().write_u8(CONTROL, 0);

        let detected = Prober::new(machine.bus()).probe(ProbeRange::bonus_ram());
        assert_eq!(detected, 0);
        assert_eq!(machine.sim_memory().side_effects(), 0);
    }

    #[test]
    fn probe_restores_backed_and_first_unbacked_stride() {
        let machine = window(0x3_0000);
        {
            let mut mem = machine.sim_memory();
            for i in 0..3u32 {
                let cell = BONUS_RAM_START + i * PROBE_STEP + PROBE_OFFSET;
                mem.poke(cell, 0x5A);
                mem.poke(cell + 1, i as u8);
            }
        }

        let mut prober = Prober::new(machine.bus());
        assert_eq!(prober.probe(ProbeRange::bonus_ram()), 0x3_0000);

        let bus = prober.into_bus();
        for i in 0..3u32 {
            let cell = BONUS_RAM_START + i * PROBE_STEP + PROBE_OFFSET;
            assert_eq!(bus.read_u16(cell), 0x5A00 | i as u16);
        }
        let unbacked = BONUS_RAM_START + 3 * PROBE_STEP + PROBE_OFFSET;
        assert_eq!(bus.read_u8(unbacked), OPEN_BUS);
    }

    #[test]
    fn cache_clear_is_issued_per_stride_when_requested() {
        let machine = window(0x2_0000);

        Prober::new(machine.bus()).probe(ProbeRange::bonus_ram());
        assert_eq!(machine.sim_memory().cache_clears(), 0);

        Prober::new(machine.bus())
            .with_cache_clear(true)
            .probe(ProbeRange::bonus_ram());
        // Two backed strides plus the failing one.
        assert_eq!(machine.sim_memory().cache_clears(), 3);
    }

    #[test]
    fn range_at_top_of_address_space_terminates() {
        let machine = SimPlatform::builder().ram(0xFFFF_0000, u32::MAX).build();
        let detected = Prober::new(machine.bus()).probe(ProbeRange::new(0xFFFF_0000, u32::MAX));
        assert_eq!(detected, PROBE_STEP - 1);
    }

    #[test]
    fn whole_address_space_is_counted_without_overflow() {
        let machine = SimPlatform::builder().ram(0, u32::MAX).build();
        let detected = Prober::new(machine.bus()).probe(ProbeRange::new(0, u32::MAX));
        assert_eq!(detected, u32::MAX);
    }

    #[test]
    fn partial_last_stride_counts_only_bytes_in_range() {
        let machine = window(BONUS_RAM_END - BONUS_RAM_START);
        let range = ProbeRange::new(BONUS_RAM_START, BONUS_RAM_START + 0x1_0C00);
        assert_eq!(Prober::new(machine.bus()).probe(range), 0x1_0C00);

        // Too short to hold the probe word: left untested and uncounted.
        let range = ProbeRange::new(BONUS_RAM_START, BONUS_RAM_START + 0x1_0800);
        assert_eq!(Prober::new(machine.bus()).probe(range), PROBE_STEP);
    }
}
