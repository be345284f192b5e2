//! Properties of the prober over randomly populated windows.

use addram::layout::{BONUS_RAM_ENABLE, BONUS_RAM_END, BONUS_RAM_START, PROBE_OFFSET, PROBE_STEP};
use addram::probe::{ProbeRange, Prober};
use drivers::hal::bus::MemoryBus;
use drivers::platform::Platform;
use drivers::platform::sim::SimPlatform;
use proptest::prelude::*;

const STRIDES: u32 = (BONUS_RAM_END - BONUS_RAM_START) / PROBE_STEP;

fn window(backed_strides: u32) -> SimPlatform {
    SimPlatform::builder()
        .cia(BONUS_RAM_START, 0xC0_0000)
        .gated_ram(
            BONUS_RAM_START,
            BONUS_RAM_END,
            backed_strides * PROBE_STEP,
            BONUS_RAM_ENABLE.bits(),
        )
        .control_register(0x20_8000, BONUS_RAM_ENABLE.bits())
        .build()
}

fn cell(stride: u32) -> u32 {
    BONUS_RAM_START + stride * PROBE_STEP + PROBE_OFFSET
}

proptest! {
    #[test]
    fn detects_exactly_the_backed_prefix(backed in 0..=STRIDES) {
        let machine = window(backed);
        let detected = Prober::new(machine.bus()).probe(ProbeRange::bonus_ram());
        prop_assert_eq!(detected, backed * PROBE_STEP);
    }

    #[test]
    fn probed_words_read_back_unchanged(
        backed in 0..=STRIDES,
        contents in proptest::collection::vec(any::<u16>(), STRIDES as usize),
    ) {
        let machine = window(backed);
        let mut bus = machine.bus();
        for stride in 0..backed {
            bus.write_u16(cell(stride), contents[stride as usize]);
        }
        let visited = (backed + 1).min(STRIDES);
        let before: Vec<u16> = (0..visited).map(|s| bus.read_u16(cell(s))).collect();

        Prober::new(machine.bus()).probe(ProbeRange::bonus_ram());

        let after: Vec<u16> = (0..visited).map(|s| bus.read_u16(cell(s))).collect();
        prop_assert_eq!(after, before);
        prop_assert_eq!(machine.sim_memory().side_effects(), 0);
    }
}
