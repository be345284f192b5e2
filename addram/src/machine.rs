//! Simulated machine fitted with the board.
//!
//! Chip RAM at the bottom, the board's fast RAM at its base address, CIA
//! mirrors over the bonus window with the board's gated RAM on top, and
//! legacy RAM at its fixed base.

use crate::layout::{
    BONUS_RAM_ENABLE, BONUS_RAM_END, BONUS_RAM_START, CONTROL_REGISTER_OFFSET, LEGACY_RAM_BASE,
    MANUFACTURER_ID, PRODUCT_ID_IDE,
};
use common::memlist::{FreeRegion, MemAttributes};
use drivers::hal::expansion::ConfigDev;
use drivers::platform::sim::SimPlatform;

/// Base address the board configures at.
pub const BOARD_BASE: u32 = 0x20_0000;
/// Fast RAM carried by the board, right up to the bonus window.
pub const BOARD_SIZE: u32 = BONUS_RAM_START - BOARD_BASE;
/// Fast RAM end when the board is fitted with less than a full bank.
pub const SHORT_BOARD_END: u32 = 0x60_0000;
pub const LEGACY_RAM_END: u32 = 0xC8_0000;
pub const CHIP_RAM_END: u32 = 0x8_0000;

/// What the simulated machine is fitted with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MachineOptions {
    /// Bonus RAM populated from the start of the window.
    pub bonus_backed: u32,
    /// The board shows up in the expansion registry.
    pub board_present: bool,
    /// The board's fast RAM ends where the bonus window begins.
    pub adjacent_fast: bool,
    /// Legacy RAM is fitted and listed.
    pub legacy_ram: bool,
    /// The expansion service can be opened.
    pub expansion_service: bool,
    pub soft_version: u16,
}

impl Default for MachineOptions {
    fn default() -> Self {
        Self {
            bonus_backed: BONUS_RAM_END - BONUS_RAM_START,
            board_present: true,
            adjacent_fast: true,
            legacy_ram: true,
            expansion_service: true,
            soft_version: drivers::platform::sim::DEFAULT_SOFT_VERSION,
        }
    }
}

pub fn chip_region() -> FreeRegion {
    FreeRegion::new(
        0x1000,
        CHIP_RAM_END,
        MemAttributes::CHIP | MemAttributes::PUBLIC | MemAttributes::DMA24 | MemAttributes::LOCAL,
        -10,
    )
    .with_name("chip memory")
}

pub fn board_region(adjacent: bool) -> FreeRegion {
    let upper = if adjacent {
        BONUS_RAM_START
    } else {
        SHORT_BOARD_END
    };
    FreeRegion::new(
        BOARD_BASE,
        upper,
        MemAttributes::FAST | MemAttributes::PUBLIC | MemAttributes::DMA24,
        0,
    )
    .with_name("expansion memory")
}

pub fn legacy_region() -> FreeRegion {
    FreeRegion::new(
        LEGACY_RAM_BASE,
        LEGACY_RAM_END,
        MemAttributes::FAST
            | MemAttributes::PUBLIC
            | MemAttributes::DMA24
            | MemAttributes::KICK
            | MemAttributes::LOCAL,
        -5,
    )
    .with_name("expansion memory")
}

/// Build the machine.
pub fn classic(options: MachineOptions) -> SimPlatform {
    let mut builder = SimPlatform::builder()
        .soft_version(options.soft_version)
        .region(chip_region())
        .region(board_region(options.adjacent_fast));
    if options.legacy_ram {
        builder = builder.region(legacy_region());
    }
    builder = builder
        .cia(BONUS_RAM_START, LEGACY_RAM_BASE)
        .gated_ram(
            BONUS_RAM_START,
            BONUS_RAM_END,
            options.bonus_backed,
            BONUS_RAM_ENABLE.bits(),
        )
        .control_register(BOARD_BASE + CONTROL_REGISTER_OFFSET, 0);
    if options.board_present {
        builder = builder.device(ConfigDev::new(
            MANUFACTURER_ID,
            PRODUCT_ID_IDE,
            BOARD_BASE,
            BOARD_SIZE,
        ));
    }
    if !options.expansion_service {
        builder = builder.without_expansion();
    }
    builder.build()
}
