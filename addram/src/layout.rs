//! Fixed addresses and sizes of the board and the machine around it.

use crate::board::ControlBits;

/// Manufacturer number the board configures with.
pub const MANUFACTURER_ID: u16 = 5194;
/// Product number of the board's IDE function, which owns the control register.
pub const PRODUCT_ID_IDE: u8 = 6;

/// Control register offset from the board's base address.
pub const CONTROL_REGISTER_OFFSET: u32 = 0x8000;

/// Bonus RAM window. The chipset normally decodes it as CIA mirrors.
pub const BONUS_RAM_START: u32 = 0xA0_0000;
pub const BONUS_RAM_END: u32 = 0xBF_0000;

/// Most bonus RAM a detection result may claim before it is distrusted.
pub const BONUS_RAM_MAX_SIZE: u32 = BONUS_RAM_END - BONUS_RAM_START;

/// Bytes covered by one probe stride.
pub const PROBE_STEP: u32 = 0x1_0000;

/// Probe cell offset within a stride.
///
/// Lands on the one CIA register with no function, so a stride that
/// decodes as CIA is left undisturbed.
pub const PROBE_OFFSET: u32 = 0xB00;

/// Base of the expansion-slot RAM that predates fast RAM boards.
pub const LEGACY_RAM_BASE: u32 = 0xC0_0000;

/// Earliest OS revision that runs with caches needing a clear.
pub const CACHE_CLEAR_MIN_VERSION: u16 = 36;

/// Name given to the regions this tool publishes.
pub const BOARD_NAME: &str = "GottaGoFast!!!";

/// Control register bit gating the bonus RAM window.
pub const BONUS_RAM_ENABLE: ControlBits = ControlBits::BONUS_RAM;
