//! Publishing detected bonus RAM in the free-memory list.

use crate::config::Config;
use crate::error::{AddRamError, Result};
use crate::layout::{BONUS_RAM_END, BONUS_RAM_MAX_SIZE, BONUS_RAM_START};
use common::memlist::{MemAttributes, MemList};
use common::sync::{ForbidLock, Reschedule};
use std::sync::Arc;

/// Attributes of a bonus region added on its own.
pub const BONUS_RAM_ATTRIBUTES: MemAttributes = MemAttributes::FAST
    .union(MemAttributes::PUBLIC)
    .union(MemAttributes::DMA24);

/// How the bonus RAM went into the list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Splice {
    /// The region at `base` was grown over the bonus window.
    Merged { base: u32 },
    /// A region of its own was added.
    Added { priority: i8 },
}

/// Whether any listed region already reaches into the bonus window.
///
/// An upper bound inside `(start, end]` is what both an earlier add and an
/// earlier merge into the region below the window leave behind.
pub fn bonus_ram_present(list: &MemList) -> bool {
    list.iter()
        .any(|region| region.upper() > BONUS_RAM_START && region.upper() <= BONUS_RAM_END)
}

/// Copy `name` into storage the list can own.
///
/// Acquired once per run; every region the run labels shares it.
pub fn owned_name(name: &str) -> Result<Arc<str>> {
    let mut owned = String::new();
    owned
        .try_reserve_exact(name.len())
        .map_err(|_| AddRamError::AllocationFailure)?;
    owned.push_str(name);
    Ok(Arc::from(owned))
}

/// Reject a detected size the bonus window cannot hold.
pub fn check_size(detected: u32) -> Result<u32> {
    if detected > BONUS_RAM_MAX_SIZE {
        return Err(AddRamError::SizeOutOfBounds {
            detected,
            max: BONUS_RAM_MAX_SIZE,
        });
    }
    if detected == 0 {
        return Err(AddRamError::NoMemoryDetected);
    }
    Ok(detected)
}

/// Put `detected` bytes of bonus RAM into the free-memory list.
///
/// The list is only touched with rescheduling disabled. Nothing is changed
/// when the bonus window is already accounted for.
pub fn add_region<S: Reschedule>(
    memory: &ForbidLock<MemList, S>,
    detected: u32,
    name: &Arc<str>,
    config: &Config,
) -> Result<Splice> {
    let detected = check_size(detected)?;
    let upper = BONUS_RAM_START + detected;

    let mut list = memory.lock();

    if bonus_ram_present(&list) {
        return Err(AddRamError::AlreadyPresent);
    }
    if let Some(region) = list.overlapping(BONUS_RAM_START, upper) {
        return Err(AddRamError::RegionOverlap {
            lower: region.lower(),
            upper: region.upper(),
        });
    }

    if config.merge_with_adjacent {
        if let Some(index) = list.position(|region| region.upper() == BONUS_RAM_START) {
            let base = list.get(index).map_or(0, |region| region.base());
            log::debug!("merging bonus RAM into region at {base:#08x}");

            if let Some(region) = list.get_mut(index) {
                region.set_upper(upper);
            }
            list.deallocate(index, BONUS_RAM_START, detected)?;
            return Ok(Splice::Merged { base });
        }
        log::debug!("no region ends at {BONUS_RAM_START:#08x}, adding bonus RAM on its own");
    }

    let priority = config.bonus_priority();
    list.add_mem_list(
        detected,
        BONUS_RAM_ATTRIBUTES,
        priority,
        BONUS_RAM_START,
        Some(Arc::clone(name)),
    )?;
    log::debug!("added bonus RAM {BONUS_RAM_START:#08x}-{upper:#08x} at priority {priority}");
    Ok(Splice::Added { priority })
}
