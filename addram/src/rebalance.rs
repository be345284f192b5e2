//! Allocation priorities of the board's RAM and the legacy RAM.
//!
//! The allocator searches regions in list order, so the board's fast RAM
//! is moved ahead and the slower legacy RAM behind it. Regions are found
//! by base address, never by name.

use crate::board::BoardHandle;
use crate::config::Config;
use crate::error::Result;
use crate::layout::LEGACY_RAM_BASE;
use common::memlist::{MemAttributes, MemList};
use common::sync::{ForbidLock, Reschedule};
use std::sync::Arc;

/// Flags that make the legacy region look like early boot memory.
pub const LEGACY_CLEARED_ATTRIBUTES: MemAttributes = MemAttributes::DMA24.union(MemAttributes::KICK);

/// What was changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Rebalanced {
    /// New priority of the board's region, if it was requeued.
    pub board: Option<i8>,
    /// New priority of the legacy region, if it was requeued.
    pub legacy: Option<i8>,
}

/// Rename and reprioritise the board's region and demote the legacy region.
///
/// Both regions are optional. All changes are made under one guard so no
/// task sees either region missing while it is requeued. A dry run changes
/// nothing.
pub fn rebalance<S: Reschedule>(
    memory: &ForbidLock<MemList, S>,
    board: &BoardHandle,
    name: &Arc<str>,
    config: &Config,
) -> Result<Rebalanced> {
    let mut done = Rebalanced::default();
    if config.dry_run {
        return Ok(done);
    }

    let mut list = memory.lock();

    if let Some(index) = list.find_base(board.base_address()) {
        let priority = config.target_priority;
        let requeue = priority > 0;
        if let Some(region) = list.get_mut(index) {
            region.name = Some(Arc::clone(name));
            if requeue {
                region.priority = priority;
            }
        }
        if requeue {
            log::debug!("setting fast RAM priority to {priority}");
            list.requeue(index)?;
            done.board = Some(priority);
        }
    }

    if let Some(index) = list.find_base(LEGACY_RAM_BASE) {
        let priority = config.legacy_priority();
        log::debug!("setting legacy RAM priority to {priority}");
        if let Some(region) = list.get_mut(index) {
            region.priority = priority;
            region.attributes.remove(LEGACY_CLEARED_ATTRIBUTES);
        }
        list.requeue(index)?;
        done.legacy = Some(priority);
    }

    Ok(done)
}
