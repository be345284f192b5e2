//! One run of the tool, from board lookup to rebalanced list.
//!
//! Located -> Probed -> Skipped (dry run) | Added -> Rebalanced
//!
//! Every stage returns its failure; the first one ends the run. Service
//! handles and transient names are released on every path by drop.

use crate::board::{BoardHandle, locate};
use crate::config::Config;
use crate::error::{AddRamError, Result};
use crate::layout::{BOARD_NAME, CACHE_CLEAR_MIN_VERSION, MANUFACTURER_ID, PRODUCT_ID_IDE};
use crate::probe::{ProbeRange, Prober};
use crate::rebalance::{Rebalanced, rebalance};
use crate::splice::{Splice, add_region, bonus_ram_present, check_size, owned_name};
use drivers::platform::Platform;

const EXPANSION_SERVICE: &str = "expansion.library";

/// Where the run ended up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Dry run: detection only.
    Skipped,
    /// Bonus RAM is in the list.
    Spliced(Splice),
}

/// Result of a successful run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunReport {
    pub board: BoardHandle,
    /// Bytes of bonus RAM found.
    pub detected: u32,
    pub outcome: Outcome,
    pub rebalanced: Rebalanced,
}

/// Detect the board's bonus RAM and publish it.
pub fn run<P: Platform>(platform: &P, config: &Config) -> Result<RunReport> {
    if config.dry_run {
        log::info!("Doing a dry-run.");
    }
    let memory = platform.memory();

    if memory.with(|list| bonus_ram_present(list)) {
        return Err(AddRamError::AlreadyPresent);
    }

    let expansion = platform
        .open_expansion()
        .ok_or(AddRamError::ServiceUnavailable(EXPANSION_SERVICE))?;
    let board = locate(&expansion, MANUFACTURER_ID, PRODUCT_ID_IDE)?;
    let name = owned_name(BOARD_NAME)?;

    let mut enable = board.enable_scoped(platform.bus());
    if !config.dry_run {
        enable.keep();
    }

    let detected = Prober::new(platform.bus())
        .with_cache_clear(platform.soft_version() >= CACHE_CLEAR_MIN_VERSION)
        .probe(ProbeRange::bonus_ram());
    drop(enable);

    let detected = check_size(detected)?;
    log::debug!(
        "Found board at {:#08x} with bonus RAM size of {}kB",
        board.base_address(),
        detected >> 10
    );

    let outcome = if config.dry_run {
        Outcome::Skipped
    } else {
        Outcome::Spliced(add_region(memory, detected, &name, config)?)
    };
    let rebalanced = rebalance(memory, &board, &name, config)?;

    Ok(RunReport {
        board,
        detected,
        outcome,
        rebalanced,
    })
}

/// Unmap the bonus RAM window.
///
/// The list is left alone. Returns whether the bonus RAM was still listed,
/// in which case the caller has just taken away memory tasks may be using.
pub fn disable<P: Platform>(platform: &P, config: &Config) -> Result<bool> {
    let expansion = platform
        .open_expansion()
        .ok_or(AddRamError::ServiceUnavailable(EXPANSION_SERVICE))?;
    let board = locate(&expansion, MANUFACTURER_ID, PRODUCT_ID_IDE)?;

    let listed = platform.memory().with(|list| bonus_ram_present(list));
    if listed {
        log::warn!("bonus RAM is still in the free-memory list");
    }

    if config.dry_run {
        log::info!("Doing a dry-run.");
    } else {
        board.set_enabled(&mut platform.bus(), false);
        log::info!("Bonus RAM disabled.");
    }
    Ok(listed)
}
