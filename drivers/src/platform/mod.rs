//! Platform Abstraction Layer
//!
//! This module provides a platform-agnostic interface to the services a
//! memory tool needs from the machine and the OS running on it. Each
//! platform implements the Platform trait.
//!
//! # Usage
//!
//! ```rust
//! use drivers::platform::{CurrentPlatform, Platform};
//! use drivers::hal::bus::MemoryBus;
//!
//! let machine = CurrentPlatform::builder().build();
//! let bus = machine.bus();
//! let _ = bus.read_u8(0x00_0000);
//! assert!(machine.memory().with(|list| list.is_empty()));
//! ```

use crate::hal::bus::MemoryBus;
use crate::hal::expansion::ExpansionRegistry;
use common::memlist::MemList;
use common::sync::{ForbidLock, Reschedule};

/// Platform trait - implemented by each supported platform
pub trait Platform {
    /// Bus handle type. Handles are cheap and all address the same bus.
    type Bus: MemoryBus;

    /// Rescheduling bracket guarding the system lists.
    type Sched: Reschedule;

    /// Open handle on the expansion service.
    ///
    /// Dropping the handle closes the service.
    type Expansion: ExpansionRegistry;

    /// Platform name for debugging
    fn name(&self) -> &'static str;

    /// OS software revision.
    ///
    /// Later revisions run with CPU caches that must be cleared around
    /// self-checking memory accesses.
    fn soft_version(&self) -> u16;

    /// A handle on the system bus.
    fn bus(&self) -> Self::Bus;

    /// The system free-memory list.
    fn memory(&self) -> &ForbidLock<MemList, Self::Sched>;

    /// Open the expansion service.
    ///
    /// Returns `None` when the service is not available.
    fn open_expansion(&self) -> Option<Self::Expansion>;
}

// Platform selection based on Cargo features
cfg_if::cfg_if! {
    if #[cfg(feature = "sim")] {
        pub mod sim;
        pub use sim::SimPlatform as CurrentPlatform;
    } else {
        compile_error!(
            "No platform selected!\n\
            Use: cargo build --features sim"
        );
    }
}
