//! Hardware Driver Subsystem
//!
//! This module provides a layered architecture for hardware abstraction:
//!
//! # Module Organization
//!
//! - [`hal`]: Platform-independent trait definitions
//! - [`platform`]: Whole-machine services (bus, memory list, expansion)
//! - [`device_manager`]: The expansion device table
//!
//! # Usage Example
//!
//! ```
//! use drivers::hal::bus::MemoryBus;
//! use drivers::platform::{CurrentPlatform, Platform};
//!
//! let machine = CurrentPlatform::builder()
//!     .control_register(0x20_8000, 0)
//!     .build();
//! let mut bus = machine.bus();
//! let control = bus.read_u8(0x20_8000);
//! bus.write_u8(0x20_8000, control | 0x20);
//! assert_eq!(bus.read_u8(0x20_8000), 0x20);
//! ```

#![no_std]

extern crate alloc;

#[cfg(test)]
extern crate std;

pub mod device_manager;
pub mod hal;
pub mod platform;

// Re-export commonly used types
pub use hal::bus::MemoryBus;
pub use hal::expansion::{ConfigDev, ExpansionRegistry};
pub use platform::Platform;
