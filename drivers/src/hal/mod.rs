//! Hardware Abstraction Layer (HAL) - Platform-Independent Traits
//!
//! These traits are implemented by each platform, so the memory tools
//! above them are written once against the machine's services.
//!
//! # Available Interfaces
//!
//! - [`bus`]: Raw byte/word access to the CPU address space
//! - [`expansion`]: Expansion device configuration registry

pub mod bus;
pub mod expansion;
