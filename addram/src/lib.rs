//! Bonus RAM support for the IDE board.
//!
//! The board can map RAM into a window the chipset normally leaves to CIA
//! mirrors. This crate finds the board, sizes that RAM and adds it to the
//! system free-memory list while other tasks keep allocating from it.
//!
//! # Module Organization
//!
//! - [`board`]: Board lookup and the control register
//! - [`probe`]: RAM sizing
//! - [`splice`]: Adding the RAM to the free-memory list
//! - [`rebalance`]: Allocation priorities
//! - [`run`]: The whole run
//!
//! # Usage Example
//!
//! ```
//! use addram::{Config, machine};
//!
//! let machine = machine::classic(machine::MachineOptions::default());
//! let report = addram::run::run(&machine, &Config::new().target_priority(5)).unwrap();
//! assert_eq!(report.detected, 0x1F_0000);
//! ```

pub mod board;
pub mod config;
pub mod error;
pub mod layout;
pub mod logging;
#[cfg(feature = "sim")]
pub mod machine;
pub mod probe;
pub mod rebalance;
pub mod run;
pub mod splice;

pub use config::Config;
pub use error::{AddRamError, Result};
