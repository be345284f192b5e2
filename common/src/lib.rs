//! Shared OS-side structures.
//!
//! - [`sync`]: locks and the rescheduling bracket
//! - [`memlist`]: the system free-memory list and its allocator primitives

#![no_std]

extern crate alloc;

#[cfg(test)]
extern crate std;

pub mod memlist;
pub mod sync;
