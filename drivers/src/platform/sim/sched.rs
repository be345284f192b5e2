use common::sync::Reschedule;
use core::sync::atomic::{AtomicI32, AtomicU32, Ordering};

/// Task-disable nest count.
///
/// Follows the system convention: `-1` means rescheduling is enabled and
/// every forbid adds one level.
#[derive(Debug)]
pub struct SimScheduler {
    nest: AtomicI32,
    entries: AtomicU32,
}

impl SimScheduler {
    pub const fn new() -> Self {
        Self {
            nest: AtomicI32::new(-1),
            entries: AtomicU32::new(0),
        }
    }

    /// Current nest count.
    pub fn nest(&self) -> i32 {
        self.nest.load(Ordering::Acquire)
    }

    /// How many critical sections have been entered so far.
    pub fn entries(&self) -> u32 {
        self.entries.load(Ordering::Acquire)
    }
}

impl Default for SimScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl Reschedule for SimScheduler {
    type State = ();

    fn forbid(&self) {
        self.entries.fetch_add(1, Ordering::AcqRel);
        self.nest.fetch_add(1, Ordering::AcqRel);
    }

    fn permit(&self, _: ()) {
        let previous = self.nest.fetch_sub(1, Ordering::AcqRel);
        debug_assert!(previous >= 0, "permit without forbid");
    }

    fn is_forbidden(&self) -> bool {
        self.nest() >= 0
    }
}
