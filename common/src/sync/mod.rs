pub mod forbid_lock;
pub mod sched;
pub use forbid_lock::{ForbidLock, ForbidLockGuard};
pub use sched::Reschedule;
