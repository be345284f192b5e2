use core::{
    cell::UnsafeCell,
    sync::atomic::{AtomicBool, Ordering},
};

use super::sched::Reschedule;

/// Lock for data shared with every other task of a cooperative system.
///
/// - Disables rescheduling on lock
/// - Spins until acquired
/// - Re-enables rescheduling on drop
///
/// Everything done through one guard is observed by other tasks as a
/// single step: no task can run between two mutations made under the
/// same guard.
///
/// Not fair. Not reentrant.
pub struct ForbidLock<T, S: Reschedule> {
    locked: AtomicBool,
    sched: S,
    data: UnsafeCell<T>,
}

unsafe impl<T: Send, S: Reschedule + Send> Send for ForbidLock<T, S> {}
unsafe impl<T: Send, S: Reschedule + Sync> Sync for ForbidLock<T, S> {}

impl<T, S: Reschedule> ForbidLock<T, S> {
    /// Create a new lock over `data`, bracketed by `sched`.
    pub const fn new(data: T, sched: S) -> Self {
        Self {
            locked: AtomicBool::new(false),
            sched,
            data: UnsafeCell::new(data),
        }
    }

    /// Acquire the lock with rescheduling disabled.
    pub fn lock(&self) -> ForbidLockGuard<'_, T, S> {
        // Disable rescheduling first
        let state = self.sched.forbid();

        while self
            .locked
            .compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
            .is_err()
        {
            core::hint::spin_loop();
        }

        ForbidLockGuard { lock: self, state }
    }

    /// Run `f` with exclusive access to the data.
    pub fn with<R>(&self, f: impl FnOnce(&mut T) -> R) -> R {
        let mut guard = self.lock();
        f(&mut guard)
    }

    /// The scheduler bracketing this lock.
    pub fn scheduler(&self) -> &S {
        &self.sched
    }
}

/// Guard returned by `ForbidLock::lock`.
///
/// Re-enables rescheduling on drop.
pub struct ForbidLockGuard<'a, T, S: Reschedule> {
    lock: &'a ForbidLock<T, S>,
    state: S::State,
}

impl<T, S: Reschedule> core::ops::Deref for ForbidLockGuard<'_, T, S> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        // SAFETY: The lock is held, so we have exclusive access
        unsafe { &*self.lock.data.get() }
    }
}

impl<T, S: Reschedule> core::ops::DerefMut for ForbidLockGuard<'_, T, S> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        // SAFETY: The lock is held, so we have exclusive access
        unsafe { &mut *self.lock.data.get() }
    }
}

impl<T, S: Reschedule> Drop for ForbidLockGuard<'_, T, S> {
    fn drop(&mut self) {
        // Release lock first
        self.lock.locked.store(false, Ordering::Release);

        self.lock.sched.permit(self.state);
    }
}
