use core::fmt::Debug;

/// Task-switch masking interface.
///
/// On a cooperatively scheduled system other tasks only run when the
/// current task yields, blocks, or re-enables rescheduling. Disabling
/// rescheduling is the coarse critical section every reader of shared
/// system lists relies on.
///
/// Implemented by the platform layer.
pub trait Reschedule {
    /// Saved scheduling state.
    type State: Copy + Debug;

    /// Disable rescheduling and return the previous state.
    fn forbid(&self) -> Self::State;

    /// Restore rescheduling to a previous state.
    fn permit(&self, state: Self::State);

    /// Whether rescheduling is currently disabled.
    fn is_forbidden(&self) -> bool;
}

impl<R: Reschedule + ?Sized> Reschedule for &R {
    type State = R::State;

    #[inline]
    fn forbid(&self) -> Self::State {
        (**self).forbid()
    }

    #[inline]
    fn permit(&self, state: Self::State) {
        (**self).permit(state)
    }

    #[inline]
    fn is_forbidden(&self) -> bool {
        (**self).is_forbidden()
    }
}
