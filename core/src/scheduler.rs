//! Timer capability used by [`PlaybackDriver`](crate::playback::PlaybackDriver).
//!
//! The driver never sleeps itself. It asks a [`Scheduler`] to deliver a [`Wake`] after a
//! delay, and the host hands that wake back through
//! [`PlaybackDriver::wake`](crate::playback::PlaybackDriver::wake) once the delay elapses.
//! This keeps the driver testable against a virtual clock and usable from any event loop.

use std::time::Duration;

/// Token delivered back to the driver when a scheduled delay elapses.
///
/// `generation` counts queue installs on the driver and `step` is the progress index the
/// wake advances from. A wake that doesn't match the driver's pending one is stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Wake {
    pub generation: u64,
    pub step: usize,
}

/// Handle to a scheduled wake, used to cancel it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerHandle(pub u64);

pub trait Scheduler {
    /// Arranges for `wake` to be delivered after `delay`.
    fn schedule(&mut self, delay: Duration, wake: Wake) -> TimerHandle;

    /// Cancels a scheduled wake. Cancelling a wake that already fired is a no-op.
    fn cancel(&mut self, handle: TimerHandle);
}

impl<T: Scheduler + ?Sized> Scheduler for &mut T {
    fn schedule(&mut self, delay: Duration, wake: Wake) -> TimerHandle {
        (**self).schedule(delay, wake)
    }

    fn cancel(&mut self, handle: TimerHandle) {
        (**self).cancel(handle)
    }
}

impl<T: Scheduler + ?Sized> Scheduler for Box<T> {
    fn schedule(&mut self, delay: Duration, wake: Wake) -> TimerHandle {
        (**self).schedule(delay, wake)
    }

    fn cancel(&mut self, handle: TimerHandle) {
        (**self).cancel(handle)
    }
}
