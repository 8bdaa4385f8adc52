#![forbid(unsafe_code)]

//! Fire-once, cancellable deadline on a host-driven monotonic clock.
//!
//! Measuring right after mount reads a layout that has not been painted yet,
//! so the first measurement is deferred by a settle delay. The host owns the
//! clock and passes `now` in; nothing here reads wall time.

use core::time::Duration;

/// Default wait before the first measurement after mount.
pub const DEFAULT_SETTLE_DELAY: Duration = Duration::from_millis(200);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SettleTimer {
    deadline: Option<Duration>,
}

impl SettleTimer {
    #[must_use]
    pub const fn new() -> Self {
        Self { deadline: None }
    }

    /// Arm the timer for `now + delay`, replacing any pending deadline.
    pub fn schedule(&mut self, now: Duration, delay: Duration) {
        self.deadline = Some(now.saturating_add(delay));
    }

    /// Disarm without firing.
    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    #[inline]
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    #[inline]
    #[must_use]
    pub const fn deadline(&self) -> Option<Duration> {
        self.deadline
    }

    /// Returns `true` exactly once, on the first poll at or after the deadline.
    pub fn poll(&mut self, now: Duration) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}
