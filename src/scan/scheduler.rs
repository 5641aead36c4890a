//! Tick scheduling for the cooperative scan loop.
//!
//! The host calls back once per display refresh. Each scheduled callback is
//! identified by a [`TickToken`]; cancelling bumps the scheduler epoch so
//! every outstanding token, including one whose decode is still in flight,
//! stops being live at once.

use std::cell::Cell;

/// Identifies one scheduled tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickToken {
    id: u64,
    epoch: u64,
}

impl TickToken {
    /// Monotonic id of the tick
    pub fn id(&self) -> u64 {
        self.id
    }
}

/// Per-refresh callback scheduler
pub trait TickScheduler {
    /// Request one callback on the next refresh
    fn schedule(&self) -> TickToken;

    /// Invalidate every outstanding token
    fn cancel_all(&self);

    /// Whether `token` has not been cancelled
    fn is_live(&self, token: TickToken) -> bool;
}

/// Single-threaded scheduler holding at most one pending tick.
///
/// The host pulls the due token with [`FrameTicker::take_due`] on each
/// refresh and passes it to the scan loop.
#[derive(Debug, Default)]
pub struct FrameTicker {
    next_id: Cell<u64>,
    epoch: Cell<u64>,
    pending: Cell<Option<TickToken>>,
}

impl FrameTicker {
    /// Create a scheduler with nothing pending
    pub fn new() -> Self {
        Self::default()
    }

    /// Take the pending tick, if any
    pub fn take_due(&self) -> Option<TickToken> {
        self.pending.take()
    }

    /// Whether a tick is waiting to fire
    pub fn has_pending(&self) -> bool {
        self.pending.get().is_some()
    }
}

impl TickScheduler for FrameTicker {
    fn schedule(&self) -> TickToken {
        let id = self.next_id.get() + 1;
        self.next_id.set(id);
        let token = TickToken {
            id,
            epoch: self.epoch.get(),
        };
        self.pending.set(Some(token));
        token
    }

    fn cancel_all(&self) {
        self.epoch.set(self.epoch.get() + 1);
        self.pending.set(None);
    }

    fn is_live(&self, token: TickToken) -> bool {
        token.epoch == self.epoch.get()
    }
}
