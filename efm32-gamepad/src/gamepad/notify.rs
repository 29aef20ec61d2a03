//! Asynchronous wakeups to the gamepad owner.
//!
//! The GPIO handler posts a [`Signal`] to the owner through a [`Notifier`]
//! after latching a new sample. Posting is fire-and-forget: nothing is
//! queued, and several posts before the owner wakes up collapse into one.

use core::sync::atomic::{AtomicBool, AtomicU32, AtomicU8, Ordering};

use super::owner::OwnerId;

/// Signal number posted to the owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Signal(pub u8);

impl Signal {
    /// SIGIO: "input is available".
    pub const IO: Signal = Signal(29);
}

/// Delivers signals to client processes. Called from interrupt context, so
/// implementations must not block.
pub trait Notifier: Sync {
    fn notify(&self, owner: OwnerId, signal: Signal);
}

/// Single-slot, coalescing wake flag for one client.
///
/// [`notify`](Notifier::notify) raises the flag; [`take`](Self::take)
/// consumes it. Posts that arrive while the flag is already raised are
/// coalesced, so [`delivered`](Self::delivered) never exceeds
/// [`posted`](Self::posted).
pub struct PendingSignal {
    pending: AtomicBool,
    target: AtomicU32,
    signal: AtomicU8,
    posted: AtomicU32,
    delivered: AtomicU32,
}

impl PendingSignal {
    pub const fn new() -> Self {
        PendingSignal {
            pending: AtomicBool::new(false),
            target: AtomicU32::new(0),
            signal: AtomicU8::new(0),
            posted: AtomicU32::new(0),
            delivered: AtomicU32::new(0),
        }
    }

    /// Consume a pending wakeup addressed to `owner`.
    pub fn take(&self, owner: OwnerId) -> bool {
        if self.target.load(Ordering::Acquire) != owner.pid() {
            return false;
        }
        self.pending.swap(false, Ordering::AcqRel)
    }

    /// Whether a wakeup is waiting to be consumed.
    pub fn is_pending(&self) -> bool {
        self.pending.load(Ordering::Acquire)
    }

    /// Signal carried by the most recent post, if any. The null signal (0)
    /// reads back as `None`.
    pub fn last_signal(&self) -> Option<Signal> {
        match self.signal.load(Ordering::Acquire) {
            0 => None,
            n => Some(Signal(n)),
        }
    }

    /// Total `notify` calls.
    pub fn posted(&self) -> u32 {
        self.posted.load(Ordering::Relaxed)
    }

    /// Wakeups actually raised (posts minus coalesced ones).
    pub fn delivered(&self) -> u32 {
        self.delivered.load(Ordering::Relaxed)
    }

    /// Last process a wakeup was addressed to.
    pub fn target(&self) -> Option<OwnerId> {
        OwnerId::new(self.target.load(Ordering::Acquire))
    }
}

impl Default for PendingSignal {
    fn default() -> Self {
        Self::new()
    }
}

impl Notifier for PendingSignal {
    fn notify(&self, owner: OwnerId, signal: Signal) {
        self.posted.fetch_add(1, Ordering::Relaxed);
        self.signal.store(signal.0, Ordering::Release);
        self.target.store(owner.pid(), Ordering::Release);
        if !self.pending.swap(true, Ordering::AcqRel) {
            self.delivered.fetch_add(1, Ordering::Relaxed);
        }
    }
}
