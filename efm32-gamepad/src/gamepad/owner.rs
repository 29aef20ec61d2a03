//! Single-owner arbitration for the gamepad channel.
//!
//! The owner is kept in one atomic word (0 = unowned) instead of behind a
//! lock, because the GPIO interrupt handler reads it to target notifications.
//! A lock taken from both process and interrupt context can deadlock when
//! the interrupt lands on the CPU that already holds it; an atomic load
//! cannot.
//!
//! | Operation | Context | Primitive |
//! |-----------|---------|-----------|
//! | [`open`](OwnerCell::open) | process | compare-and-swap 0 → id |
//! | [`close`](OwnerCell::close) | process | store 0 |
//! | [`current`](OwnerCell::current) | interrupt | load |

use core::num::NonZeroU32;
use core::sync::atomic::{AtomicU32, Ordering};

use crate::error::Error;

/// Identity of a client process (its pid).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OwnerId(NonZeroU32);

impl OwnerId {
    /// `None` for pid 0, which never names a client.
    pub const fn new(pid: u32) -> Option<Self> {
        match NonZeroU32::new(pid) {
            Some(pid) => Some(OwnerId(pid)),
            None => None,
        }
    }

    pub const fn pid(self) -> u32 {
        self.0.get()
    }
}

/// The process currently holding the gamepad channel open, if any.
pub struct OwnerCell {
    pid: AtomicU32,
}

impl OwnerCell {
    const UNOWNED: u32 = 0;

    pub const fn new() -> Self {
        OwnerCell {
            pid: AtomicU32::new(Self::UNOWNED),
        }
    }

    /// Claim the channel for `requester`.
    ///
    /// Fails with [`Error::Busy`] and leaves the owner unchanged if any
    /// process, including `requester` itself, already holds it.
    pub fn open(&self, requester: OwnerId) -> Result<(), Error> {
        self.pid
            .compare_exchange(
                Self::UNOWNED,
                requester.pid(),
                Ordering::AcqRel,
                Ordering::Acquire,
            )
            .map(|_| ())
            .map_err(|_| Error::Busy)
    }

    /// Release the channel.
    ///
    /// Unconditional: the caller is not checked against the current owner.
    pub fn close(&self, _requester: OwnerId) {
        self.pid.store(Self::UNOWNED, Ordering::Release);
    }

    /// Snapshot of the current owner. Safe from interrupt context.
    #[inline]
    pub fn current(&self) -> Option<OwnerId> {
        OwnerId::new(self.pid.load(Ordering::Acquire))
    }
}

impl Default for OwnerCell {
    fn default() -> Self {
        Self::new()
    }
}
