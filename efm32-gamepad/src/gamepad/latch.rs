//! Most recently sampled button state.

use core::sync::atomic::{AtomicU8, Ordering};

/// Raw GPIO port C input byte, written by the GPIO interrupt handler and read
/// by the gamepad channel.
///
/// A single-byte atomic: a reader always sees a complete value, either the
/// one before a concurrent interrupt or the one after it. Later samples
/// overwrite earlier ones; no history is kept.
pub struct InputLatch {
    value: AtomicU8,
}

impl InputLatch {
    /// All buttons released (inputs are pulled up, so every bit reads high).
    pub const RELEASED: u8 = 0xFF;

    pub const fn new() -> Self {
        InputLatch {
            value: AtomicU8::new(Self::RELEASED),
        }
    }

    /// Commit a new sample. Interrupt context.
    #[inline]
    pub fn store(&self, raw: u8) {
        // Release pairs with the Acquire in `load` so a reader that sees this
        // sample also sees everything the handler did before latching it.
        self.value.store(raw, Ordering::Release);
    }

    /// Latest committed sample.
    #[inline]
    pub fn load(&self) -> u8 {
        self.value.load(Ordering::Acquire)
    }
}

impl Default for InputLatch {
    fn default() -> Self {
        Self::new()
    }
}
