//! Two-level square-wave state stepped by the timer interrupt.

use core::sync::atomic::{AtomicBool, AtomicU16, Ordering};

use crate::constants::DAC_MAX;

/// Output level toggle plus magnitude.
///
/// `level` is flipped by the timer handler on every tick. `amplitude` is set
/// at bring-up and may be changed from process context; the handler picks up
/// the new value on its next tick.
pub struct SquareWave {
    level: AtomicBool,
    amplitude: AtomicU16,
}

impl SquareWave {
    pub const fn new(amplitude: u16) -> Self {
        SquareWave {
            level: AtomicBool::new(false),
            amplitude: AtomicU16::new(clamp(amplitude)),
        }
    }

    /// Restart from the low half-period with the given amplitude.
    pub fn reset(&self, amplitude: u16) {
        self.set_amplitude(amplitude);
        self.level.store(false, Ordering::Release);
    }

    /// Produce the sample for this tick and flip the level.
    ///
    /// Returns `0` or the amplitude, alternating, starting with `0`.
    #[inline]
    pub fn tick(&self) -> u16 {
        // One read-modify-write: the old level is this tick's output.
        let high = self.level.fetch_xor(true, Ordering::AcqRel);
        if high {
            self.amplitude.load(Ordering::Acquire)
        } else {
            0
        }
    }

    /// Set the magnitude, clamped to the 12-bit DAC range.
    pub fn set_amplitude(&self, amplitude: u16) {
        self.amplitude.store(clamp(amplitude), Ordering::Release);
    }

    pub fn amplitude(&self) -> u16 {
        self.amplitude.load(Ordering::Acquire)
    }

    /// Level the next tick will output.
    pub fn level(&self) -> bool {
        self.level.load(Ordering::Acquire)
    }
}

const fn clamp(amplitude: u16) -> u16 {
    if amplitude > DAC_MAX {
        DAC_MAX
    } else {
        amplitude
    }
}
