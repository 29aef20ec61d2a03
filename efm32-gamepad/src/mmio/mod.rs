//! Typed access to memory-mapped peripheral registers.
//!
//! Every peripheral driver in this crate talks to hardware through the
//! [`Registers`] trait. On target the implementation is [`RegisterWindow`],
//! a bounds-checked view over a mapped physical range with volatile
//! accessors. Tests substitute fake windows that record every access.
//!
//! Offsets are peripheral-relative byte offsets taken from the layout
//! tables in [`registers`].

pub mod registers;

use core::ptr::NonNull;

use crate::error::Error;

/// A physical register range described by the platform (base + length).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemResource {
    pub start: usize,
    pub len: usize,
}

impl MemResource {
    pub const fn new(start: usize, len: usize) -> Self {
        MemResource { start, len }
    }
}

/// 32-bit register read/write primitive. No policy.
///
/// Accessing an offset outside the window is a programming error and
/// panics; it is not reported through `Result`.
pub trait Registers: Sync {
    /// Read the register at `offset`.
    fn read32(&self, offset: usize) -> u32;

    /// Write `value` to the register at `offset`.
    fn write32(&self, offset: usize, value: u32);

    /// Read-modify-write: `new = (current & !clear) | set`.
    fn modify32(&self, offset: usize, clear: u32, set: u32) {
        let current = self.read32(offset);
        self.write32(offset, (current & !clear) | set);
    }
}

/// Volatile view over a mapped register block.
///
/// Constructed once from a validated base address and size. Not `Clone`:
/// the window is owned by whoever mapped it and handed back to the platform
/// exactly once on release.
#[derive(Debug)]
pub struct RegisterWindow {
    base: NonNull<u32>,
    size: usize,
}

// SAFETY: The window points at device memory. Every access is a single
// volatile 32-bit load or store, which the bus performs atomically, so
// sharing the window between interrupt and process context is sound.
unsafe impl Send for RegisterWindow {}
unsafe impl Sync for RegisterWindow {}

impl RegisterWindow {
    /// Create a window over `size` bytes of device memory at `base`.
    ///
    /// Returns [`Error::InvalidWindow`] if `base` is null or not 4-byte
    /// aligned, or if `size` is zero or not a multiple of 4.
    ///
    /// # Safety
    ///
    /// `base..base + size` must be mapped device memory that stays valid for
    /// the lifetime of the returned window.
    pub unsafe fn new(base: usize, size: usize) -> Result<Self, Error> {
        if base % 4 != 0 || size == 0 || size % 4 != 0 {
            return Err(Error::InvalidWindow);
        }
        let base = NonNull::new(base as *mut u32).ok_or(Error::InvalidWindow)?;
        Ok(RegisterWindow { base, size })
    }

    /// Base address of the mapping.
    pub fn base(&self) -> usize {
        self.base.as_ptr() as usize
    }

    /// Window length in bytes.
    pub fn size(&self) -> usize {
        self.size
    }

    #[inline(always)]
    fn slot(&self, offset: usize) -> *mut u32 {
        assert!(
            offset % 4 == 0 && offset + 4 <= self.size,
            "register offset {:#x} outside {:#x}-byte window",
            offset,
            self.size
        );
        // SAFETY: offset is in bounds of the window checked above.
        unsafe { self.base.as_ptr().add(offset / 4) }
    }
}

impl Registers for RegisterWindow {
    #[inline(always)]
    fn read32(&self, offset: usize) -> u32 {
        // SAFETY: `slot` bounds-checks; the constructor contract guarantees
        // the whole window is mapped.
        unsafe { core::ptr::read_volatile(self.slot(offset)) }
    }

    #[inline(always)]
    fn write32(&self, offset: usize, value: u32) {
        // SAFETY: see `read32`.
        unsafe { core::ptr::write_volatile(self.slot(offset), value) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Plain memory standing in for a peripheral block.
    #[repr(C, align(4))]
    struct Backing([u32; 8]);

    #[test]
    fn rejects_bad_ranges() {
        unsafe {
            assert_eq!(RegisterWindow::new(0, 32).unwrap_err(), Error::InvalidWindow);
            assert_eq!(RegisterWindow::new(0x1002, 32).unwrap_err(), Error::InvalidWindow);
            assert_eq!(RegisterWindow::new(0x1000, 0).unwrap_err(), Error::InvalidWindow);
            assert_eq!(RegisterWindow::new(0x1000, 6).unwrap_err(), Error::InvalidWindow);
        }
    }

    #[test]
    fn volatile_read_write() {
        let mut mem = Backing([0; 8]);
        let window = unsafe { RegisterWindow::new(mem.0.as_mut_ptr() as usize, 32).unwrap() };

        window.write32(0x04, 0xDEAD_BEEF);
        window.write32(0x1C, 7);
        assert_eq!(window.read32(0x04), 0xDEAD_BEEF);
        assert_eq!(window.read32(0x1C), 7);
        assert_eq!(window.read32(0x00), 0);

        window.modify32(0x04, 0xFFFF_0000, 0x0001_0000);
        assert_eq!(window.read32(0x04), 0x0001_BEEF);

        drop(window);
        assert_eq!(mem.0[1], 0x0001_BEEF);
        assert_eq!(mem.0[7], 7);
    }

    #[test]
    #[should_panic(expected = "outside")]
    fn out_of_window_access_panics() {
        let mut mem = Backing([0; 8]);
        let window = unsafe { RegisterWindow::new(mem.0.as_mut_ptr() as usize, 32).unwrap() };
        window.read32(0x20);
    }

    #[test]
    #[should_panic(expected = "outside")]
    fn misaligned_access_panics() {
        let mut mem = Backing([0; 8]);
        let window = unsafe { RegisterWindow::new(mem.0.as_mut_ptr() as usize, 32).unwrap() };
        window.write32(0x02, 1);
    }
}
