//! Host-side test doubles: a fake platform with recording register windows
//! and a software interrupt table.

extern crate std;

use core::cell::RefCell;
use core::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::vec::Vec;

use crate::error::Error;
use crate::mmio::{MemResource, Registers};
use crate::platform::{IrqAction, IrqLine, IrqReturn, Platform};

/// Backing store for one fake peripheral.
///
/// Keeps a chronological write log and counts every access made after the
/// window was handed back to the platform.
pub struct FakeRegs {
    base: usize,
    mem: Vec<AtomicU32>,
    released: AtomicBool,
    stray: AtomicU32,
    log: Mutex<Vec<(usize, u32)>>,
}

impl FakeRegs {
    fn new(resource: &MemResource) -> Self {
        FakeRegs {
            base: resource.start,
            mem: (0..resource.len / 4).map(|_| AtomicU32::new(0)).collect(),
            released: AtomicBool::new(false),
            stray: AtomicU32::new(0),
            log: Mutex::new(Vec::new()),
        }
    }

    fn index(&self, offset: usize) -> usize {
        assert!(
            offset % 4 == 0 && offset / 4 < self.mem.len(),
            "register offset {:#x} outside {:#x}-byte window",
            offset,
            self.mem.len() * 4
        );
        offset / 4
    }

    /// Set a register as the hardware would, without logging.
    pub fn poke(&self, offset: usize, value: u32) {
        self.mem[self.index(offset)].store(value, Ordering::SeqCst);
    }

    /// Current register value, without counting as an access.
    pub fn peek(&self, offset: usize) -> u32 {
        self.mem[self.index(offset)].load(Ordering::SeqCst)
    }

    /// Every `(offset, value)` written through the window, oldest first.
    pub fn writes(&self) -> Vec<(usize, u32)> {
        self.log.lock().unwrap().clone()
    }

    /// Values written to one register, oldest first.
    pub fn writes_to(&self, offset: usize) -> Vec<u32> {
        self.writes()
            .into_iter()
            .filter(|&(o, _)| o == offset)
            .map(|(_, v)| v)
            .collect()
    }

    /// Index of the first write of `value` to `offset` in the log.
    pub fn position(&self, offset: usize, value: u32) -> Option<usize> {
        self.writes().iter().position(|&w| w == (offset, value))
    }

    pub fn clear_log(&self) {
        self.log.lock().unwrap().clear();
    }

    pub fn is_released(&self) -> bool {
        self.released.load(Ordering::SeqCst)
    }

    /// Accesses made through the window after it was unmapped.
    pub fn stray_accesses(&self) -> u32 {
        self.stray.load(Ordering::SeqCst)
    }
}

/// Register window handed out by [`FakePlatform`].
pub struct FakeWindow(Arc<FakeRegs>);

impl Registers for FakeWindow {
    fn read32(&self, offset: usize) -> u32 {
        if self.0.is_released() {
            self.0.stray.fetch_add(1, Ordering::SeqCst);
            return 0;
        }
        self.0.mem[self.0.index(offset)].load(Ordering::SeqCst)
    }

    fn write32(&self, offset: usize, value: u32) {
        if self.0.is_released() {
            self.0.stray.fetch_add(1, Ordering::SeqCst);
            return;
        }
        self.0.mem[self.0.index(offset)].store(value, Ordering::SeqCst);
        self.0.log.lock().unwrap().push((offset, value));
    }
}

#[derive(Default)]
struct State {
    windows: Vec<Arc<FakeRegs>>,
    actions: Vec<(IrqLine, IrqAction)>,
    failing_maps: Vec<usize>,
    failing_irqs: Vec<IrqLine>,
    unmap_calls: usize,
    free_calls: usize,
}

/// In-memory [`Platform`]: fake windows plus a software IRQ table that
/// [`fire`](Self::fire) dispatches through.
pub struct FakePlatform {
    state: critical_section::Mutex<RefCell<State>>,
}

impl FakePlatform {
    pub fn new() -> Self {
        FakePlatform {
            state: critical_section::Mutex::new(RefCell::new(State::default())),
        }
    }

    fn with<R>(&self, f: impl FnOnce(&mut State) -> R) -> R {
        critical_section::with(|cs| f(&mut *self.state.borrow_ref_mut(cs)))
    }

    /// Make mapping the resource starting at `start` fail.
    pub fn fail_map(&self, start: usize) {
        self.with(|s| s.failing_maps.push(start));
    }

    /// Make registering a handler on `line` fail.
    pub fn fail_irq(&self, line: IrqLine) {
        self.with(|s| s.failing_irqs.push(line));
    }

    /// Most recent window mapped at `base`, live or released.
    pub fn regs(&self, base: usize) -> Arc<FakeRegs> {
        self.with(|s| {
            s.windows
                .iter()
                .rev()
                .find(|w| w.base == base)
                .cloned()
                .unwrap_or_else(|| panic!("nothing mapped at {:#x}", base))
        })
    }

    pub fn mapped_count(&self) -> usize {
        self.with(|s| s.windows.iter().filter(|w| !w.is_released()).count())
    }

    pub fn unmap_calls(&self) -> usize {
        self.with(|s| s.unmap_calls)
    }

    pub fn registered_count(&self) -> usize {
        self.with(|s| s.actions.len())
    }

    pub fn free_calls(&self) -> usize {
        self.with(|s| s.free_calls)
    }

    pub fn is_registered(&self, line: IrqLine) -> bool {
        self.with(|s| s.actions.iter().any(|&(l, _)| l == line))
    }

    /// Raise `line`. Returns `None` if no handler is installed.
    pub fn fire(&self, line: IrqLine) -> Option<IrqReturn> {
        let action = self.with(|s| {
            s.actions
                .iter()
                .find(|&&(l, _)| l == line)
                .map(|&(_, action)| action)
        })?;
        // SAFETY: drivers free their lines before their handlers go away;
        // the action was still installed when copied out above.
        Some(unsafe { action.invoke(line) })
    }
}

impl Platform for FakePlatform {
    type Window = FakeWindow;

    fn map(&self, resource: &MemResource) -> Result<FakeWindow, Error> {
        self.with(|s| {
            if s.failing_maps.contains(&resource.start) {
                return Err(Error::MapFailed);
            }
            let regs = Arc::new(FakeRegs::new(resource));
            s.windows.push(regs.clone());
            Ok(FakeWindow(regs))
        })
    }

    fn unmap(&self, window: FakeWindow) {
        assert!(!window.0.is_released(), "window unmapped twice");
        window.0.released.store(true, Ordering::SeqCst);
        self.with(|s| s.unmap_calls += 1);
    }

    unsafe fn request_irq(&self, line: IrqLine, action: IrqAction) -> Result<(), Error> {
        self.with(|s| {
            if s.failing_irqs.contains(&line) {
                return Err(Error::InterruptSetupFailed(line));
            }
            s.actions.push((line, action));
            Ok(())
        })
    }

    fn free_irq(&self, line: IrqLine, token: *const ()) {
        self.with(|s| {
            s.free_calls += 1;
            s.actions
                .retain(|&(l, action)| !(l == line && action.token() == token));
        });
    }
}
