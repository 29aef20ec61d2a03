//! Hooks into the host OS: register-window mapping and interrupt routing.
//!
//! The drivers never touch the OS directly. Whatever hosts them (a kernel
//! module shim, an RTOS, a test harness) implements [`Platform`] and calls
//! [`IrqAction::invoke`] when a registered line fires.
//!
//! ## Lifetimes
//!
//! ```text
//! probe()  ──► Mapped<P>         (unmap on drop)
//! start()  ──► request_irq(..)   (handler is pinned; freed in its Drop)
//! drop     ──► disable hw → free_irq → unmap
//! ```
//!
//! Handlers are registered through a type-erased token pointing at the
//! handler itself. Drivers only hand out a token from `Pin<&Self>` and free
//! every line in their `Drop`, so a token can never outlive its handler.

use core::mem::ManuallyDrop;
use core::ops::Deref;
use core::pin::Pin;

use crate::error::Error;
use crate::mmio::{MemResource, Registers};

/// Hardware interrupt line number.
pub type IrqLine = u32;

/// Result of running an interrupt handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IrqReturn {
    /// The interrupt was ours and has been acknowledged.
    Handled,
    /// Nothing to do for this device.
    None,
}

/// Code that runs in interrupt context.
///
/// Implementations must not block and must finish quickly.
pub trait InterruptHandler: Sync {
    fn handle(&self, line: IrqLine) -> IrqReturn;
}

/// A handler function plus the token identifying the device it serves.
#[derive(Debug, Clone, Copy)]
pub struct IrqAction {
    handler: unsafe fn(IrqLine, *const ()) -> IrqReturn,
    token: *const (),
}

// SAFETY: the token always points at an `InterruptHandler`, which is `Sync`,
// so the action may be stored and invoked from any context.
unsafe impl Send for IrqAction {}
unsafe impl Sync for IrqAction {}

unsafe fn trampoline<H: InterruptHandler>(line: IrqLine, token: *const ()) -> IrqReturn {
    // SAFETY: `token` was created from `&H` in `IrqAction::new` and the
    // registration contract keeps `H` alive while the action is installed.
    let handler = unsafe { &*(token as *const H) };
    handler.handle(line)
}

impl IrqAction {
    fn new<H: InterruptHandler>(handler: Pin<&H>) -> Self {
        IrqAction {
            handler: trampoline::<H>,
            token: handler.get_ref() as *const H as *const (),
        }
    }

    /// Token identifying the device; passed back to [`Platform::free_irq`].
    pub fn token(&self) -> *const () {
        self.token
    }

    /// Run the handler.
    ///
    /// # Safety
    ///
    /// The action must still be registered, i.e. [`Platform::free_irq`] has
    /// not returned for its line and token.
    pub unsafe fn invoke(&self, line: IrqLine) -> IrqReturn {
        unsafe { (self.handler)(line, self.token) }
    }
}

/// OS glue consumed by the drivers.
pub trait Platform: Sync {
    /// The register window type handed out by [`map`](Self::map).
    type Window: Registers;

    /// Map a peripheral's register range.
    fn map(&self, resource: &MemResource) -> Result<Self::Window, Error>;

    /// Release a window obtained from [`map`](Self::map).
    fn unmap(&self, window: Self::Window);

    /// Install `action` on `line`.
    ///
    /// # Safety
    ///
    /// The handler behind `action.token()` must stay valid until
    /// [`free_irq`](Self::free_irq) is called for the same line and token.
    unsafe fn request_irq(&self, line: IrqLine, action: IrqAction) -> Result<(), Error>;

    /// Remove the action identified by `token` from `line`.
    ///
    /// Must not return while the handler is still running on another CPU.
    fn free_irq(&self, line: IrqLine, token: *const ());
}

/// Register `handler` on `line`.
///
/// Failures are reported as [`Error::InterruptSetupFailed`].
///
/// # Safety
///
/// `H` must call [`Platform::free_irq`] for `line` before it is dropped.
/// Pinning then guarantees its memory stays valid until that happens.
pub(crate) unsafe fn request<P, H>(platform: &P, line: IrqLine, handler: Pin<&H>) -> Result<(), Error>
where
    P: Platform,
    H: InterruptHandler,
{
    let action = IrqAction::new(handler);
    unsafe { platform.request_irq(line, action) }.map_err(|_| Error::InterruptSetupFailed(line))
}

/// Remove `handler` from `line`.
pub(crate) fn release<P, H>(platform: &P, line: IrqLine, handler: &H)
where
    P: Platform,
    H: InterruptHandler,
{
    platform.free_irq(line, handler as *const H as *const ());
}

/// A mapped register window, handed back to the platform exactly once when
/// dropped.
pub struct Mapped<'p, P: Platform> {
    platform: &'p P,
    window: ManuallyDrop<P::Window>,
}

impl<'p, P: Platform> Mapped<'p, P> {
    /// Map `resource` through `platform`.
    pub fn map(platform: &'p P, resource: &MemResource) -> Result<Self, Error> {
        let window = platform.map(resource)?;
        Ok(Mapped {
            platform,
            window: ManuallyDrop::new(window),
        })
    }
}

impl<P: Platform> Deref for Mapped<'_, P> {
    type Target = P::Window;

    fn deref(&self) -> &P::Window {
        &self.window
    }
}

impl<P: Platform> Drop for Mapped<'_, P> {
    fn drop(&mut self) {
        // SAFETY: `window` is never touched again after this point.
        let window = unsafe { ManuallyDrop::take(&mut self.window) };
        self.platform.unmap(window);
    }
}
