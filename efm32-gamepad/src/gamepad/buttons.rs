//! GPIO button input controller.
//!
//! Buttons sit on port C pins 0–7 as pulled-up inputs with edge interrupts on
//! both transitions. The EFM32GG routes even-numbered pins to one interrupt
//! line and odd-numbered pins to another, so the same handler is installed on
//! both.
//!
//! ## Handler
//!
//! ```text
//! DIN ──► InputLatch ──► owner? ──► Notifier::notify(owner, SIGIO)
//!                                   IF ──► IFC (acknowledge)
//! ```
//!
//! The sample is committed before the notification is posted, and the line
//! is acknowledged last so it stays asserted until the sample is safe. Only
//! the button pins are acknowledged; with none of them flagged the handler
//! returns [`IrqReturn::None`] and touches nothing.

use core::marker::PhantomPinned;
use core::pin::Pin;
use core::sync::atomic::{AtomicU8, Ordering};

use log::{debug, warn};

use crate::constants::BUTTON_MASK;
use crate::error::Error;
use crate::mmio::registers::gpio;
use crate::mmio::{MemResource, Registers};
use crate::platform::{self, InterruptHandler, IrqLine, IrqReturn, Mapped, Platform};

use super::latch::InputLatch;
use super::notify::{Notifier, Signal};
use super::owner::OwnerCell;

/// State shared between the GPIO interrupt handler and the gamepad channel.
pub struct GamepadState {
    latch: InputLatch,
    owner: OwnerCell,
}

impl GamepadState {
    pub const fn new() -> Self {
        GamepadState {
            latch: InputLatch::new(),
            owner: OwnerCell::new(),
        }
    }

    pub fn latch(&self) -> &InputLatch {
        &self.latch
    }

    pub fn owner(&self) -> &OwnerCell {
        &self.owner
    }
}

impl Default for GamepadState {
    fn default() -> Self {
        Self::new()
    }
}

/// The two GPIO interrupt lines, split by pin parity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GpioIrqs {
    pub even: IrqLine,
    pub odd: IrqLine,
}

const EVEN_REGISTERED: u8 = 1 << 0;
const ODD_REGISTERED: u8 = 1 << 1;

/// Configured GPIO block plus its interrupt handler.
///
/// [`probe`](Self::probe) maps and configures the pins;
/// [`start`](Self::start) installs the handler and enables interrupts.
/// Dropping the controller disables interrupts, frees both lines, disables
/// the pins and unmaps the window, in that order.
pub struct ButtonInput<'a, P: Platform, N: Notifier> {
    platform: &'a P,
    gpio: Mapped<'a, P>,
    irqs: GpioIrqs,
    state: &'a GamepadState,
    notifier: &'a N,
    registered: AtomicU8,
    _pin: PhantomPinned,
}

impl<'a, P: Platform, N: Notifier> ButtonInput<'a, P, N> {
    /// Map the GPIO block and configure the button pins.
    ///
    /// Pins 0–7 of port C become inputs with pull-up and glitch filter, and
    /// edge detection is armed on both rising and falling transitions.
    /// Interrupt generation stays off until [`start`](Self::start).
    pub fn probe(
        platform: &'a P,
        resource: &MemResource,
        irqs: GpioIrqs,
        state: &'a GamepadState,
        notifier: &'a N,
    ) -> Result<Self, Error> {
        let gpio = Mapped::map(platform, resource)?;

        gpio.write32(gpio::PC_MODEL, gpio::MODE_INPUT_PULL_FILTER);
        gpio.write32(gpio::PC_DOUT, BUTTON_MASK);
        gpio.write32(gpio::EXTIPSELL, gpio::EXTIPSEL_PORT_C);
        gpio.write32(gpio::EXTIRISE, BUTTON_MASK);
        gpio.write32(gpio::EXTIFALL, BUTTON_MASK);

        // Readers see the real pin state before the first edge arrives.
        state.latch.store((gpio.read32(gpio::PC_DIN) & BUTTON_MASK) as u8);

        debug!(
            "gamepad: gpio mapped at {:#x}, irqs {}/{}",
            resource.start, irqs.even, irqs.odd
        );

        Ok(ButtonInput {
            platform,
            gpio,
            irqs,
            state,
            notifier,
            registered: AtomicU8::new(0),
            _pin: PhantomPinned,
        })
    }

    /// Install the handler on both lines and enable button interrupts.
    ///
    /// If either registration fails, any line already registered is freed
    /// and [`Error::InterruptSetupFailed`] is returned with interrupts still
    /// disabled.
    pub fn start(self: Pin<&Self>) -> Result<(), Error> {
        let this = self.get_ref();

        for (bit, line) in [
            (EVEN_REGISTERED, this.irqs.even),
            (ODD_REGISTERED, this.irqs.odd),
        ] {
            if this.registered.load(Ordering::Acquire) & bit != 0 {
                continue;
            }
            // SAFETY: `Drop` calls `stop`, which frees every registered line
            // before the pinned controller goes away.
            if let Err(err) = unsafe { platform::request(this.platform, line, self) } {
                warn!("gamepad: failed to register irq {}", line);
                this.stop();
                return Err(err);
            }
            this.registered.fetch_or(bit, Ordering::AcqRel);
        }

        this.gpio.write32(gpio::IFC, BUTTON_MASK);
        this.gpio.write32(gpio::IEN, BUTTON_MASK);
        debug!("gamepad: interrupts enabled");
        Ok(())
    }

    /// Disable button interrupts and free both lines.
    ///
    /// The pins stay configured; [`start`](Self::start) may be called again.
    pub fn stop(&self) {
        self.gpio.write32(gpio::IEN, 0);

        let registered = self.registered.swap(0, Ordering::AcqRel);
        if registered & EVEN_REGISTERED != 0 {
            platform::release(self.platform, self.irqs.even, self);
        }
        if registered & ODD_REGISTERED != 0 {
            platform::release(self.platform, self.irqs.odd, self);
        }
    }

    /// Whether the handler is installed on both lines.
    pub fn is_running(&self) -> bool {
        self.registered.load(Ordering::Acquire) == EVEN_REGISTERED | ODD_REGISTERED
    }

    /// Shared state this controller latches into.
    pub fn state(&self) -> &'a GamepadState {
        self.state
    }
}

impl<P: Platform, N: Notifier> InterruptHandler for ButtonInput<'_, P, N> {
    fn handle(&self, _line: IrqLine) -> IrqReturn {
        let flags = self.gpio.read32(gpio::IF) & BUTTON_MASK;
        if flags == 0 {
            return IrqReturn::None;
        }

        let raw = self.gpio.read32(gpio::PC_DIN);
        self.state.latch.store((raw & BUTTON_MASK) as u8);

        if let Some(owner) = self.state.owner.current() {
            self.notifier.notify(owner, Signal::IO);
        }

        self.gpio.write32(gpio::IFC, flags);
        IrqReturn::Handled
    }
}

impl<P: Platform, N: Notifier> Drop for ButtonInput<'_, P, N> {
    fn drop(&mut self) {
        self.stop();
        self.gpio.write32(gpio::PC_MODEL, gpio::MODE_DISABLED);
        debug!("gamepad: gpio released");
        // `gpio` unmaps when the fields drop.
    }
}
