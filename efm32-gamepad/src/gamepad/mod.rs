//! Gamepad input: GPIO interrupt handler, ownership arbitration and
//! notification.
//!
//! ## Components
//!
//! | Type | Role |
//! |------|------|
//! | [`ButtonInput`] | Configures port C, runs the edge interrupt handler |
//! | [`InputLatch`] | Latest raw sample, shared with the channel |
//! | [`OwnerCell`] | At most one client holds the channel |
//! | [`Notifier`] / [`PendingSignal`] | SIGIO-style wakeups to the owner |
//! | [`Buttons`] / [`ButtonPin`] | Client-side decoding of the raw byte |
//!
//! ## Data flow
//!
//! ```text
//!  edge IRQ ──► ButtonInput::handle ──► InputLatch ◄── GamepadChannel::read
//!                      │
//!                      └──► OwnerCell::current ──► Notifier::notify
//! ```

pub mod buttons;
pub mod keys;
pub mod latch;
pub mod notify;
pub mod owner;

pub use buttons::{ButtonInput, GamepadState, GpioIrqs};
pub use keys::{Button, ButtonPin, Buttons};
pub use latch::InputLatch;
pub use notify::{Notifier, PendingSignal, Signal};
pub use owner::{OwnerCell, OwnerId};
