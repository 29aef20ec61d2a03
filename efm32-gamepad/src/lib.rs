//! # efm32-gamepad
//!
//! `no_std` drivers for the EFM32GG development kit's gamepad and DAC,
//! written against a small set of OS hooks so the same code runs inside a
//! kernel module shim, an RTOS, or a host test harness.
//!
//! ## Architecture
//!
//! | Layer | Module | Purpose |
//! |-------|--------|---------|
//! | Registers | [`mmio`] | Bounds-checked volatile register windows and layout tables |
//! | OS hooks | [`platform`] | Map/unmap windows, install/free interrupt handlers |
//! | Input | [`gamepad`] | Edge-interrupt button latch, single-owner arbitration, SIGIO wakeups |
//! | Output | [`audio`] | Timer-clocked square wave on both DAC channels |
//! | Control | [`control`] | `AudioControl` trait for the tone generator |
//! | Front-ends | [`chardev`] | open / read / write / release for each device |
//!
//! ## Quick start
//!
//! ```ignore
//! use core::pin::pin;
//! use efm32_gamepad::prelude::*;
//!
//! static STATE: GamepadState = GamepadState::new();
//! static WAVE: SquareWave = SquareWave::new(0);
//!
//! let input = pin!(ButtonInput::probe(&os, &gpio_res, irqs, &STATE, &os_signals)?);
//! input.as_ref().start()?;
//!
//! let synth = pin!(AudioSynth::probe(&os, &synth_res, &WAVE, SynthConfig::default())?);
//! synth.as_ref().start()?;
//!
//! // Hand these to the OS character-device layer:
//! let gamepad = GamepadChannel::new(&STATE);
//! let dac = DacChannel::new(&WAVE);
//! ```
//!
//! Dropping `input` or `synth` tears the peripheral down: interrupts are
//! disabled at the device, handlers are freed, then windows are unmapped.
//!
//! ## Features
//!
//! | Feature | Default | Enables |
//! |---------|---------|---------|
//! | `hal` | yes | [`gamepad::ButtonPin`] as an `embedded_hal::digital::InputPin` |
//!
//! ## Fixed parameters
//!
//! - **Buttons:** port C pins 0–7, active low ([`constants::BUTTON_MASK`])
//! - **Timer:** HFPERCLK / 64, top 547 ([`constants::TIMER_TOP_DEFAULT`])
//! - **Tone:** ≈ 200 Hz square wave, 12-bit amplitude

#![no_std]

pub mod audio;
pub mod chardev;
pub mod constants;
pub mod control;
pub mod error;
pub mod gamepad;
pub mod mmio;
pub mod platform;

pub use error::Error;

/// Commonly used types.
pub mod prelude {
    pub use crate::audio::{AudioSynth, SquareWave, SynthConfig, SynthResources};
    pub use crate::chardev::{CharDevice, DacChannel, GamepadChannel};
    pub use crate::control::AudioControl;
    pub use crate::error::Error;
    pub use crate::gamepad::{ButtonInput, GamepadState, GpioIrqs, Notifier, OwnerId, Signal};
    pub use crate::mmio::{MemResource, RegisterWindow, Registers};
    pub use crate::platform::{InterruptHandler, IrqAction, IrqLine, IrqReturn, Platform};
}

#[cfg(test)]
mod testing;
