//! Timer-driven square-wave synthesis on the DAC.
//!
//! TIMER1 overflows at a fixed rate; each overflow interrupt writes one
//! sample to both DAC channels and flips the [`SquareWave`] level. Two
//! overflows make one period of the tone.
//!
//! ## Timing
//!
//! ```text
//! toggle rate = HFPERCLK / 2^prescale / top
//! tone        = toggle rate / 2
//!
//! default: 14 MHz / 64 / 547 ≈ 400 Hz toggles ≈ 200 Hz tone
//! ```
//!
//! ## Handler
//!
//! ```text
//! SquareWave::tick ──► CH0DATA
//!                  └─► CH1DATA
//! TIMER IFC ◄── OF
//! ```

use core::marker::PhantomPinned;
use core::pin::Pin;
use core::sync::atomic::{AtomicBool, Ordering};

use log::{debug, warn};

use crate::constants::{
    AMPLITUDE_DEFAULT, DAC_MAX, HFPER_CLOCK_HZ, TIMER_PRESCALE_LOG2, TIMER_PRESCALE_LOG2_MAX,
    TIMER_TOP_DEFAULT,
};
use crate::control::AudioControl;
use crate::error::Error;
use crate::mmio::registers::{dac, timer};
use crate::mmio::{MemResource, Registers};
use crate::platform::{self, InterruptHandler, IrqLine, IrqReturn, Mapped, Platform};

use super::square::SquareWave;

/// Timer and output settings, fixed at bring-up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SynthConfig {
    /// Timer clock divider as a power of two (0 to
    /// [`TIMER_PRESCALE_LOG2_MAX`]).
    pub prescale_log2: u8,
    /// Timer ticks per half-period. Must be non-zero.
    pub top: u16,
    /// Sample value on the high half-period (12-bit).
    pub amplitude: u16,
}

impl Default for SynthConfig {
    fn default() -> Self {
        SynthConfig {
            prescale_log2: TIMER_PRESCALE_LOG2,
            top: TIMER_TOP_DEFAULT,
            amplitude: AMPLITUDE_DEFAULT,
        }
    }
}

impl SynthConfig {
    /// Configuration producing a tone of `hz` with the default prescaler and
    /// amplitude. Non-positive frequencies give the lowest reachable tone.
    pub fn for_tone(hz: f32) -> Self {
        let mut config = Self::default();
        let toggles = 2.0 * hz;
        let top = if toggles > 0.0 {
            libm::roundf(config.timer_clock_hz() / toggles)
        } else {
            u16::MAX as f32
        };
        config.top = top.clamp(1.0, u16::MAX as f32) as u16;
        config
    }

    /// Check that the hardware can encode these settings.
    pub fn validate(&self) -> Result<(), Error> {
        if self.prescale_log2 > TIMER_PRESCALE_LOG2_MAX || self.top == 0 {
            return Err(Error::InvalidConfig);
        }
        Ok(())
    }

    /// Timer input clock after the prescaler. Zero when the divider does
    /// not fit in 32 bits.
    pub fn timer_clock_hz(&self) -> f32 {
        match 1u32.checked_shl(self.prescale_log2 as u32) {
            Some(divider) => HFPER_CLOCK_HZ as f32 / divider as f32,
            None => 0.0,
        }
    }

    /// Level toggles per second.
    pub fn toggle_rate_hz(&self) -> f32 {
        self.timer_clock_hz() / self.top as f32
    }

    /// Fundamental of the square wave.
    pub fn tone_hz(&self) -> f32 {
        self.toggle_rate_hz() / 2.0
    }
}

/// Where the synthesizer's peripherals live.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SynthResources {
    pub dac: MemResource,
    pub timer: MemResource,
    pub timer_irq: IrqLine,
}

/// DAC + TIMER pair generating the square wave.
///
/// [`probe`](Self::probe) maps both blocks and configures them;
/// [`start`](Self::start) installs the timer handler and starts counting.
/// Dropping the synthesizer disables the DAC channels, stops the timer,
/// frees the line and unmaps both windows.
pub struct AudioSynth<'a, P: Platform> {
    platform: &'a P,
    dac: Mapped<'a, P>,
    timer: Mapped<'a, P>,
    timer_irq: IrqLine,
    wave: &'a SquareWave,
    config: SynthConfig,
    registered: AtomicBool,
    enabled: AtomicBool,
    _pin: PhantomPinned,
}

impl<'a, P: Platform> AudioSynth<'a, P> {
    /// Map and configure the DAC and timer.
    ///
    /// Settings are checked with [`SynthConfig::validate`] before anything
    /// is mapped. If the timer window cannot be mapped, the DAC window is
    /// released before the error is returned.
    pub fn probe(
        platform: &'a P,
        resources: &SynthResources,
        wave: &'a SquareWave,
        config: SynthConfig,
    ) -> Result<Self, Error> {
        config.validate()?;

        let dac = Mapped::map(platform, &resources.dac)?;
        let timer = Mapped::map(platform, &resources.timer)?;

        dac.write32(dac::CTRL, dac::CTRL_PRESC5_OUT_PIN);
        dac.write32(dac::CH0CTRL, dac::CH_EN);
        dac.write32(dac::CH1CTRL, dac::CH_EN);
        wave.reset(config.amplitude);

        let presc = ((config.prescale_log2 as u32) << timer::CTRL_PRESC_SHIFT) & timer::CTRL_PRESC_MASK;
        timer.modify32(timer::CTRL, timer::CTRL_PRESC_MASK, presc);
        timer.write32(timer::TOP, config.top as u32);

        debug!(
            "synth: top {} prescale 2^{}, tone {} Hz",
            config.top,
            config.prescale_log2,
            config.tone_hz()
        );

        Ok(AudioSynth {
            platform,
            dac,
            timer,
            timer_irq: resources.timer_irq,
            wave,
            config,
            registered: AtomicBool::new(false),
            enabled: AtomicBool::new(false),
            _pin: PhantomPinned,
        })
    }

    /// Install the timer handler, enable the DAC channels and the overflow
    /// interrupt, and start the timer. May be called again after
    /// [`stop`](Self::stop).
    pub fn start(self: Pin<&Self>) -> Result<(), Error> {
        let this = self.get_ref();

        if !this.registered.load(Ordering::Acquire) {
            // SAFETY: `Drop` calls `stop`, which frees the line before the
            // pinned synthesizer goes away.
            unsafe { platform::request(this.platform, this.timer_irq, self) }.inspect_err(|_| {
                warn!("synth: failed to register irq {}", this.timer_irq);
            })?;
            this.registered.store(true, Ordering::Release);
        }

        this.dac.write32(dac::CH0CTRL, dac::CH_EN);
        this.dac.write32(dac::CH1CTRL, dac::CH_EN);
        this.timer.write32(timer::IFC, timer::IF_OF);
        this.timer.write32(timer::IEN, timer::IF_OF);
        this.timer.write32(timer::CMD, timer::CMD_START);
        this.enabled.store(true, Ordering::Release);
        debug!("synth: timer started");
        Ok(())
    }

    /// Disable the DAC channels, stop the timer and free its line.
    pub fn stop(&self) {
        self.dac.write32(dac::CH0CTRL, dac::CH_DISABLED);
        self.dac.write32(dac::CH1CTRL, dac::CH_DISABLED);
        self.timer.write32(timer::IEN, 0);
        self.timer.write32(timer::CMD, timer::CMD_STOP);
        self.enabled.store(false, Ordering::Release);

        if self.registered.swap(false, Ordering::AcqRel) {
            platform::release(self.platform, self.timer_irq, self);
        }
    }

    pub fn is_running(&self) -> bool {
        self.registered.load(Ordering::Acquire)
    }

    pub fn config(&self) -> &SynthConfig {
        &self.config
    }

    pub fn wave(&self) -> &'a SquareWave {
        self.wave
    }
}

impl<P: Platform> InterruptHandler for AudioSynth<'_, P> {
    fn handle(&self, _line: IrqLine) -> IrqReturn {
        let sample = self.wave.tick() as u32;
        self.dac.write32(dac::CH0DATA, sample);
        self.dac.write32(dac::CH1DATA, sample);
        self.timer.write32(timer::IFC, timer::IF_OF);
        IrqReturn::Handled
    }
}

impl<P: Platform> AudioControl for &AudioSynth<'_, P> {
    type Error = Error;

    /// Resume output after [`disable`](AudioControl::disable). Fails with
    /// [`Error::NotStarted`] while no timer handler is installed.
    fn enable(&mut self) -> Result<(), Self::Error> {
        if !self.registered.load(Ordering::Acquire) {
            return Err(Error::NotStarted);
        }
        self.dac.write32(dac::CH0CTRL, dac::CH_EN);
        self.dac.write32(dac::CH1CTRL, dac::CH_EN);
        self.timer.write32(timer::CMD, timer::CMD_START);
        self.enabled.store(true, Ordering::Release);
        Ok(())
    }

    fn disable(&mut self) -> Result<(), Self::Error> {
        self.timer.write32(timer::CMD, timer::CMD_STOP);
        self.dac.write32(dac::CH0CTRL, dac::CH_DISABLED);
        self.dac.write32(dac::CH1CTRL, dac::CH_DISABLED);
        self.enabled.store(false, Ordering::Release);
        Ok(())
    }

    fn volume(&mut self, level: f32) -> Result<(), Self::Error> {
        // NaN lands on 0 through `max`.
        let level = level.max(0.0).min(1.0);
        let amplitude = libm::roundf(level * DAC_MAX as f32) as u16;
        self.wave.set_amplitude(amplitude);
        Ok(())
    }

    fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Acquire)
    }
}

impl<P: Platform> Drop for AudioSynth<'_, P> {
    fn drop(&mut self) {
        self.stop();
        debug!("synth: released");
        // `dac` and `timer` unmap when the fields drop.
    }
}
