//! Square-wave audio output on the DAC, clocked by a hardware timer.
//!
//! | Type | Role |
//! |------|------|
//! | [`SquareWave`] | Level toggle + amplitude, stepped once per tick |
//! | [`AudioSynth`] | Configures DAC and TIMER1, runs the overflow handler |
//! | [`SynthConfig`] | Prescaler, reload value and amplitude |

pub mod square;
pub mod synth;

pub use square::SquareWave;
pub use synth::{AudioSynth, SynthConfig, SynthResources};
