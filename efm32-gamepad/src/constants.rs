/// Peripheral clock (HFPERCLK) feeding GPIO, TIMER and DAC, in Hz.
pub const HFPER_CLOCK_HZ: u32 = 14_000_000;

/// Default timer prescaler as a power of two (DIV64).
pub const TIMER_PRESCALE_LOG2: u8 = 6;

/// Largest prescaler the TIMER `CTRL.PRESC` field encodes (DIV1024).
pub const TIMER_PRESCALE_LOG2_MAX: u8 = 10;

/// Default timer reload value: 14 MHz / 64 / 547 ≈ 400 toggles per second.
pub const TIMER_TOP_DEFAULT: u16 = 547;

/// Largest value the 12-bit DAC data registers accept.
pub const DAC_MAX: u16 = 0x0FFF;

/// Default square-wave amplitude written on the high half-period.
pub const AMPLITUDE_DEFAULT: u16 = 0x0100;

/// Number of buttons wired to GPIO port C (pins 0–7).
pub const BUTTON_COUNT: usize = 8;

/// Mask covering every button pin.
pub const BUTTON_MASK: u32 = (1 << BUTTON_COUNT) - 1;

/// Bytes returned by one read of the gamepad channel.
pub const LATCH_BYTES: usize = 1;
