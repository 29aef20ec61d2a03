//! EFM32GG register offsets and field values used by the drivers.
//!
//! Offsets are relative to the base of the mapped window for each
//! peripheral. Values follow the EFM32GG reference manual.

// Some fields are listed for completeness (status, counter, set registers)
// but are not touched by the drivers.
#![allow(dead_code)]

/// GPIO block. The window starts at port A; ports are 0x24 bytes apart and
/// the external-interrupt registers follow the port array.
pub mod gpio {
    /// Base of the GPIO register block.
    pub const BASE: usize = 0x4000_6000;
    /// Bytes covering every port plus the interrupt registers.
    pub const SIZE: usize = 0x120;

    /// Stride between port register groups.
    pub const PORT_STRIDE: usize = 0x24;
    /// Gamepad buttons are wired to port C.
    pub const PORT_C: usize = 2 * PORT_STRIDE;

    /// Port C mode register for pins 0–7 (4 bits per pin).
    pub const PC_MODEL: usize = PORT_C + 0x04;
    /// Port C data out; for input pins selects pull-up (1) or pull-down (0).
    pub const PC_DOUT: usize = PORT_C + 0x0C;
    /// Port C data in.
    pub const PC_DIN: usize = PORT_C + 0x1C;

    /// External interrupt port select for pins 0–7 (4 bits per pin).
    pub const EXTIPSELL: usize = 0x100;
    /// External interrupt port select for pins 8–15.
    pub const EXTIPSELH: usize = 0x104;
    /// Rising-edge trigger enable.
    pub const EXTIRISE: usize = 0x108;
    /// Falling-edge trigger enable.
    pub const EXTIFALL: usize = 0x10C;
    /// Interrupt enable.
    pub const IEN: usize = 0x110;
    /// Interrupt flags (pending).
    pub const IF: usize = 0x114;
    /// Interrupt flag set.
    pub const IFS: usize = 0x118;
    /// Interrupt flag clear (write 1 to clear).
    pub const IFC: usize = 0x11C;

    /// `MODEL` value: pins 0–7 disabled.
    pub const MODE_DISABLED: u32 = 0x0000_0000;
    /// `MODEL` value: pins 0–7 input with pull and glitch filter.
    pub const MODE_INPUT_PULL_FILTER: u32 = 0x3333_3333;
    /// `EXTIPSELL` value: port C selected for pins 0–7.
    pub const EXTIPSEL_PORT_C: u32 = 0x2222_2222;
}

/// TIMER1 block.
pub mod timer {
    pub const BASE: usize = 0x4001_0400;
    pub const SIZE: usize = 0x400;

    /// Control. Bits 27:24: PRESC (clock divided by 2^PRESC).
    pub const CTRL: usize = 0x00;
    /// Command. Bit 0: START, bit 1: STOP.
    pub const CMD: usize = 0x04;
    pub const STATUS: usize = 0x08;
    /// Interrupt enable. Bit 0: OF (overflow).
    pub const IEN: usize = 0x0C;
    pub const IF: usize = 0x10;
    pub const IFS: usize = 0x14;
    /// Interrupt flag clear.
    pub const IFC: usize = 0x18;
    /// Reload value; the counter overflows after `TOP + 1` ticks.
    pub const TOP: usize = 0x1C;
    pub const TOPB: usize = 0x20;
    pub const CNT: usize = 0x24;

    pub const CTRL_PRESC_SHIFT: u32 = 24;
    pub const CTRL_PRESC_MASK: u32 = 0xF << CTRL_PRESC_SHIFT;
    pub const CMD_START: u32 = 1 << 0;
    pub const CMD_STOP: u32 = 1 << 1;
    /// Overflow interrupt bit in `IEN`/`IF`/`IFC`.
    pub const IF_OF: u32 = 1 << 0;
}

/// DAC0 block.
pub mod dac {
    pub const BASE: usize = 0x4000_4000;
    pub const SIZE: usize = 0x400;

    /// Control.
    /// - Bits 18:16: PRESC (DAC clock = HFPERCLK / 2^PRESC)
    /// - Bits  5:4 : OUTMODE (1 = pin)
    /// - Bits  1:0 : CONVMODE (0 = continuous)
    pub const CTRL: usize = 0x00;
    pub const STATUS: usize = 0x04;
    /// Channel 0 control. Bit 0: EN.
    pub const CH0CTRL: usize = 0x08;
    /// Channel 1 control. Bit 0: EN.
    pub const CH1CTRL: usize = 0x0C;
    pub const IEN: usize = 0x10;
    pub const IF: usize = 0x14;
    pub const IFS: usize = 0x18;
    pub const IFC: usize = 0x1C;
    /// Channel 0 data (12 bits).
    pub const CH0DATA: usize = 0x20;
    /// Channel 1 data (12 bits).
    pub const CH1DATA: usize = 0x24;

    /// `CTRL` value: prescale 5, output to pin, continuous conversion.
    pub const CTRL_PRESC5_OUT_PIN: u32 = 0x0005_0010;
    pub const CH_EN: u32 = 1 << 0;
    pub const CH_DISABLED: u32 = 0;
}
