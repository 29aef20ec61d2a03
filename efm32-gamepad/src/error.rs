//! Error taxonomy shared by bring-up and the channel front-ends.

use core::fmt;

use crate::platform::IrqLine;

// Linux errno values reported to the syscall layer.
const EIO: i32 = 5;
const ENOMEM: i32 = 12;
const EFAULT: i32 = 14;
const EBUSY: i32 = 16;
const EINVAL: i32 = 22;

/// Errors returned by the drivers and channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The gamepad channel is already held open by another client.
    Busy,
    /// The read destination cannot hold the latched value.
    BufferTooSmall,
    /// Registering a handler on the given interrupt line failed.
    InterruptSetupFailed(IrqLine),
    /// The platform could not map a peripheral's register window.
    MapFailed,
    /// A register window was described with a null, misaligned or empty range.
    InvalidWindow,
    /// Synthesizer settings the hardware cannot encode.
    InvalidConfig,
    /// The operation needs the interrupt handler installed first.
    NotStarted,
}

impl Error {
    /// Negative errno for this error.
    ///
    /// `Busy` maps to `-EBUSY` so clients can tell "device in use" apart from
    /// a generic I/O failure and retry.
    pub fn errno(self) -> i32 {
        match self {
            Error::Busy => -EBUSY,
            Error::BufferTooSmall => -EFAULT,
            Error::InterruptSetupFailed(_) => -EIO,
            Error::MapFailed => -ENOMEM,
            Error::InvalidWindow | Error::InvalidConfig => -EINVAL,
            Error::NotStarted => -EIO,
        }
    }

    /// Whether the caller may retry the same call later.
    pub fn is_retryable(self) -> bool {
        matches!(self, Error::Busy)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Busy => f.write_str("device in use"),
            Error::BufferTooSmall => f.write_str("read buffer too small"),
            Error::InterruptSetupFailed(line) => {
                write!(f, "failed to register handler on irq {}", line)
            }
            Error::MapFailed => f.write_str("failed to map register window"),
            Error::InvalidWindow => f.write_str("invalid register window"),
            Error::InvalidConfig => f.write_str("invalid synthesizer configuration"),
            Error::NotStarted => f.write_str("device not started"),
        }
    }
}

impl core::error::Error for Error {}
