//! Client-facing channel front-ends.
//!
//! Each peripheral is exposed to client processes as a character device with
//! the usual open / read / write / release entry points. The OS shim owns
//! device numbers and file objects and forwards each call here together with
//! the calling process.
//!
//! | Channel | open | read | write |
//! |---------|------|------|-------|
//! | [`GamepadChannel`] | exclusive (`Busy`) | 1 raw byte | ignored |
//! | [`DacChannel`] | always | nothing | first 2 bytes: amplitude (LE) |

use log::{debug, info};

use crate::audio::SquareWave;
use crate::constants::LATCH_BYTES;
use crate::error::Error;
use crate::gamepad::{GamepadState, OwnerId};

/// Character-device entry points.
pub trait CharDevice {
    /// Called when `caller` opens the device.
    fn open(&self, caller: OwnerId) -> Result<(), Error>;

    /// Called when `caller` closes its last handle.
    fn release(&self, caller: OwnerId);

    /// Copy device data into `buf`; returns the number of bytes written.
    fn read(&self, caller: OwnerId, buf: &mut [u8]) -> Result<usize, Error>;

    /// Consume `buf`; returns the number of bytes accepted.
    fn write(&self, caller: OwnerId, buf: &[u8]) -> Result<usize, Error>;
}

/// Gamepad device: one owner at a time, reads return the latched byte.
pub struct GamepadChannel<'a> {
    state: &'a GamepadState,
}

impl<'a> GamepadChannel<'a> {
    pub fn new(state: &'a GamepadState) -> Self {
        GamepadChannel { state }
    }

    /// Process currently holding the device.
    pub fn owner(&self) -> Option<OwnerId> {
        self.state.owner().current()
    }
}

impl CharDevice for GamepadChannel<'_> {
    fn open(&self, caller: OwnerId) -> Result<(), Error> {
        self.state.owner().open(caller).inspect_err(|_| {
            debug!("gamepad: open by pid {} refused, device busy", caller.pid());
        })?;
        info!("gamepad: opened by pid {}", caller.pid());
        Ok(())
    }

    fn release(&self, caller: OwnerId) {
        self.state.owner().close(caller);
        info!("gamepad: released by pid {}", caller.pid());
    }

    fn read(&self, _caller: OwnerId, buf: &mut [u8]) -> Result<usize, Error> {
        let slot = buf.first_mut().ok_or(Error::BufferTooSmall)?;
        *slot = self.state.latch().load();
        Ok(LATCH_BYTES)
    }

    fn write(&self, _caller: OwnerId, buf: &[u8]) -> Result<usize, Error> {
        Ok(buf.len())
    }
}

/// DAC device: writes adjust the square-wave amplitude.
pub struct DacChannel<'a> {
    wave: &'a SquareWave,
}

impl<'a> DacChannel<'a> {
    pub fn new(wave: &'a SquareWave) -> Self {
        DacChannel { wave }
    }
}

impl CharDevice for DacChannel<'_> {
    fn open(&self, _caller: OwnerId) -> Result<(), Error> {
        Ok(())
    }

    fn release(&self, _caller: OwnerId) {}

    fn read(&self, _caller: OwnerId, _buf: &mut [u8]) -> Result<usize, Error> {
        Ok(0)
    }

    /// A write of at least two bytes sets the amplitude from the first two
    /// (little-endian, clamped to 12 bits). Shorter writes are accepted and
    /// ignored. The tone frequency is fixed.
    fn write(&self, _caller: OwnerId, buf: &[u8]) -> Result<usize, Error> {
        if let [lo, hi, ..] = *buf {
            self.wave.set_amplitude(u16::from_le_bytes([lo, hi]));
            debug!("dac: amplitude {}", self.wave.amplitude());
        }
        Ok(buf.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(pid: u32) -> OwnerId {
        OwnerId::new(pid).unwrap()
    }

    #[test]
    fn gamepad_read_requires_one_byte() {
        let state = GamepadState::new();
        let chan = GamepadChannel::new(&state);
        state.latch().store(0x5A);

        let mut empty: [u8; 0] = [];
        assert_eq!(chan.read(id(1), &mut empty), Err(Error::BufferTooSmall));

        let mut buf = [0u8; 4];
        assert_eq!(chan.read(id(1), &mut buf), Ok(1));
        assert_eq!(buf, [0x5A, 0, 0, 0]);
    }

    #[test]
    fn gamepad_write_is_ignored() {
        let state = GamepadState::new();
        let chan = GamepadChannel::new(&state);
        state.latch().store(0x11);

        assert_eq!(chan.write(id(1), &[1, 2, 3]), Ok(3));
        let mut buf = [0u8; 1];
        chan.read(id(1), &mut buf).unwrap();
        assert_eq!(buf[0], 0x11);
    }

    #[test]
    fn gamepad_open_is_exclusive() {
        let state = GamepadState::new();
        let chan = GamepadChannel::new(&state);

        chan.open(id(5)).unwrap();
        let err = chan.open(id(6)).unwrap_err();
        assert_eq!(err, Error::Busy);
        assert_eq!(err.errno(), -16);
        assert_eq!(chan.owner(), Some(id(5)));

        chan.release(id(5));
        assert_eq!(chan.owner(), None);
    }

    #[test]
    fn dac_write_sets_amplitude() {
        let wave = SquareWave::new(100);
        let chan = DacChannel::new(&wave);

        chan.open(id(2)).unwrap();
        assert_eq!(chan.write(id(2), &[0x34, 0x02, 0xFF]), Ok(3));
        assert_eq!(wave.amplitude(), 0x0234);

        assert_eq!(chan.write(id(2), &[0xFF, 0xFF]), Ok(2));
        assert_eq!(wave.amplitude(), 0x0FFF);
    }

    #[test]
    fn dac_short_write_and_read_are_noops() {
        let wave = SquareWave::new(100);
        let chan = DacChannel::new(&wave);

        assert_eq!(chan.write(id(2), &[7]), Ok(1));
        assert_eq!(chan.write(id(2), &[]), Ok(0));
        assert_eq!(wave.amplitude(), 100);

        let mut buf = [0xAAu8; 2];
        assert_eq!(chan.read(id(2), &mut buf), Ok(0));
        assert_eq!(buf, [0xAA, 0xAA]);
        chan.release(id(2));
    }
}
