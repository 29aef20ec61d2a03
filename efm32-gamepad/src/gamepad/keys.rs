//! Client-side decoding of the raw gamepad byte.
//!
//! The channel hands out the port C input byte untouched. Inputs are pulled
//! up, so a pressed button reads as a cleared bit.

use crate::constants::BUTTON_COUNT;

use super::latch::InputLatch;

/// One gamepad switch, numbered by the port C pin it is wired to.
///
/// SW1–SW4 form the left cross (left, up, right, down), SW5–SW8 the right.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Button {
    Sw1 = 0,
    Sw2 = 1,
    Sw3 = 2,
    Sw4 = 3,
    Sw5 = 4,
    Sw6 = 5,
    Sw7 = 6,
    Sw8 = 7,
}

impl Button {
    pub const ALL: [Button; BUTTON_COUNT] = [
        Button::Sw1,
        Button::Sw2,
        Button::Sw3,
        Button::Sw4,
        Button::Sw5,
        Button::Sw6,
        Button::Sw7,
        Button::Sw8,
    ];

    /// Bit of this button in the raw byte.
    #[inline]
    pub const fn mask(self) -> u8 {
        1 << self as u8
    }
}

/// Set of pressed buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Buttons(u8);

impl Buttons {
    /// Decode a raw active-low sample.
    pub const fn from_raw(raw: u8) -> Self {
        Buttons(!raw)
    }

    pub const fn bits(self) -> u8 {
        self.0
    }

    pub const fn is_pressed(self, button: Button) -> bool {
        self.0 & button.mask() != 0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Pressed buttons in pin order.
    pub fn iter(self) -> impl Iterator<Item = Button> {
        Button::ALL.into_iter().filter(move |&b| self.is_pressed(b))
    }

    /// Buttons pressed in `self` but not in `previous`.
    pub const fn newly_pressed(self, previous: Buttons) -> Buttons {
        Buttons(self.0 & !previous.0)
    }
}

/// One button viewed as a digital input pin over the live latch.
///
/// The pin reports the electrical level: low while pressed.
pub struct ButtonPin<'a> {
    latch: &'a InputLatch,
    button: Button,
}

impl<'a> ButtonPin<'a> {
    pub fn new(latch: &'a InputLatch, button: Button) -> Self {
        ButtonPin { latch, button }
    }

    pub fn button(&self) -> Button {
        self.button
    }

    fn level_high(&self) -> bool {
        self.latch.load() & self.button.mask() != 0
    }
}

#[cfg(feature = "hal")]
impl embedded_hal::digital::ErrorType for ButtonPin<'_> {
    type Error = core::convert::Infallible;
}

#[cfg(feature = "hal")]
impl embedded_hal::digital::InputPin for ButtonPin<'_> {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        Ok(self.level_high())
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        Ok(!self.level_high())
    }
}
