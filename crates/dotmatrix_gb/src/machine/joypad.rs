use crate::interrupts::{Interrupt, InterruptController};

/// The eight DMG buttons.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Button {
    Right,
    Left,
    Up,
    Down,
    A,
    B,
    Select,
    Start,
}

impl Button {
    /// (is d-pad, bit in the P1 low nibble)
    #[inline]
    fn line(self) -> (bool, u8) {
        match self {
            Button::Right => (true, 0),
            Button::Left => (true, 1),
            Button::Up => (true, 2),
            Button::Down => (true, 3),
            Button::A => (false, 0),
            Button::B => (false, 1),
            Button::Select => (false, 2),
            Button::Start => (false, 3),
        }
    }
}

/// P1 ($FF00) state. Pressed buttons are stored as 1 bits and inverted on
/// read.
pub(super) struct Joypad {
    /// P1 bits 5 (buttons) and 4 (d-pad); 0 selects the group.
    select: u8,
    buttons: u8,
    dpad: u8,
}

impl Joypad {
    pub(super) fn new() -> Self {
        Self {
            select: 0x30,
            buttons: 0,
            dpad: 0,
        }
    }

    pub(super) fn read(&self) -> u8 {
        let mut low = 0x0F;
        if self.select & 0x10 == 0 {
            low &= !self.dpad;
        }
        if self.select & 0x20 == 0 {
            low &= !self.buttons;
        }
        0xC0 | self.select | (low & 0x0F)
    }

    /// Only the two select bits are writable.
    pub(super) fn write(&mut self, value: u8) {
        self.select = value & 0x30;
    }

    pub(super) fn set_button(
        &mut self,
        button: Button,
        pressed: bool,
        interrupts: &mut InterruptController,
    ) {
        let (dpad, bit) = button.line();
        // The interrupt fires on a P1 line going low, so the group has to
        // be selected.
        let line = if dpad { 0x10 } else { 0x20 };
        let selected = self.select & line == 0;
        let group = if dpad { &mut self.dpad } else { &mut self.buttons };
        let mask = 1u8 << bit;
        if pressed {
            if *group & mask == 0 && selected {
                interrupts.request(Interrupt::Input);
            }
            *group |= mask;
        } else {
            *group &= !mask;
        }
    }
}
