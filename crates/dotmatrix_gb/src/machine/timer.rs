//! DIV/TIMA/TMA/TAC.
//!
//! A 16-bit divider runs once per T-cycle and DIV exposes bits 15..8. TIMA
//! counts falling edges of the divider bit selected by TAC, following the
//! state machine from Pandocs' "Timer obscure behaviour".
mod io;

use crate::interrupts::{Interrupt, InterruptController};

pub(super) struct Timer {
    /// Hidden system counter; DIV exposes its upper bits.
    internal_counter: u16,
    tima: u8,
    tma: u8,
    /// TAC raw value (lower 3 bits meaningful).
    tac: u8,
    /// TIMA overflowed on the previous cycle; the next cycle reloads TMA and
    /// requests the interrupt.
    overflow: bool,
    /// Frozen while the CPU is in STOP.
    frozen: bool,
}

impl Timer {
    pub(super) fn new() -> Self {
        Self {
            internal_counter: 0,
            tima: 0,
            tma: 0,
            tac: 0,
            overflow: false,
            frozen: false,
        }
    }

    /// DMG state at PC=$0100: DIV reads back as $AB.
    pub(super) fn init_dmg(&mut self) {
        *self = Self::new();
        self.internal_counter = 0xABCC;
    }

    #[inline]
    fn enabled(&self) -> bool {
        self.tac & 0x04 != 0
    }

    /// Divider bit watched by TIMA: TAC 00 -> bit 9, 01 -> bit 3,
    /// 10 -> bit 5, 11 -> bit 7.
    #[inline]
    fn counter_bit(&self) -> bool {
        let mask = match self.tac & 0x03 {
            0x00 => 1u16 << 9,
            0x01 => 1u16 << 3,
            0x02 => 1u16 << 5,
            _ => 1u16 << 7,
        };
        self.internal_counter & mask != 0
    }

    #[inline]
    fn increment_tima(&mut self) {
        let (next, overflow) = self.tima.overflowing_add(1);
        self.tima = next;
        if overflow {
            self.overflow = true;
        }
    }

    /// Advance by one T-cycle.
    pub(super) fn tick_tcycle(&mut self, interrupts: &mut InterruptController) {
        if self.frozen {
            return;
        }
        if self.overflow {
            self.tima = self.tma;
            self.overflow = false;
            interrupts.request(Interrupt::Timer);
        }

        let old_bit = self.enabled() && self.counter_bit();
        self.internal_counter = self.internal_counter.wrapping_add(1);
        let new_bit = self.enabled() && self.counter_bit();
        if old_bit && !new_bit {
            self.increment_tima();
        }
    }

    /// STOP resets the divider and holds it until the CPU wakes.
    pub(super) fn enter_stop(&mut self) {
        self.reset_divider();
        self.frozen = true;
    }

    pub(super) fn leave_stop(&mut self) {
        self.frozen = false;
    }

    /// Clear the divider; a falling edge on the selected bit counts.
    fn reset_divider(&mut self) {
        if self.enabled() && self.counter_bit() {
            self.increment_tima();
        }
        self.internal_counter = 0;
    }

    #[cfg(test)]
    pub(super) fn internal_counter(&self) -> u16 {
        self.internal_counter
    }
}
