//! Sharp LR35902 CPU core.
//!
//! `Cpu::step` is the only driver of emulated time: each call performs one
//! of {service one interrupt, execute one instruction, idle in a low-power
//! mode} and returns the number of T-cycles that consumed.

mod alu;
mod bus;
mod cb;
mod exec;
mod helpers;
mod init;
mod interrupts;
mod regs;
mod step;
mod table;

pub use bus::Bus;
pub use regs::{Flag, Registers};

use crate::error::EmulationError;

/// CPU power state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PowerMode {
    #[default]
    Running,
    /// Entered by HALT. Left as soon as `IE & IF` is non-zero.
    Halted,
    /// Entered by STOP. Left only when a joypad line in P1 reads low.
    Stopped,
}

pub struct Cpu {
    pub regs: Registers,
    pub ime: bool,
    mode: PowerMode,
    /// Set by HALT with IME=0 and an interrupt already pending: the next
    /// opcode fetch does not increment PC.
    halt_bug: bool,
    ime_enable_pending: bool,
    ime_enable_delay: bool,
    /// Fatal error latched by a previous step. While set, `step` keeps
    /// returning it.
    fault: Option<EmulationError>,
}

impl Cpu {
    #[inline]
    pub fn get_flag(&self, flag: Flag) -> bool {
        let bit = flag as u8;
        (self.regs.f & (1 << bit)) != 0
    }

    #[inline]
    pub fn set_flag(&mut self, flag: Flag, value: bool) {
        let bit = flag as u8;
        if value {
            self.regs.f |= 1 << bit;
        } else {
            self.regs.f &= !(1 << bit);
        }
    }

    #[inline]
    pub fn clear_flags(&mut self) {
        self.regs.f = 0;
    }

    #[inline]
    pub fn mode(&self) -> PowerMode {
        self.mode
    }

    #[inline]
    pub fn is_halted(&self) -> bool {
        self.mode == PowerMode::Halted
    }

    #[inline]
    pub fn is_stopped(&self) -> bool {
        self.mode == PowerMode::Stopped
    }

    /// The fatal error that locked this CPU, if any.
    #[inline]
    pub fn fault(&self) -> Option<&EmulationError> {
        self.fault.as_ref()
    }
}
