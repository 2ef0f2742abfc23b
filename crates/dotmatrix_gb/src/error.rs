use thiserror::Error;

use crate::interrupts::Interrupt;

/// Fatal conditions for an emulation session.
///
/// None of these are recoverable: once one is returned the machine state is
/// no longer cycle-consistent and the session should be stopped.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EmulationError {
    #[error("undefined opcode 0x{opcode:02X} at 0x{addr:04X}")]
    UndefinedOpcode { opcode: u8, addr: u16 },

    #[error("invalid bank switch: bank {bank} selected but the cartridge has {available} banks")]
    InvalidBankSwitch { bank: u16, available: u16 },

    #[error("out-of-bounds access at 0x{addr:04X}")]
    OutOfBoundsAddressAccess { addr: u16 },

    #[error("interrupt dispatch for {interrupt:?} cleared request bits 0x{cleared:02X}")]
    InterruptPriorityViolation { interrupt: Interrupt, cleared: u8 },

    #[error("unsupported cartridge type 0x{0:02X}")]
    UnsupportedCartridge(u8),

    #[error("ROM image too small to hold a cartridge header ({0} bytes)")]
    RomTooSmall(usize),

    #[error("boot ROM must be exactly 256 bytes, got {0}")]
    InvalidBootRom(usize),
}

pub type EmulationResult<T> = Result<T, EmulationError>;
