use typed_builder::TypedBuilder;

use crate::error::{EmulationError, EmulationResult};

/// Size of the DMG boot ROM mapped at $0000-$00FF.
pub const BOOT_ROM_SIZE: usize = 0x100;

/// Session-wide settings for a [`GameBoy`](crate::GameBoy).
///
/// ```
/// use dotmatrix_gb::GameBoyConfig;
///
/// let config = GameBoyConfig::builder().randomize_ram(false).build();
/// assert!(config.boot_rom.is_none());
/// ```
#[derive(Debug, Clone, TypedBuilder)]
pub struct GameBoyConfig {
    /// Optional 256-byte boot ROM. Without one the machine starts in the
    /// documented post-boot state at PC=$0100.
    #[builder(default, setter(strip_option))]
    pub boot_rom: Option<Vec<u8>>,

    /// Fill WRAM/HRAM with a fixed pseudo-random pattern at power-on.
    #[builder(default = true)]
    pub randomize_ram: bool,

    /// Treat ROM bank selects past the end of the cartridge as fatal. When
    /// disabled the bank number wraps around the available banks.
    #[builder(default = true)]
    pub strict_bank_switch: bool,
}

impl Default for GameBoyConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl GameBoyConfig {
    pub(crate) fn validate(&self) -> EmulationResult<()> {
        match &self.boot_rom {
            Some(rom) if rom.len() != BOOT_ROM_SIZE => Err(EmulationError::InvalidBootRom(rom.len())),
            _ => Ok(()),
        }
    }
}
