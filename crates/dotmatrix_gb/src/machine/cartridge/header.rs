use crate::error::{EmulationError, EmulationResult};

/// Fields read from the cartridge header at $0134-$014F.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct CartridgeHeader {
    pub title: String,
    pub cartridge_type: u8,
    pub rom_size_code: u8,
    pub ram_size_code: u8,
}

impl CartridgeHeader {
    pub(crate) fn parse(rom: &[u8]) -> EmulationResult<Self> {
        if rom.len() < 0x150 {
            return Err(EmulationError::RomTooSmall(rom.len()));
        }
        let title = rom[0x134..=0x143]
            .iter()
            .take_while(|&&b| b != 0)
            .map(|&b| if b.is_ascii_graphic() || b == b' ' { b as char } else { '?' })
            .collect::<String>()
            .trim_end()
            .to_string();

        Ok(Self {
            title,
            cartridge_type: rom[0x147],
            rom_size_code: rom[0x148],
            ram_size_code: rom[0x149],
        })
    }

    /// External RAM in bytes as declared by $0149.
    pub(crate) fn ram_size(&self) -> usize {
        match self.ram_size_code {
            0x01 => 0x800,
            0x02 => 0x2000,
            0x03 => 0x8000,
            0x04 => 0x20000,
            0x05 => 0x10000,
            _ => 0,
        }
    }

    /// ROM size declared by $0148 (32 KiB << code).
    pub(crate) fn rom_size(&self) -> usize {
        0x8000usize << self.rom_size_code.min(8)
    }
}
