use super::Storage;
use crate::error::EmulationResult;

/// MBC1: 5-bit ROM bank register plus a 2-bit register that either extends
/// the ROM bank (carts over 512 KiB) or selects the RAM bank in mode 1.
pub(super) struct Mbc1 {
    ram_enable: bool,
    bank_low5: u8,
    bank_high2: u8,
    /// Banking mode select ($6000-$7FFF).
    advanced_mode: bool,
    /// Resolved bank for $4000-$7FFF.
    rom_bank: u16,
}

impl Mbc1 {
    pub(super) fn new() -> Self {
        Self {
            ram_enable: false,
            bank_low5: 1,
            bank_high2: 0,
            advanced_mode: false,
            rom_bank: 1,
        }
    }

    /// The upper register only reaches the ROM lines on carts with more
    /// than 32 banks.
    #[inline]
    fn high_rom_bits(&self, storage: &Storage) -> u16 {
        if storage.rom_banks() > 32 {
            (self.bank_high2 as u16) << 5
        } else {
            0
        }
    }

    pub(super) fn rom_bank(&self, addr: u16, storage: &Storage) -> u16 {
        if addr >= 0x4000 {
            return self.rom_bank;
        }
        if self.advanced_mode {
            self.high_rom_bits(storage) % storage.rom_banks()
        } else {
            0
        }
    }

    pub(super) fn ram_bank(&self) -> Option<usize> {
        if !self.ram_enable {
            return None;
        }
        Some(if self.advanced_mode {
            self.bank_high2 as usize
        } else {
            0
        })
    }

    fn update_rom_bank(&mut self, storage: &Storage) -> EmulationResult<()> {
        let requested = self.high_rom_bits(storage) | self.bank_low5 as u16;
        self.rom_bank = storage.select_rom_bank(requested)?;
        Ok(())
    }

    pub(super) fn write_register(&mut self, addr: u16, value: u8, storage: &Storage) -> EmulationResult<()> {
        match addr {
            0x0000..=0x1FFF => self.ram_enable = value & 0x0F == 0x0A,
            0x2000..=0x3FFF => {
                // Bank 0 cannot be selected here; it maps to 1.
                self.bank_low5 = (value & 0x1F).max(1);
                self.update_rom_bank(storage)?;
            }
            0x4000..=0x5FFF => {
                self.bank_high2 = value & 0x03;
                self.update_rom_bank(storage)?;
            }
            _ => self.advanced_mode = value & 0x01 != 0,
        }
        Ok(())
    }
}
