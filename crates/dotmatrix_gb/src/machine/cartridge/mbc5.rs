use super::Storage;
use crate::error::EmulationResult;

/// MBC5: 9-bit ROM bank (bank 0 selectable in the upper window) and 4-bit
/// RAM bank. Rumble is not modelled.
pub(super) struct Mbc5 {
    ram_enable: bool,
    bank_low8: u8,
    bank_high1: u8,
    ram_bank: u8,
    rom_bank: u16,
}

impl Mbc5 {
    pub(super) fn new() -> Self {
        Self {
            ram_enable: false,
            bank_low8: 1,
            bank_high1: 0,
            ram_bank: 0,
            rom_bank: 1,
        }
    }

    pub(super) fn rom_bank(&self, addr: u16) -> u16 {
        if addr < 0x4000 {
            0
        } else {
            self.rom_bank
        }
    }

    pub(super) fn ram_bank(&self) -> Option<usize> {
        self.ram_enable.then_some(self.ram_bank as usize)
    }

    pub(super) fn write_register(&mut self, addr: u16, value: u8, storage: &Storage) -> EmulationResult<()> {
        match addr {
            0x0000..=0x1FFF => self.ram_enable = value & 0x0F == 0x0A,
            0x2000..=0x2FFF => {
                self.bank_low8 = value;
                self.update_rom_bank(storage)?;
            }
            0x3000..=0x3FFF => {
                self.bank_high1 = value & 0x01;
                self.update_rom_bank(storage)?;
            }
            0x4000..=0x5FFF => self.ram_bank = value & 0x0F,
            _ => {}
        }
        Ok(())
    }

    fn update_rom_bank(&mut self, storage: &Storage) -> EmulationResult<()> {
        let requested = ((self.bank_high1 as u16) << 8) | self.bank_low8 as u16;
        self.rom_bank = storage.select_rom_bank(requested)?;
        Ok(())
    }
}
