use super::Storage;
use crate::error::EmulationResult;

/// MBC3 without the real-time clock. RTC register selects ($08-$0C) leave
/// the RAM window unmapped.
pub(super) struct Mbc3 {
    ram_enable: bool,
    rom_bank: u16,
    /// RAM bank (0-3) or RTC register select.
    ram_select: u8,
}

impl Mbc3 {
    pub(super) fn new() -> Self {
        Self {
            ram_enable: false,
            rom_bank: 1,
            ram_select: 0,
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
        (self.ram_enable && self.ram_select <= 0x03).then_some(self.ram_select as usize)
    }

    pub(super) fn write_register(&mut self, addr: u16, value: u8, storage: &Storage) -> EmulationResult<()> {
        match addr {
            0x0000..=0x1FFF => self.ram_enable = value & 0x0F == 0x0A,
            0x2000..=0x3FFF => {
                let requested = (value & 0x7F).max(1) as u16;
                self.rom_bank = storage.select_rom_bank(requested)?;
            }
            0x4000..=0x5FFF => self.ram_select = value,
            // Clock latch; no RTC to latch.
            _ => {}
        }
        Ok(())
    }
}
