//! Cartridge ROM/RAM and the bank-switching mappers.
mod header;
mod mbc1;
mod mbc3;
mod mbc5;

pub(crate) use header::CartridgeHeader;
use mbc1::Mbc1;
use mbc3::Mbc3;
use mbc5::Mbc5;

use crate::error::{EmulationError, EmulationResult};

pub(super) const ROM_BANK_SIZE: usize = 0x4000;
pub(super) const RAM_BANK_SIZE: usize = 0x2000;

/// Backing storage shared by every mapper.
pub(super) struct Storage {
    rom: Vec<u8>,
    ram: Vec<u8>,
    strict_banks: bool,
}

impl Storage {
    #[inline]
    pub(super) fn rom_banks(&self) -> u16 {
        (self.rom.len() / ROM_BANK_SIZE) as u16
    }

    #[inline]
    pub(super) fn ram_banks(&self) -> usize {
        self.ram.len().div_ceil(RAM_BANK_SIZE)
    }

    #[inline]
    pub(super) fn has_ram(&self) -> bool {
        !self.ram.is_empty()
    }

    pub(super) fn read_rom(&self, bank: u16, addr: u16) -> EmulationResult<u8> {
        let index = bank as usize * ROM_BANK_SIZE + (addr as usize & (ROM_BANK_SIZE - 1));
        self.rom
            .get(index)
            .copied()
            .ok_or(EmulationError::OutOfBoundsAddressAccess { addr })
    }

    /// Validate a ROM bank number written to a mapper register.
    pub(super) fn select_rom_bank(&self, requested: u16) -> EmulationResult<u16> {
        let available = self.rom_banks();
        if requested < available {
            return Ok(requested);
        }
        if self.strict_banks {
            return Err(EmulationError::InvalidBankSwitch {
                bank: requested,
                available,
            });
        }
        let wrapped = requested % available;
        log::warn!("GB cart: ROM bank {requested} out of range ({available} banks), using {wrapped}");
        Ok(wrapped)
    }

    /// Location of `addr` ($A000-$BFFF) in RAM bank `bank`. Banks wrap over
    /// the RAM that exists and carts with 2 KiB mirror it across the window.
    fn ram_index(&self, bank: usize, addr: u16) -> usize {
        let window = self.ram.len().min(RAM_BANK_SIZE);
        let offset = (addr as usize - 0xA000) % window;
        (bank % self.ram_banks()) * RAM_BANK_SIZE + offset
    }

    /// Unmapped or disabled RAM reads as $FF.
    pub(super) fn read_ram(&self, bank: usize, addr: u16) -> EmulationResult<u8> {
        if !self.has_ram() {
            return Ok(0xFF);
        }
        let index = self.ram_index(bank, addr);
        self.ram
            .get(index)
            .copied()
            .ok_or(EmulationError::OutOfBoundsAddressAccess { addr })
    }

    pub(super) fn write_ram(&mut self, bank: usize, addr: u16, value: u8) -> EmulationResult<()> {
        if !self.has_ram() {
            return Ok(());
        }
        let index = self.ram_index(bank, addr);
        let slot = self
            .ram
            .get_mut(index)
            .ok_or(EmulationError::OutOfBoundsAddressAccess { addr })?;
        *slot = value;
        Ok(())
    }
}

enum Mapper {
    /// No mapper; optional RAM is always enabled.
    RomOnly,
    Mbc1(Mbc1),
    Mbc3(Mbc3),
    Mbc5(Mbc5),
}

pub(super) struct Cartridge {
    header: Option<CartridgeHeader>,
    storage: Storage,
    mapper: Mapper,
}

impl Cartridge {
    /// Empty slot: the whole ROM window reads $FF.
    pub(super) fn empty() -> Self {
        Self {
            header: None,
            storage: Storage {
                rom: vec![0xFF; 2 * ROM_BANK_SIZE],
                ram: Vec::new(),
                strict_banks: false,
            },
            mapper: Mapper::RomOnly,
        }
    }

    pub(super) fn from_rom(rom: &[u8], strict_banks: bool) -> EmulationResult<Self> {
        let header = CartridgeHeader::parse(rom)?;
        let mapper = match header.cartridge_type {
            0x00 | 0x08 | 0x09 => Mapper::RomOnly,
            0x01..=0x03 => Mapper::Mbc1(Mbc1::new()),
            0x0F..=0x13 => Mapper::Mbc3(Mbc3::new()),
            0x19..=0x1E => Mapper::Mbc5(Mbc5::new()),
            other => return Err(EmulationError::UnsupportedCartridge(other)),
        };

        if rom.len() != header.rom_size() {
            log::warn!(
                "GB cart: header declares {} bytes of ROM, image has {}",
                header.rom_size(),
                rom.len()
            );
        }

        // Pad to whole banks so every bank index below `rom_banks` is
        // backed by data.
        let mut rom = rom.to_vec();
        let padded_len = rom.len().div_ceil(ROM_BANK_SIZE).max(2) * ROM_BANK_SIZE;
        if padded_len != rom.len() {
            log::warn!(
                "GB cart: ROM is {} bytes, padding to {} with 0xFF",
                rom.len(),
                padded_len
            );
            rom.resize(padded_len, 0xFF);
        }
        let ram = vec![0xFF; header.ram_size()];

        log::info!(
            "GB cart: \"{}\" type=0x{:02X} rom_banks={} ram={} bytes",
            header.title,
            header.cartridge_type,
            rom.len() / ROM_BANK_SIZE,
            ram.len()
        );

        Ok(Self {
            header: Some(header),
            storage: Storage {
                rom,
                ram,
                strict_banks,
            },
            mapper,
        })
    }

    pub(super) fn header(&self) -> Option<&CartridgeHeader> {
        self.header.as_ref()
    }

    pub(super) fn read_rom(&self, addr: u16) -> EmulationResult<u8> {
        let bank = match &self.mapper {
            Mapper::RomOnly => u16::from(addr >= 0x4000),
            Mapper::Mbc1(m) => m.rom_bank(addr, &self.storage),
            Mapper::Mbc3(m) => m.rom_bank(addr),
            Mapper::Mbc5(m) => m.rom_bank(addr),
        };
        self.storage.read_rom(bank, addr)
    }

    /// Writes to $0000-$7FFF program the mapper registers.
    pub(super) fn write_rom(&mut self, addr: u16, value: u8) -> EmulationResult<()> {
        match &mut self.mapper {
            Mapper::RomOnly => Ok(()),
            Mapper::Mbc1(m) => m.write_register(addr, value, &self.storage),
            Mapper::Mbc3(m) => m.write_register(addr, value, &self.storage),
            Mapper::Mbc5(m) => m.write_register(addr, value, &self.storage),
        }
    }

    pub(super) fn read_ram(&self, addr: u16) -> EmulationResult<u8> {
        match &self.mapper {
            Mapper::RomOnly => self.storage.read_ram(0, addr),
            Mapper::Mbc1(m) => match m.ram_bank() {
                Some(bank) => self.storage.read_ram(bank, addr),
                None => Ok(0xFF),
            },
            Mapper::Mbc3(m) => match m.ram_bank() {
                Some(bank) => self.storage.read_ram(bank, addr),
                None => Ok(0xFF),
            },
            Mapper::Mbc5(m) => match m.ram_bank() {
                Some(bank) => self.storage.read_ram(bank, addr),
                None => Ok(0xFF),
            },
        }
    }

    pub(super) fn write_ram(&mut self, addr: u16, value: u8) -> EmulationResult<()> {
        let bank = match &self.mapper {
            Mapper::RomOnly => Some(0),
            Mapper::Mbc1(m) => m.ram_bank(),
            Mapper::Mbc3(m) => m.ram_bank(),
            Mapper::Mbc5(m) => m.ram_bank(),
        };
        match bank {
            Some(bank) => self.storage.write_ram(bank, addr, value),
            None => Ok(()),
        }
    }
}
