use super::cartridge::{Cartridge, CartridgeHeader};
use super::dma::OamDma;
use super::joypad::{Button, Joypad};
use super::ppu::Ppu;
use super::timer::Timer;
use crate::config::GameBoyConfig;
use crate::error::{EmulationError, EmulationResult};
use crate::interrupts::InterruptController;

mod init;
mod mmio;
mod traits;

const WRAM_SIZE: usize = 0x2000;
const HRAM_SIZE: usize = 0x7F;
const IO_SIZE: usize = 0x80;

/// Everything the CPU can address, plus the devices that run alongside it.
pub(crate) struct GameBoyBus {
    cartridge: Cartridge,
    /// Mapped over $0000-$00FF until a non-zero write to $FF50. Dropping it
    /// is the unmap, so it cannot come back.
    boot_rom: Option<Vec<u8>>,
    wram: Box<[u8; WRAM_SIZE]>,
    hram: [u8; HRAM_SIZE],
    /// Audio and serial registers, stored without behaviour.
    io: [u8; IO_SIZE],
    pub(crate) interrupts: InterruptController,
    timer: Timer,
    joypad: Joypad,
    pub(crate) ppu: Ppu,
    dma: OamDma,
    /// First mapper/bus error since the driver last checked.
    fault: Option<EmulationError>,
}

impl GameBoyBus {
    pub(crate) fn new(config: &GameBoyConfig) -> Self {
        let mut bus = Self {
            cartridge: Cartridge::empty(),
            boot_rom: config.boot_rom.clone(),
            wram: Box::new([0; WRAM_SIZE]),
            hram: [0; HRAM_SIZE],
            io: [0; IO_SIZE],
            interrupts: InterruptController::new(),
            timer: Timer::new(),
            joypad: Joypad::new(),
            ppu: Ppu::new(),
            dma: OamDma::new(),
            fault: None,
        };
        if config.randomize_ram {
            bus.randomize_internal_ram();
        }
        if bus.boot_rom.is_some() {
            bus.apply_power_on_io_state();
        } else {
            bus.apply_dmg_post_boot_io_state();
        }
        bus
    }

    pub(super) fn insert_cartridge(&mut self, cartridge: Cartridge) {
        self.cartridge = cartridge;
    }

    pub(super) fn cartridge_header(&self) -> Option<&CartridgeHeader> {
        self.cartridge.header()
    }

    #[inline]
    pub(crate) fn boot_rom_mapped(&self) -> bool {
        self.boot_rom.is_some()
    }

    /// Run the timer, OAM DMA and PPU for `cycles` T-cycles, in that order
    /// within each cycle.
    pub(crate) fn advance(&mut self, cycles: u32) {
        for _ in 0..cycles {
            self.timer.tick_tcycle(&mut self.interrupts);
            if let Some((source, offset)) = self.dma.tick() {
                let value = self.dma_source_read(source);
                self.ppu.dma_write_oam(offset, value);
            }
            self.ppu.tick(&mut self.interrupts);
        }
    }

    #[cfg(test)]
    pub(crate) fn dma_active(&self) -> bool {
        self.dma.is_active()
    }

    pub(crate) fn set_button(&mut self, button: Button, pressed: bool) {
        self.joypad.set_button(button, pressed, &mut self.interrupts);
    }

    /// The CPU left STOP; let the divider run again.
    pub(crate) fn leave_stop(&mut self) {
        self.timer.leave_stop();
    }

    pub(crate) fn take_fault(&mut self) -> Option<EmulationError> {
        self.fault.take()
    }

    /// Unwrap a mapper result, keeping the first error for the driver.
    fn latch<T>(&mut self, result: EmulationResult<T>, fallback: T) -> T {
        match result {
            Ok(value) => value,
            Err(err) => {
                if self.fault.is_none() {
                    self.fault = Some(err);
                }
                fallback
            }
        }
    }

    /// Source-side read for OAM DMA. Ignores the DMA bus lock and the PPU
    /// mode; $E000-$FFFF reads the WRAM echo.
    fn dma_source_read(&mut self, addr: u16) -> u8 {
        match addr {
            0x0000..=0x7FFF => self.read_rom(addr),
            0x8000..=0x9FFF => self.ppu.dma_read_vram(addr),
            0xA000..=0xBFFF => {
                let result = self.cartridge.read_ram(addr);
                self.latch(result, 0xFF)
            }
            _ => self.wram[(addr as usize - 0xC000) & (WRAM_SIZE - 1)],
        }
    }

    fn read_rom(&mut self, addr: u16) -> u8 {
        if let Some(boot) = &self.boot_rom {
            if let Some(&value) = boot.get(addr as usize) {
                return value;
            }
        }
        let result = self.cartridge.read_rom(addr);
        self.latch(result, 0xFF)
    }
}
