use super::super::GameBoyBus;

impl GameBoyBus {
    pub(super) fn write8_mmio_impl(&mut self, addr: u16, value: u8) {
        match addr {
            // ROM is read-only; writes program the mapper.
            0x0000..=0x7FFF => {
                let result = self.cartridge.write_rom(addr, value);
                self.latch(result, ());
            }

            0x8000..=0x9FFF => self.ppu.write_vram(addr, value),

            0xA000..=0xBFFF => {
                let result = self.cartridge.write_ram(addr, value);
                self.latch(result, ());
            }

            0xC000..=0xDFFF => self.wram[(addr - 0xC000) as usize] = value,
            0xE000..=0xFDFF => self.wram[(addr - 0xE000) as usize] = value,

            0xFE00..=0xFE9F => self.ppu.write_oam(addr - 0xFE00, value),
            0xFEA0..=0xFEFF => {}

            0xFF00 => self.joypad.write(value),
            0xFF04..=0xFF07 => self.timer.write(addr, value),
            0xFF0F => self.interrupts.write_if(value),
            0xFF46 => self.dma.start(value),
            0xFF40..=0xFF4B => self.ppu.write_register(addr, value),

            // Boot ROM disable. One-shot: once dropped it stays unmapped.
            0xFF50 => {
                if value != 0 && self.boot_rom.take().is_some() {
                    log::info!("GB: boot ROM unmapped");
                }
            }

            0xFF01..=0xFF02 | 0xFF10..=0xFF3F => self.io[(addr - 0xFF00) as usize] = value,

            0xFF80..=0xFFFE => self.hram[(addr - 0xFF80) as usize] = value,
            0xFFFF => self.interrupts.write_ie(value),

            0xFF03..=0xFF7F => {}
        }
    }
}
