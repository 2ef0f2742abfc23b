use super::super::GameBoyBus;

impl GameBoyBus {
    pub(super) fn read8_mmio_impl(&mut self, addr: u16) -> u8 {
        match addr {
            // Boot ROM (while mapped) then cartridge ROM through the mapper.
            0x0000..=0x7FFF => self.read_rom(addr),

            // VRAM reads $FF while the PPU is drawing.
            0x8000..=0x9FFF => self.ppu.read_vram(addr),

            0xA000..=0xBFFF => {
                let result = self.cartridge.read_ram(addr);
                self.latch(result, 0xFF)
            }

            0xC000..=0xDFFF => self.wram[(addr - 0xC000) as usize],

            // Echo RAM mirrors $C000-$DDFF.
            0xE000..=0xFDFF => self.wram[(addr - 0xE000) as usize],

            0xFE00..=0xFE9F => self.ppu.read_oam(addr - 0xFE00),

            // Unusable area.
            0xFEA0..=0xFEFF => 0xFF,

            0xFF00 => self.joypad.read(),
            0xFF04..=0xFF07 => self.timer.read(addr),
            0xFF0F => self.interrupts.read_if(),
            0xFF46 => self.dma.register(),
            0xFF40..=0xFF4B => self.ppu.read_register(addr),

            // Serial and audio: plain storage.
            0xFF01..=0xFF02 | 0xFF10..=0xFF3F => self.io[(addr - 0xFF00) as usize],

            0xFF80..=0xFFFE => self.hram[(addr - 0xFF80) as usize],
            0xFFFF => self.interrupts.read_ie(),

            // Unmapped IO (including $FF50).
            0xFF03..=0xFF7F => 0xFF,
        }
    }
}
