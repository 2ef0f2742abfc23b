use super::GameBoyBus;

/// Audio register values left by the DMG boot ROM ($FF10-$FF26).
const POST_BOOT_AUDIO: [(u16, u8); 21] = [
    (0xFF10, 0x80),
    (0xFF11, 0xBF),
    (0xFF12, 0xF3),
    (0xFF13, 0xFF),
    (0xFF14, 0xBF),
    (0xFF16, 0x3F),
    (0xFF17, 0x00),
    (0xFF18, 0xFF),
    (0xFF19, 0xBF),
    (0xFF1A, 0x7F),
    (0xFF1B, 0xFF),
    (0xFF1C, 0x9F),
    (0xFF1D, 0xFF),
    (0xFF1E, 0xBF),
    (0xFF20, 0xFF),
    (0xFF21, 0x00),
    (0xFF22, 0x00),
    (0xFF23, 0xBF),
    (0xFF24, 0x77),
    (0xFF25, 0xF3),
    (0xFF26, 0xF1),
];

impl GameBoyBus {
    /// IO state at PC=$0100 after the DMG boot ROM (Pan Docs, "Power Up
    /// Sequence").
    pub(super) fn apply_dmg_post_boot_io_state(&mut self) {
        // P1 with both groups selected reads $CF.
        self.joypad.write(0x00);

        self.io[0x01] = 0x00; // SB
        self.io[0x02] = 0x7E; // SC

        self.timer.init_dmg();

        // VBlank is already requested when the boot ROM hands over.
        self.interrupts.write_if(0x01);
        self.interrupts.write_ie(0x00);

        for (addr, value) in POST_BOOT_AUDIO {
            self.io[(addr - 0xFF00) as usize] = value;
        }

        self.ppu.write_register(0xFF42, 0x00); // SCY
        self.ppu.write_register(0xFF43, 0x00); // SCX
        self.ppu.write_register(0xFF45, 0x00); // LYC
        self.ppu.write_register(0xFF47, 0xFC); // BGP
        self.ppu.write_register(0xFF4A, 0x00); // WY
        self.ppu.write_register(0xFF4B, 0x00); // WX
        self.ppu.write_register(0xFF41, 0x00); // STAT selects
        self.ppu.write_register(0xFF40, 0x91); // LCDC: LCD on, BG on
    }

    /// IO state at reset, before a boot ROM runs: everything cleared and
    /// the LCD off.
    pub(super) fn apply_power_on_io_state(&mut self) {
        self.io = [0; super::IO_SIZE];
        self.interrupts.write_if(0x00);
        self.interrupts.write_ie(0x00);
    }

    /// Fill WRAM and HRAM with a fixed-seed xorshift pattern. Real hardware
    /// powers up with noise there; a fixed seed keeps runs reproducible.
    pub(super) fn randomize_internal_ram(&mut self) {
        let mut x: u32 = 0xC0DE_1234;
        let mut next_byte = || {
            x ^= x << 13;
            x ^= x >> 17;
            x ^= x << 5;
            x as u8
        };

        for byte in self.wram.iter_mut() {
            *byte = next_byte();
        }
        for byte in self.hram.iter_mut() {
            *byte = next_byte();
        }
    }
}
