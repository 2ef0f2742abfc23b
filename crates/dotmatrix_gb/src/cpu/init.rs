use super::{Cpu, PowerMode, Registers};

impl Default for Cpu {
    fn default() -> Self {
        Self::new()
    }
}

impl Cpu {
    /// CPU in the state the DMG boot ROM leaves behind at $0100.
    pub fn new() -> Self {
        let mut cpu = Self::power_on();
        cpu.apply_dmg_boot_state();
        cpu
    }

    /// CPU as it comes out of reset: all registers cleared, PC=$0000. Used
    /// when a real boot ROM is mapped and will do the initialisation itself.
    pub fn power_on() -> Self {
        Self {
            regs: Registers::default(),
            ime: false,
            mode: PowerMode::Running,
            halt_bug: false,
            ime_enable_pending: false,
            ime_enable_delay: false,
            fault: None,
        }
    }

    /// Register values after the DMG boot ROM hands over to the cartridge
    /// (Pan Docs, "Power Up Sequence").
    fn apply_dmg_boot_state(&mut self) {
        self.regs = Registers {
            a: 0x01,
            f: 0xB0,
            b: 0x00,
            c: 0x13,
            d: 0x00,
            e: 0xD8,
            h: 0x01,
            l: 0x4D,
            sp: 0xFFFE,
            pc: 0x0100,
        };
        self.ime = false;
    }
}
