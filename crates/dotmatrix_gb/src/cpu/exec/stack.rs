use crate::cpu::{Bus, Cpu};

impl Cpu {
    /// PUSH BC/DE/HL/AF
    pub(in crate::cpu) fn exec_push(&mut self, bus: &mut dyn Bus, opcode: u8) -> u32 {
        let value = match (opcode >> 4) & 0x03 {
            3 => self.regs.af(),
            rp => self.read_rp(rp),
        };
        self.push_u16(bus, value);
        16
    }

    /// POP BC/DE/HL/AF. POP AF drops the low nibble of F.
    pub(in crate::cpu) fn exec_pop(&mut self, bus: &mut dyn Bus, opcode: u8) -> u32 {
        let value = self.pop_u16(bus);
        match (opcode >> 4) & 0x03 {
            3 => self.regs.set_af(value),
            rp => self.write_rp(rp, value),
        }
        12
    }
}
