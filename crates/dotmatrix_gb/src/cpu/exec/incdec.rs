use crate::cpu::{Bus, Cpu};

impl Cpu {
    /// INC r / INC (HL)
    pub(in crate::cpu) fn exec_inc8(&mut self, bus: &mut dyn Bus, opcode: u8) -> u32 {
        let reg = (opcode >> 3) & 0x07;
        let value = self.read_reg8(bus, reg);
        let result = self.alu_inc8(value);
        self.write_reg8(bus, reg, result);
        if reg == 6 {
            12
        } else {
            4
        }
    }

    /// DEC r / DEC (HL)
    pub(in crate::cpu) fn exec_dec8(&mut self, bus: &mut dyn Bus, opcode: u8) -> u32 {
        let reg = (opcode >> 3) & 0x07;
        let value = self.read_reg8(bus, reg);
        let result = self.alu_dec8(value);
        self.write_reg8(bus, reg, result);
        if reg == 6 {
            12
        } else {
            4
        }
    }

    /// INC rr (no flags).
    pub(in crate::cpu) fn exec_inc16(&mut self, _bus: &mut dyn Bus, opcode: u8) -> u32 {
        let rp = opcode >> 4;
        let value = self.read_rp(rp).wrapping_add(1);
        self.write_rp(rp, value);
        8
    }

    /// DEC rr (no flags).
    pub(in crate::cpu) fn exec_dec16(&mut self, _bus: &mut dyn Bus, opcode: u8) -> u32 {
        let rp = opcode >> 4;
        let value = self.read_rp(rp).wrapping_sub(1);
        self.write_rp(rp, value);
        8
    }
}
