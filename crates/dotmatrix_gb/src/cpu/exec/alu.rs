use crate::cpu::alu::{AluOp, ShiftOp};
use crate::cpu::{Bus, Cpu, Flag};

impl Cpu {
    /// ADD/ADC/SUB/SBC/AND/XOR/OR/CP A,r over $80-$BF.
    pub(in crate::cpu) fn exec_alu_r(&mut self, bus: &mut dyn Bus, opcode: u8) -> u32 {
        let src = opcode & 0x07;
        let value = self.read_reg8(bus, src);
        self.alu(AluOp::from_opcode(opcode), value);
        if src == 6 {
            8
        } else {
            4
        }
    }

    /// ALU A,d8 ($C6, $CE, ... $FE).
    pub(in crate::cpu) fn exec_alu_d8(&mut self, bus: &mut dyn Bus, opcode: u8) -> u32 {
        let value = self.fetch8(bus);
        self.alu(AluOp::from_opcode(opcode), value);
        8
    }

    /// RLCA / RRCA / RLA / RRA. Same as the CB forms on A except Z is
    /// always cleared.
    pub(in crate::cpu) fn exec_rotate_a(&mut self, _bus: &mut dyn Bus, opcode: u8) -> u32 {
        self.regs.a = self.alu_shift(ShiftOp::from_opcode(opcode), self.regs.a);
        self.set_flag(Flag::Z, false);
        4
    }

    /// ADD HL,rr
    pub(in crate::cpu) fn exec_add_hl_rr(&mut self, _bus: &mut dyn Bus, opcode: u8) -> u32 {
        let value = self.read_rp(opcode >> 4);
        self.alu_add16_hl(value);
        8
    }

    /// ADD SP,r8
    pub(in crate::cpu) fn exec_add_sp_r8(&mut self, bus: &mut dyn Bus, _opcode: u8) -> u32 {
        let imm = self.fetch8(bus);
        self.regs.sp = self.alu_add16_signed(self.regs.sp, imm);
        16
    }

    pub(in crate::cpu) fn exec_daa(&mut self, _bus: &mut dyn Bus, _opcode: u8) -> u32 {
        self.alu_daa();
        4
    }

    pub(in crate::cpu) fn exec_cpl(&mut self, _bus: &mut dyn Bus, _opcode: u8) -> u32 {
        self.regs.a = !self.regs.a;
        self.set_flag(Flag::N, true);
        self.set_flag(Flag::H, true);
        4
    }

    pub(in crate::cpu) fn exec_scf(&mut self, _bus: &mut dyn Bus, _opcode: u8) -> u32 {
        self.set_flag(Flag::N, false);
        self.set_flag(Flag::H, false);
        self.set_flag(Flag::C, true);
        4
    }

    pub(in crate::cpu) fn exec_ccf(&mut self, _bus: &mut dyn Bus, _opcode: u8) -> u32 {
        let carry = self.get_flag(Flag::C);
        self.set_flag(Flag::N, false);
        self.set_flag(Flag::H, false);
        self.set_flag(Flag::C, !carry);
        4
    }
}
