use super::alu::ShiftOp;
use super::{Bus, Cpu, Flag};

impl Cpu {
    /// CB $00-$3F: RLC, RRC, RL, RR, SLA, SRA, SWAP, SRL.
    pub(super) fn exec_cb_shift(&mut self, bus: &mut dyn Bus, cb: u8) -> u32 {
        let reg = cb & 0x07;
        let value = self.read_reg8(bus, reg);
        let result = self.alu_shift(ShiftOp::from_opcode(cb), value);
        self.write_reg8(bus, reg, result);
        if reg == 6 {
            16
        } else {
            8
        }
    }

    /// CB $40-$7F: BIT b,r. Only reads its operand, so (HL) costs 12.
    pub(super) fn exec_cb_bit(&mut self, bus: &mut dyn Bus, cb: u8) -> u32 {
        let reg = cb & 0x07;
        let bit = (cb >> 3) & 0x07;
        let value = self.read_reg8(bus, reg);
        self.set_flag(Flag::Z, value & (1 << bit) == 0);
        self.set_flag(Flag::N, false);
        self.set_flag(Flag::H, true);
        if reg == 6 {
            12
        } else {
            8
        }
    }

    /// CB $80-$BF: RES b,r.
    pub(super) fn exec_cb_res(&mut self, bus: &mut dyn Bus, cb: u8) -> u32 {
        let bit = (cb >> 3) & 0x07;
        self.modify_cb_operand(bus, cb, |value| value & !(1 << bit))
    }

    /// CB $C0-$FF: SET b,r.
    pub(super) fn exec_cb_set(&mut self, bus: &mut dyn Bus, cb: u8) -> u32 {
        let bit = (cb >> 3) & 0x07;
        self.modify_cb_operand(bus, cb, |value| value | (1 << bit))
    }

    fn modify_cb_operand(&mut self, bus: &mut dyn Bus, cb: u8, f: impl FnOnce(u8) -> u8) -> u32 {
        let reg = cb & 0x07;
        let value = self.read_reg8(bus, reg);
        self.write_reg8(bus, reg, f(value));
        if reg == 6 {
            16
        } else {
            8
        }
    }
}
