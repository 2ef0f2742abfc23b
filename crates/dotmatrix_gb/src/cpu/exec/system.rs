use crate::cpu::table::CB_OPCODES;
use crate::cpu::{Bus, Cpu, PowerMode};

impl Cpu {
    pub(in crate::cpu) fn exec_nop(&mut self, _bus: &mut dyn Bus, _opcode: u8) -> u32 {
        4
    }

    /// HALT. With IME clear and an interrupt already pending the CPU does
    /// not halt; instead the next fetch repeats the byte after HALT.
    pub(in crate::cpu) fn exec_halt(&mut self, bus: &mut dyn Bus, _opcode: u8) -> u32 {
        if !self.ime && !bus.interrupts().enabled_requests().is_empty() {
            self.halt_bug = true;
            return 4;
        }
        self.mode = PowerMode::Halted;
        4
    }

    /// STOP is two bytes long; the padding byte is fetched and discarded.
    pub(in crate::cpu) fn exec_stop(&mut self, bus: &mut dyn Bus, _opcode: u8) -> u32 {
        let _padding = self.fetch8(bus);
        bus.stop_instruction();
        self.mode = PowerMode::Stopped;
        log::debug!("GB CPU entered STOP at PC=0x{:04X}", self.regs.pc);
        4
    }

    pub(in crate::cpu) fn exec_di(&mut self, _bus: &mut dyn Bus, _opcode: u8) -> u32 {
        self.ime = false;
        self.ime_enable_pending = false;
        self.ime_enable_delay = false;
        4
    }

    /// EI: IME becomes 1 only after the following instruction.
    pub(in crate::cpu) fn exec_ei(&mut self, _bus: &mut dyn Bus, _opcode: u8) -> u32 {
        self.ime_enable_pending = true;
        4
    }

    /// $CB prefix: second dispatch through the CB table.
    pub(in crate::cpu) fn exec_prefix_cb(&mut self, bus: &mut dyn Bus, _opcode: u8) -> u32 {
        let cb = self.fetch8(bus);
        CB_OPCODES[cb as usize](self, bus, cb)
    }
}
