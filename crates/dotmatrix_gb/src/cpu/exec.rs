mod alu;
mod control;
mod incdec;
mod ld;
mod stack;
mod system;

use super::table::OPCODES;
use super::{Bus, Cpu};
use crate::error::{EmulationError, EmulationResult};

impl Cpu {
    /// Fetch the next opcode and run its handler from the dispatch table.
    pub(super) fn fetch_and_execute(&mut self, bus: &mut dyn Bus) -> EmulationResult<u32> {
        let addr = self.regs.pc;
        let opcode = self.fetch8(bus);
        match OPCODES[opcode as usize] {
            Some(handler) => Ok(handler(self, bus, opcode)),
            None => {
                let err = EmulationError::UndefinedOpcode { opcode, addr };
                log::error!("GB CPU locked: {err} ({})", self.regs);
                self.fault = Some(err.clone());
                Err(err)
            }
        }
    }
}
