use super::{Bus, Cpu, PowerMode};
use crate::error::EmulationResult;

/// P1 reads with a selected line held low have a low nibble below $F.
const JOYPAD_ADDR: u16 = 0xFF00;

impl Cpu {
    /// Run one CPU step and return the T-cycles it took.
    ///
    /// A step is one of: an interrupt dispatch (20 cycles), one instruction,
    /// or 4 idle cycles while halted or stopped. Once an error has been
    /// returned the CPU stays locked and every later call returns it again.
    pub fn step(&mut self, bus: &mut dyn Bus) -> EmulationResult<u32> {
        if let Some(fault) = &self.fault {
            return Err(fault.clone());
        }

        if self.mode == PowerMode::Stopped {
            if bus.read8(JOYPAD_ADDR) & 0x0F != 0x0F {
                log::debug!("GB CPU leaving STOP at PC=0x{:04X}", self.regs.pc);
                self.mode = PowerMode::Running;
            }
            return Ok(4);
        }

        if let Some(cycles) = self.service_interrupt(bus)? {
            self.mode = PowerMode::Running;
            return Ok(cycles);
        }

        if self.mode == PowerMode::Halted {
            if bus.interrupts().enabled_requests().is_empty() {
                return Ok(4);
            }
            // IME=0: wake without dispatching and carry on after HALT.
            self.mode = PowerMode::Running;
        }

        let cycles = self.fetch_and_execute(bus)?;
        self.apply_ime_delay();
        Ok(cycles)
    }
}
