use super::{Bus, Cpu};
use crate::error::{EmulationError, EmulationResult};

impl Cpu {
    /// Dispatch the highest-priority enabled interrupt if IME allows it.
    ///
    /// Returns `Ok(Some(20))` when a dispatch happened and `Ok(None)` when
    /// nothing was serviced. Acknowledging must clear exactly the bit of the
    /// source being serviced; anything else is reported as a fault.
    ///
    /// The request bit is cleared before PC is pushed, so a push that lands
    /// on IF ($FF0F) simply leaves its value there.
    pub(super) fn service_interrupt(&mut self, bus: &mut dyn Bus) -> EmulationResult<Option<u32>> {
        let controller = bus.interrupts();
        if !controller.pending(self.ime) {
            return Ok(None);
        }
        let Some(interrupt) = controller.highest_priority() else {
            return Ok(None);
        };

        let before = controller.requested();
        controller.acknowledge(interrupt);
        let cleared = (before - controller.requested()).bits();
        if cleared != interrupt.flag().bits() {
            let err = EmulationError::InterruptPriorityViolation { interrupt, cleared };
            log::error!("GB CPU locked: {err} ({})", self.regs);
            self.fault = Some(err.clone());
            return Err(err);
        }

        let pc = self.regs.pc;
        self.ime = false;
        self.ime_enable_pending = false;
        self.ime_enable_delay = false;
        self.push_u16(bus, pc);
        self.regs.pc = interrupt.vector();
        log::debug!(
            "GB CPU interrupt: {:?} vector=0x{:04X} pc=0x{:04X} sp=0x{:04X}",
            interrupt,
            self.regs.pc,
            pc,
            self.regs.sp,
        );
        Ok(Some(20))
    }

    /// EI takes effect after the instruction that follows it.
    #[inline]
    pub(super) fn apply_ime_delay(&mut self) {
        if self.ime_enable_delay {
            self.ime = true;
            self.ime_enable_delay = false;
        } else if self.ime_enable_pending {
            self.ime_enable_pending = false;
            self.ime_enable_delay = true;
        }
    }
}
