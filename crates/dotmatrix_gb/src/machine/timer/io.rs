use super::Timer;

impl Timer {
    pub(in crate::machine) fn read(&self, addr: u16) -> u8 {
        match addr {
            0xFF04 => (self.internal_counter >> 8) as u8,
            0xFF05 => self.tima,
            0xFF06 => self.tma,
            _ => self.tac | 0xF8,
        }
    }

    pub(in crate::machine) fn write(&mut self, addr: u16, value: u8) {
        match addr {
            0xFF04 => self.reset_divider(),
            0xFF05 => {
                // A write in the reload window cancels the reload and the
                // interrupt.
                self.tima = value;
                self.overflow = false;
            }
            0xFF06 => self.tma = value,
            _ => {
                // Disabling the timer or switching the source while the
                // selected bit is high counts as a falling edge.
                let old_bit = self.enabled() && self.counter_bit();
                self.tac = value & 0x07;
                let new_bit = self.enabled() && self.counter_bit();
                if old_bit && !new_bit {
                    self.increment_tima();
                }
            }
        }
    }
}
