mod read;
mod write;

use super::GameBoyBus;

impl GameBoyBus {
    /// While OAM DMA runs the CPU only reaches $FF00-$FFFF.
    #[inline]
    fn blocked_by_dma(&self, addr: u16) -> bool {
        addr < 0xFF00 && self.dma.is_active()
    }

    pub(super) fn read8_mmio(&mut self, addr: u16) -> u8 {
        if self.blocked_by_dma(addr) {
            return 0xFF;
        }
        self.read8_mmio_impl(addr)
    }

    pub(super) fn write8_mmio(&mut self, addr: u16, value: u8) {
        if self.blocked_by_dma(addr) {
            return;
        }
        self.write8_mmio_impl(addr, value)
    }
}
