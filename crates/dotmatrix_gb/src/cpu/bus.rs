use crate::interrupts::InterruptController;

/// The CPU's view of the address space.
///
/// `read8`/`write8` cover every address including IE/IF; `interrupts` gives
/// the dispatch logic direct access to the controller so it does not have to
/// round-trip through MMIO.
pub trait Bus {
    fn read8(&mut self, addr: u16) -> u8;
    fn write8(&mut self, addr: u16, value: u8);
    fn interrupts(&mut self) -> &mut InterruptController;

    /// Side effects of executing STOP (the DMG resets the divider).
    fn stop_instruction(&mut self) {}
}
