//! OAM DMA.
//!
//! Writing $XX to $FF46 copies $XX00-$XX9F into OAM, one byte per M-cycle.
//! The unit only tracks progress; the bus performs the actual reads and
//! writes so the source goes through the normal memory map.

/// Bytes in OAM.
pub(crate) const OAM_SIZE: u16 = 0xA0;
/// T-cycles per transferred byte.
const CYCLES_PER_BYTE: u8 = 4;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Transfer {
    source: u16,
    index: u16,
    subcycle: u8,
}

#[derive(Debug, Default)]
pub(super) struct OamDma {
    /// Last value written to $FF46.
    register: u8,
    transfer: Option<Transfer>,
}

impl OamDma {
    pub(super) fn new() -> Self {
        Self::default()
    }

    /// Start (or restart) a transfer from `value << 8`.
    pub(super) fn start(&mut self, value: u8) {
        self.register = value;
        let source = (value as u16) << 8;
        log::debug!("GB DMA: start 0x{source:04X} -> 0xFE00");
        self.transfer = Some(Transfer {
            source,
            index: 0,
            subcycle: 0,
        });
    }

    #[inline]
    pub(super) fn register(&self) -> u8 {
        self.register
    }

    #[inline]
    pub(super) fn is_active(&self) -> bool {
        self.transfer.is_some()
    }

    /// Advance one T-cycle. Returns `(source, oam_offset)` on the cycle a
    /// byte should be copied.
    pub(super) fn tick(&mut self) -> Option<(u16, u16)> {
        let transfer = self.transfer.as_mut()?;
        transfer.subcycle += 1;
        if transfer.subcycle < CYCLES_PER_BYTE {
            return None;
        }
        transfer.subcycle = 0;

        let offset = transfer.index;
        let source = transfer.source.wrapping_add(offset);
        transfer.index += 1;
        if transfer.index == OAM_SIZE {
            log::debug!("GB DMA: finished 0x{:04X}", transfer.source);
            self.transfer = None;
        }
        Some((source, offset))
    }
}
